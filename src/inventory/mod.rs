//! Inventory normalization
//!
//! Joins the flat container list against the stack list via the compose
//! project label and nests the result under the fixed Node/VM topology.
//! The output tree is deterministic for deterministic input: stacks keep
//! list order, containers keep per-stack selection order.

use anyhow::Result;
use std::collections::HashSet;

use crate::config::Config;
use crate::portainer::{ContainerSummary, StackSummary};
use crate::types::{ComputeNode, ContainerNode, PortSpec, StackNode, Vm};

/// Marker prefixed to a container whose name collides with its own stack,
/// so adjacent tree levels never present identical names.
const COLLISION_PREFIX: &str = "c_";

/// Build the nested inventory tree from raw API summaries
pub fn normalize(
    stacks: &[StackSummary],
    containers: &[ContainerSummary],
    config: &Config,
) -> Result<ComputeNode> {
    // Stack id → name, first occurrence wins on duplicate ids
    let mut seen_ids: HashSet<u64> = HashSet::new();
    let mut stack_names: Vec<&str> = Vec::with_capacity(stacks.len());
    for stack in stacks {
        if seen_ids.insert(stack.id) {
            stack_names.push(&stack.name);
        }
    }

    let mut stack_nodes = Vec::with_capacity(stack_names.len());
    for stack_name in stack_names {
        let mut members = Vec::new();
        for container in containers {
            let Some(label) = container.labels.get(&config.project_label) else {
                continue;
            };
            if label != stack_name {
                continue;
            }

            let mut name = container.display_name()?;
            if name == stack_name {
                name = format!("{}{}", COLLISION_PREFIX, name);
            }

            let ports = container
                .ports
                .iter()
                .map(|p| PortSpec {
                    ip: p.ip.clone().unwrap_or_else(|| "N/A".to_string()),
                    private_port: p.private_port,
                    public_port: p.public_port,
                    proto: p.proto.clone().unwrap_or_default(),
                })
                .collect();

            members.push(ContainerNode { name, ports });
        }

        // Stacks without containers stay in the tree with an empty child list
        stack_nodes.push(StackNode {
            name: stack_name.to_string(),
            containers: members,
        });
    }

    Ok(ComputeNode {
        name: config.node_name.clone(),
        vms: vec![Vm {
            name: config.vm_name.clone(),
            stacks: stack_nodes,
        }],
    })
}
