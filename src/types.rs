//! Core data types shared across the pipeline
//!
//! The inventory tree is one struct per tier with a typed child collection,
//! so the shape Node → VM → Stack → Container → port leaf is enforced at
//! compile time. Serde renames map the model onto the on-disk
//! `{Name, Attributes}` document convention.

use serde::{Deserialize, Serialize};

/// Compute node, the root tier of the inventory tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeNode {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Attributes")]
    pub vms: Vec<Vm>,
}

/// Virtual machine / LXC tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vm {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Attributes")]
    pub stacks: Vec<StackNode>,
}

/// A deployment stack (compose project) and its member containers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackNode {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Attributes")]
    pub containers: Vec<ContainerNode>,
}

/// A single container; its attribute list holds one leaf per published port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerNode {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Attributes")]
    pub ports: Vec<PortSpec>,
}

/// Published port leaf. Carries no `Name` key on disk, so the graph walker
/// folds it into the parent container's tooltip instead of creating a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "PrivatePort")]
    pub private_port: Option<u16>,
    #[serde(rename = "PublicPort")]
    pub public_port: Option<u16>,
    #[serde(rename = "Type")]
    pub proto: String,
}

/// Flattened view of one published port, tagged with its container name
#[derive(Debug, Clone, PartialEq)]
pub struct PortMapping {
    pub container: String,
    pub private_port: Option<u16>,
    pub public_port: Option<u16>,
    #[allow(dead_code)] // Mirrors the raw publication; the registry line only carries the pair
    pub proto: String,
    #[allow(dead_code)]
    pub ip: String,
}

impl ContainerNode {
    /// All port leaves of this container as flat mappings, in list order
    pub fn port_mappings(&self) -> Vec<PortMapping> {
        self.ports
            .iter()
            .map(|p| PortMapping {
                container: self.name.clone(),
                private_port: p.private_port,
                public_port: p.public_port,
                proto: p.proto.clone(),
                ip: p.ip.clone(),
            })
            .collect()
    }
}

/// One synthesized dashboard list entry
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardItem {
    pub title: String,
    pub url: String,
    pub icon: String,
    pub id: String,
}
