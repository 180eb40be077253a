//! Tree → graph conversion
//!
//! Generic recursive walker over any JSON value following the
//! `{Name, Attributes}` convention: a mapping with a `Name` key becomes a
//! node, a mapping without one is a leaf attribute folded into the parent's
//! tooltip, a sequence is transparent. The walker returns plain node/edge
//! data; turning it into pixels lives in `render`.

pub mod render;

use serde_json::Value;
use std::collections::HashMap;

/// Depth-based display tier, fixed 4-entry palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTier {
    Root,
    Tier1,
    Tier2,
    Leaf,
}

impl NodeTier {
    /// Tier for a node first seen at the given depth; ≥3 clamps to Leaf
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 => NodeTier::Root,
            1 => NodeTier::Tier1,
            2 => NodeTier::Tier2,
            _ => NodeTier::Leaf,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            NodeTier::Root => "#e94560",
            NodeTier::Tier1 => "#f7be16",
            NodeTier::Tier2 => "#45b7d1",
            NodeTier::Leaf => "#16c79a",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeTier::Root => "root",
            NodeTier::Tier1 => "level 1",
            NodeTier::Tier2 => "level 2",
            NodeTier::Leaf => "leaf",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub name: String,
    pub label: String,
    pub tooltip: String,
    pub tier: NodeTier,
}

/// Directed edge parent → child, unweighted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Convert a `{Name, Attributes}` value into a directed graph.
///
/// Node identity is the `Name` string: a repeated name re-touches the
/// existing node (first tooltip and tier win) but still receives an edge
/// from its parent.
pub fn build(value: &Value) -> Graph {
    let mut graph = Graph::default();
    let mut index: HashMap<String, usize> = HashMap::new();
    walk(value, None, 0, &mut graph, &mut index);
    graph
}

fn walk(
    value: &Value,
    parent: Option<&str>,
    depth: usize,
    graph: &mut Graph,
    index: &mut HashMap<String, usize>,
) {
    match value {
        // Sequences are transparent: same parent, same depth, no node
        Value::Array(items) => {
            for item in items {
                walk(item, parent, depth, graph, index);
            }
        }
        Value::Object(map) => {
            let Some(name) = map.get("Name").and_then(Value::as_str) else {
                return;
            };

            if !index.contains_key(name) {
                graph.nodes.push(GraphNode {
                    name: name.to_string(),
                    label: name.to_string(),
                    tooltip: tooltip_text(map.get("Attributes")),
                    tier: NodeTier::from_depth(depth),
                });
                index.insert(name.to_string(), graph.nodes.len() - 1);
            }

            if let Some(parent) = parent {
                graph.edges.push(GraphEdge {
                    from: parent.to_string(),
                    to: name.to_string(),
                });
            }

            // Attributes that is not a sequence means no children
            let Some(Value::Array(children)) = map.get("Attributes") else {
                return;
            };
            for child in children {
                // Only named mappings are visited; leaf attributes already
                // went into the tooltip above
                if child.as_object().is_some_and(|m| m.contains_key("Name")) {
                    walk(child, Some(name), depth + 1, graph, index);
                }
            }
        }
        _ => {}
    }
}

/// Tooltip: `key: value` pairs of every leaf-attribute mapping in the
/// attribute list, document order, comma-separated.
fn tooltip_text(attributes: Option<&Value>) -> String {
    let Some(Value::Array(entries)) = attributes else {
        return String::new();
    };

    let mut parts = Vec::new();
    for entry in entries {
        let Some(map) = entry.as_object() else {
            continue;
        };
        if map.contains_key("Name") {
            continue;
        }
        for (key, val) in map {
            parts.push(format!("{}: {}", key, display_value(val)));
        }
    }
    parts.join(", ")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
