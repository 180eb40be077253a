//! Pipeline orchestration
//!
//! One run is the whole chain: fetch → persist raw JSON → normalize →
//! build graph → render HTML → extract ports → synthesize dashboard.
//! Strictly sequential and fail-fast; any stage error aborts the rest.

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::config::{Config, Credentials};
use crate::portainer::{self, PortainerClient};
use crate::{dashboard, graph, inventory, registry};

pub const STACKS_FILE: &str = "stacks.json";
pub const CONTAINERS_FILE: &str = "containers.json";
pub const TREE_FILE: &str = "inventory_tree.json";
pub const GRAPH_FILE: &str = "infra_graph.html";
pub const REGISTRY_FILE: &str = "port_registry.txt";
pub const DASHBOARD_FILE: &str = "dashboard_items.yml";

pub fn run(offline: bool) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let out = config.output_dir.as_path();

    let client = if offline {
        None
    } else {
        let credentials = Credentials::from_env()?;
        Some(PortainerClient::new(&credentials, config.endpoint_id))
    };

    // Stage 1: stacks
    let stacks_value = match &client {
        Some(client) => {
            println!("Fetching stacks from Portainer...");
            client.fetch_stacks()?
        }
        None => {
            println!("Offline mode: reading persisted API responses...");
            load_json(&out.join(STACKS_FILE))?
        }
    };
    let stacks = portainer::decode_stacks(&stacks_value)?;
    if stacks.is_empty() {
        println!("No stacks found in Portainer.");
        return Ok(());
    }
    if !offline {
        fs::create_dir_all(out)
            .with_context(|| format!("Failed to create output directory {:?}", out))?;
        save_json(&out.join(STACKS_FILE), &stacks_value)?;
    }

    // Stage 2: containers
    let containers_value = match &client {
        Some(client) => {
            println!("Fetching containers...");
            client.fetch_containers()?
        }
        None => load_json(&out.join(CONTAINERS_FILE))?,
    };
    let containers = portainer::decode_containers(&containers_value)?;
    if containers.is_empty() {
        println!("No containers found in Portainer.");
        return Ok(());
    }
    if !offline {
        save_json(&out.join(CONTAINERS_FILE), &containers_value)?;
    }

    // Stage 3: normalize into the nested inventory tree
    let tree = inventory::normalize(&stacks, &containers, &config)?;
    let tree_value = Value::Array(vec![serde_json::to_value(&tree)?]);
    save_json(&out.join(TREE_FILE), &tree_value)?;

    // Stage 4: graph + render
    let infra_graph = graph::build(&tree_value);
    println!(
        "Rendering graph ({} nodes, {} edges)...",
        infra_graph.nodes.len(),
        infra_graph.edges.len()
    );
    let generated_at = Local::now().format("%d.%m.%y %H:%M").to_string();
    let html = graph::render::generate_html(&infra_graph, &generated_at);
    let graph_path = out.join(GRAPH_FILE);
    fs::write(&graph_path, html)
        .with_context(|| format!("Failed to write {:?}", graph_path))?;

    // Stage 5: port registry
    let entries = registry::extract(&tree);
    let registry_text = registry::serialize(&entries);
    let registry_path = out.join(REGISTRY_FILE);
    fs::write(&registry_path, &registry_text)
        .with_context(|| format!("Failed to write {:?}", registry_path))?;

    // Stage 6: dashboard fragment
    let (items, fragment) = dashboard::synthesize(&registry_text, &config.dashboard_host)?;
    let dashboard_path = out.join(DASHBOARD_FILE);
    fs::write(&dashboard_path, fragment)
        .with_context(|| format!("Failed to write {:?}", dashboard_path))?;

    println!(
        "Done: {} stacks, {} services with ports, {} dashboard entries.",
        stacks.len(),
        entries.len(),
        items.len()
    );
    println!("Graph written to {:?}", graph_path);

    Ok(())
}

fn save_json(path: &Path, value: &Value) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}

fn load_json(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // The full transformation chain without any network or file I/O:
    // raw API shapes in, dashboard entries out.
    #[test]
    fn test_pipeline_end_to_end() {
        let stacks_value = json!([{"Id": 1, "Name": "site"}]);
        let containers_value = json!([{
            "Names": ["/web1"],
            "Labels": {"com.docker.compose.project": "site"},
            "Ports": [{"PrivatePort": 80, "PublicPort": 8080, "Type": "tcp"}]
        }]);

        let stacks = portainer::decode_stacks(&stacks_value).unwrap();
        let containers = portainer::decode_containers(&containers_value).unwrap();
        let config = Config::default();

        let tree = inventory::normalize(&stacks, &containers, &config).unwrap();
        let tree_value = Value::Array(vec![serde_json::to_value(&tree).unwrap()]);

        let infra_graph = graph::build(&tree_value);
        let names: Vec<&str> = infra_graph.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["N100", "LXC_0", "site", "web1"]);

        let registry_text = registry::serialize(&registry::extract(&tree));
        assert_eq!(registry_text, "web1: [(80, 8080)]\n");

        let (items, fragment) = dashboard::synthesize(&registry_text, &config.dashboard_host).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "web1");
        assert_eq!(items[0].url, "http://192.168.0.62:8080");
        assert!(fragment.contains("      - title: web1\n"));
    }

    #[test]
    fn test_portless_container_yields_no_registry_or_dashboard() {
        let stacks = portainer::decode_stacks(&json!([{"Id": 1, "Name": "site"}])).unwrap();
        let containers = portainer::decode_containers(&json!([{
            "Names": ["/worker"],
            "Labels": {"com.docker.compose.project": "site"},
            "Ports": []
        }]))
        .unwrap();
        let config = Config::default();

        let tree = inventory::normalize(&stacks, &containers, &config).unwrap();
        // The container node is present in the tree...
        assert_eq!(tree.vms[0].stacks[0].containers.len(), 1);

        // ...but contributes zero registry lines and zero dashboard items
        let registry_text = registry::serialize(&registry::extract(&tree));
        assert!(registry_text.is_empty());
        let (items, fragment) = dashboard::synthesize(&registry_text, "host").unwrap();
        assert!(items.is_empty());
        assert!(fragment.is_empty());
    }

    #[test]
    fn test_save_and_load_json_round_trip() {
        let dir = std::env::temp_dir().join("stackatlas-test-appjson");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("roundtrip.json");
        let value = json!({"Name": "N100", "Attributes": []});
        save_json(&path, &value).unwrap();
        assert_eq!(load_json(&path).unwrap(), value);
        fs::remove_file(&path).unwrap();
    }
}
