//! stackatlas – Portainer infrastructure mapper
//!
//! Fetches stacks and containers from a Portainer instance, builds the
//! nested inventory tree, renders it as an interactive graph and derives
//! a port registry plus a dashboard config fragment from the same tree.
//!
//! Usage: stackatlas [--offline] [--help] [--version]

mod app;
mod config;
mod dashboard;
mod graph;
mod inventory;
mod portainer;
mod registry;
mod types;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("stackatlas {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let offline = args.iter().any(|a| a == "--offline" || a == "-o");

    if let Err(e) = app::run(offline) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_help() {
    println!(
        r#"stackatlas - Portainer infrastructure mapper

USAGE:
    stackatlas [OPTIONS]

OPTIONS:
    -o, --offline    Rebuild everything from the persisted API responses
                     (stacks.json / containers.json) without network access
    -h, --help       Print help information
    -v, --version    Print version information

ENVIRONMENT:
    PORTAINER_URL       Portainer base URL, e.g. https://192.168.0.62:9443
    PORTAINER_API_KEY   API key (Portainer → My account → Access tokens)

CONFIG:
    ~/.config/stackatlas/config.toml

OUTPUT FILES:
    stacks.json           raw stack list as returned by the API
    containers.json       raw container list as returned by the API
    inventory_tree.json   nested Node → VM → Stack → Container tree
    infra_graph.html      interactive graph (open in a browser)
    port_registry.txt     one line per container with published ports
    dashboard_items.yml   dashboard config fragment
"#
    );
}
