//! Dashboard fragment synthesis
//!
//! Turns the serialized port registry back into structured entries and
//! emits a list-item fragment ready to paste into a self-hosted dashboard
//! config. One entry per service, built from the first published pair.

use anyhow::Result;

use crate::registry;
use crate::types::DashboardItem;

/// Parse the registry text and synthesize dashboard items plus the
/// rendered config fragment. Services whose first pair has no public
/// port are skipped entirely.
pub fn synthesize(registry_text: &str, host: &str) -> Result<(Vec<DashboardItem>, String)> {
    let services = registry::parse(registry_text)?;

    let mut items = Vec::new();
    for service in services {
        let Some((_, public)) = service.pairs.first() else {
            continue;
        };
        let Some(port) = public else {
            continue;
        };
        items.push(DashboardItem {
            title: service.name.clone(),
            url: format!("http://{}:{}", host, port),
            icon: String::new(),
            id: service.name,
        });
    }

    let fragment = render_fragment(&items);
    Ok((items, fragment))
}

/// Render items as 4-line list blocks, blank-line separated:
///
/// ```text
///       - title: web1
///         url: http://192.168.0.62:8080
///         icon: ""
///         id: web1
/// ```
fn render_fragment(items: &[DashboardItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!("      - title: {}\n", item.title));
        out.push_str(&format!("        url: {}\n", item.url));
        out.push_str(&format!("        icon: \"{}\"\n", item.icon));
        out.push_str(&format!("        id: {}\n", item.id));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_builds_entry_from_first_pair() {
        let (items, fragment) =
            synthesize("web1: [(80, 8080), (443, 8443)]\n", "192.168.0.62").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "web1");
        assert_eq!(items[0].url, "http://192.168.0.62:8080");
        assert_eq!(items[0].id, "web1");
        assert_eq!(items[0].icon, "");
        assert!(fragment.contains("      - title: web1\n"));
        assert!(fragment.contains("        url: http://192.168.0.62:8080\n"));
    }

    #[test]
    fn test_fragment_block_layout() {
        let (_, fragment) = synthesize("web1: [(80, 8080)]\n", "host").unwrap();
        assert_eq!(
            fragment,
            "      - title: web1\n        url: http://host:8080\n        icon: \"\"\n        id: web1\n\n"
        );
    }

    #[test]
    fn test_null_public_port_skips_service() {
        let (items, fragment) = synthesize("db1: [(5432, None)]\n", "host").unwrap();
        assert!(items.is_empty());
        assert!(fragment.is_empty());
    }

    #[test]
    fn test_empty_pair_list_skips_service() {
        let (items, _) = synthesize("silent: []\n", "host").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_multiple_services_keep_registry_order() {
        let text = "web1: [(80, 8080)]\nplex: [(32400, 32400)]\n";
        let (items, fragment) = synthesize(text, "host").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "web1");
        assert_eq!(items[1].title, "plex");
        let web_pos = fragment.find("title: web1").unwrap();
        let plex_pos = fragment.find("title: plex").unwrap();
        assert!(web_pos < plex_pos);
    }

    #[test]
    fn test_registry_round_trip_preserves_ports() {
        // Source pair values survive serialize → parse → synthesize
        let entries = vec![registry::ServicePorts {
            container: "web1".into(),
            pairs: vec![(80, 8080)],
        }];
        let text = registry::serialize(&entries);
        let parsed = registry::parse(&text).unwrap();
        assert_eq!(parsed[0].pairs, vec![(Some(80), Some(8080))]);
        let (items, _) = synthesize(&text, "host").unwrap();
        assert_eq!(items[0].url, "http://host:8080");
    }
}
