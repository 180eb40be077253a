//! Port registry extraction and its text format
//!
//! Walks the fixed Node → VM → Stack → Container shape (not the generic
//! graph walker) and collects, per container, the fully published port
//! pairs. Serialized one container per line:
//!
//! `web1: [(80, 8080), (443, 8443)]`

use anyhow::{Context, Result};

use crate::types::ComputeNode;

/// One container with its published (private, public) pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePorts {
    pub container: String,
    pub pairs: Vec<(u16, u16)>,
}

/// A registry line decoded back from text; ports may be absent here
/// because the text form is permissive about `None` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedService {
    pub name: String,
    pub pairs: Vec<(Option<u16>, Option<u16>)>,
}

/// Collect port pairs per container, tree order. Containers without a
/// single fully published pair are skipped entirely.
pub fn extract(root: &ComputeNode) -> Vec<ServicePorts> {
    let mut entries = Vec::new();

    for vm in &root.vms {
        for stack in &vm.stacks {
            for container in &stack.containers {
                let mappings = container.port_mappings();
                let pairs: Vec<(u16, u16)> = mappings
                    .iter()
                    .filter_map(|m| Some((m.private_port?, m.public_port?)))
                    .collect();

                if pairs.is_empty() {
                    continue;
                }
                // pairs non-empty implies mappings non-empty
                entries.push(ServicePorts {
                    container: mappings[0].container.clone(),
                    pairs,
                });
            }
        }
    }

    entries
}

/// Serialize the registry, one line per container
pub fn serialize(entries: &[ServicePorts]) -> String {
    let mut out = String::new();
    for entry in entries {
        let pairs: Vec<String> = entry
            .pairs
            .iter()
            .map(|(private, public)| format!("({}, {})", private, public))
            .collect();
        out.push_str(&format!("{}: [{}]\n", entry.container, pairs.join(", ")));
    }
    out
}

/// Parse registry text back into structured entries. Blank lines are
/// skipped; each remaining line splits on the first `": "`.
pub fn parse(text: &str) -> Result<Vec<ParsedService>> {
    let mut services = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, list) = line
            .split_once(": ")
            .with_context(|| format!("Malformed registry line: '{}'", line))?;
        services.push(ParsedService {
            name: name.to_string(),
            pairs: parse_pairs(list)
                .with_context(|| format!("Malformed port list for '{}'", name))?,
        });
    }

    Ok(services)
}

fn parse_pairs(list: &str) -> Result<Vec<(Option<u16>, Option<u16>)>> {
    let inner = list
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .context("port list is not bracketed")?
        .trim();

    let mut pairs = Vec::new();
    if inner.is_empty() {
        return Ok(pairs);
    }

    for part in inner.split("),") {
        let part = part.trim().trim_start_matches('(').trim_end_matches(')');
        let (private, public) = part.split_once(',').context("pair is not comma-separated")?;
        pairs.push((parse_port(private)?, parse_port(public)?));
    }

    Ok(pairs)
}

fn parse_port(token: &str) -> Result<Option<u16>> {
    let token = token.trim();
    if token == "None" {
        return Ok(None);
    }
    token
        .parse::<u16>()
        .map(Some)
        .with_context(|| format!("invalid port number '{}'", token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComputeNode, ContainerNode, PortSpec, StackNode, Vm};

    fn port(private: Option<u16>, public: Option<u16>) -> PortSpec {
        PortSpec {
            ip: "0.0.0.0".into(),
            private_port: private,
            public_port: public,
            proto: "tcp".into(),
        }
    }

    fn tree(containers: Vec<ContainerNode>) -> ComputeNode {
        ComputeNode {
            name: "N100".into(),
            vms: vec![Vm {
                name: "LXC_0".into(),
                stacks: vec![StackNode { name: "site".into(), containers }],
            }],
        }
    }

    #[test]
    fn test_extract_collects_full_pairs_only() {
        let root = tree(vec![ContainerNode {
            name: "web1".into(),
            ports: vec![
                port(Some(80), Some(8080)),
                port(Some(5432), None),
                port(None, Some(9000)),
                port(Some(443), Some(8443)),
            ],
        }]);
        let entries = extract(&root);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].container, "web1");
        assert_eq!(entries[0].pairs, vec![(80, 8080), (443, 8443)]);
    }

    #[test]
    fn test_extract_skips_containers_without_pairs() {
        let root = tree(vec![
            ContainerNode { name: "silent".into(), ports: vec![] },
            ContainerNode {
                name: "internal".into(),
                ports: vec![port(Some(5432), None)],
            },
            ContainerNode {
                name: "web1".into(),
                ports: vec![port(Some(80), Some(8080))],
            },
        ]);
        let entries = extract(&root);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].container, "web1");
    }

    #[test]
    fn test_serialize_line_format() {
        let entries = vec![ServicePorts {
            container: "web1".into(),
            pairs: vec![(80, 8080), (443, 8443)],
        }];
        assert_eq!(serialize(&entries), "web1: [(80, 8080), (443, 8443)]\n");
    }

    #[test]
    fn test_serialize_then_parse_is_lossless() {
        let entries = vec![
            ServicePorts { container: "web1".into(), pairs: vec![(80, 8080)] },
            ServicePorts { container: "plex".into(), pairs: vec![(32400, 32400), (1900, 1901)] },
        ];
        let parsed = parse(&serialize(&entries)).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].name, "web1");
        assert_eq!(parsed[0].pairs, vec![(Some(80), Some(8080))]);
        assert_eq!(parsed[1].pairs, vec![(Some(32400), Some(32400)), (Some(1900), Some(1901))]);
    }

    #[test]
    fn test_parse_accepts_none_tokens() {
        let parsed = parse("db1: [(5432, None)]\n").unwrap();
        assert_eq!(parsed[0].pairs, vec![(Some(5432), None)]);
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        let parsed = parse("web:proxy: [(80, 8080)]\n").unwrap();
        assert_eq!(parsed[0].name, "web:proxy");
        assert_eq!(parsed[0].pairs, vec![(Some(80), Some(8080))]);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let parsed = parse("\nweb1: [(80, 8080)]\n\n").unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("not a registry line\n").is_err());
        assert!(parse("web1: 80,8080\n").is_err());
    }
}
