//! Portainer API client
//!
//! Blocking HTTP via `ureq` with a timeout on every request. The client
//! returns raw JSON values so the caller can persist responses to disk
//! exactly as received; typed decoding is a separate step.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::Credentials;

const TIMEOUT_SECS: u64 = 30;

/// One stack as listed by `/api/stacks`
#[derive(Debug, Clone, Deserialize)]
pub struct StackSummary {
    #[serde(rename = "Id")]
    pub id: u64,
    #[serde(rename = "Name")]
    pub name: String,
}

/// One container as listed by the endpoint's Docker proxy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerSummary {
    #[serde(rename = "Names", default)]
    pub names: Vec<String>,
    #[serde(rename = "Labels", default)]
    pub labels: HashMap<String, String>,
    #[serde(rename = "Ports", default)]
    pub ports: Vec<PortDescriptor>,
}

/// Raw port publication as reported by the Docker API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortDescriptor {
    #[serde(rename = "IP")]
    pub ip: Option<String>,
    #[serde(rename = "PrivatePort")]
    pub private_port: Option<u16>,
    #[serde(rename = "PublicPort")]
    pub public_port: Option<u16>,
    #[serde(rename = "Type")]
    pub proto: Option<String>,
}

impl ContainerSummary {
    /// Display name: first `Names` entry with the leading `/` stripped
    pub fn display_name(&self) -> Result<String> {
        let first = self
            .names
            .first()
            .context("Container descriptor has no Names entry")?;
        Ok(first.trim_start_matches('/').to_string())
    }
}

pub struct PortainerClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
    endpoint_id: u32,
}

impl PortainerClient {
    pub fn new(credentials: &Credentials, endpoint_id: u32) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build();
        Self {
            agent,
            base_url: credentials.api_url.clone(),
            api_key: credentials.api_key.clone(),
            endpoint_id,
        }
    }

    /// Fetch the stack list
    pub fn fetch_stacks(&self) -> Result<Value> {
        let url = format!("{}/api/stacks", self.base_url);
        self.get_json(&url, "stack list")
    }

    /// Fetch the container list of the configured endpoint
    pub fn fetch_containers(&self) -> Result<Value> {
        let url = format!(
            "{}/api/endpoints/{}/docker/containers/json",
            self.base_url, self.endpoint_id
        );
        self.get_json(&url, "container list")
    }

    fn get_json(&self, url: &str, what: &str) -> Result<Value> {
        let resp = self.agent.get(url).set("X-API-Key", &self.api_key).call();

        match resp {
            Ok(resp) => serde_json::from_reader(resp.into_reader())
                .with_context(|| format!("Portainer returned invalid JSON for the {}", what)),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                let msg: String = body.chars().take(200).collect();
                anyhow::bail!("Portainer API error {} while fetching the {}: {}", code, what, msg)
            }
            Err(ureq::Error::Transport(e)) => {
                anyhow::bail!("Network error while fetching the {}: {}", what, e)
            }
        }
    }
}

/// Decode a raw stack listing into typed summaries
pub fn decode_stacks(raw: &Value) -> Result<Vec<StackSummary>> {
    serde_json::from_value(raw.clone()).context("Unexpected shape in the Portainer stack list")
}

/// Decode a raw container listing into typed summaries
pub fn decode_containers(raw: &Value) -> Result<Vec<ContainerSummary>> {
    serde_json::from_value(raw.clone()).context("Unexpected shape in the Portainer container list")
}
