//! Configuration management for stackatlas
//!
//! Two layers, kept deliberately separate:
//! - Credentials (Portainer URL + API key) come from the process
//!   environment and are never written to disk.
//! - Everything else lives in ~/.config/stackatlas/config.toml and is
//!   created with defaults on first run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Portainer API credentials, environment-only
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_url: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Read PORTAINER_URL and PORTAINER_API_KEY from the environment
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("PORTAINER_URL").context(
            "PORTAINER_URL is not set (Portainer base URL, e.g. https://192.168.0.62:9443)",
        )?;
        let api_key = env::var("PORTAINER_API_KEY")
            .context("PORTAINER_API_KEY is not set (create one under Portainer → My account)")?;
        Ok(Self::new(&api_url, &api_key))
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host part of synthesized dashboard URLs
    pub dashboard_host: String,
    /// Portainer endpoint (environment) id for the container listing
    pub endpoint_id: u32,
    /// Compose label that ties a container to its stack
    pub project_label: String,
    /// Fixed root tier of the inventory tree
    pub node_name: String,
    /// Fixed VM tier of the inventory tree
    pub vm_name: String,
    /// Directory all output files are written to
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dashboard_host: "192.168.0.62".to_string(),
            endpoint_id: 2,
            project_label: "com.docker.compose.project".to_string(),
            node_name: "N100".to_string(),
            vm_name: "LXC_0".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("stackatlas");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }
}
