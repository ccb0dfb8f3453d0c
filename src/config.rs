use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{sblog_debug, Error, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Simulated service latency for the built-in agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub simulate_latency: bool,
    pub hubspot_latency_ms: u64,
    pub notion_latency_ms: u64,
    pub gmail_latency_ms: u64,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            simulate_latency: true,
            hubspot_latency_ms: 1000,
            notion_latency_ms: 1500,
            gmail_latency_ms: 2000,
        }
    }
}

impl AgentsConfig {
    /// Latency to apply for an agent, or None when simulation is off.
    pub fn latency(&self, ms: u64) -> Option<Duration> {
        if self.simulate_latency && ms > 0 {
            Some(Duration::from_millis(ms))
        } else {
            None
        }
    }
}

impl Config {
    pub fn switchboard_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or(Error::NoHomeDir)?
            .join(".switchboard"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::switchboard_dir()?.join("switchboard.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        sblog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            sblog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        sblog_debug!(
            "Config loaded: server={}:{}, simulate_latency={}",
            config.server.host,
            config.server.port,
            config.agents.simulate_latency
        );
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
