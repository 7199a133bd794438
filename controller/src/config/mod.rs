pub mod manager;
pub use manager::ConfigManager;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::constants::defaults;
use crate::drainer::Node;
use crate::errors::ConfigError;
use crate::scheduler::ScheduleSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_drain_period")]
    pub drain_period_seconds: u64,
    #[serde(default = "default_condition_timeout")]
    pub condition_timeout_seconds: u64,
    #[serde(default = "default_condition_retry")]
    pub condition_retry_millis: u64,
    pub event_webhook_url: Option<String>,
    // Populated from individual server config files
    #[serde(skip)]
    pub servers: HashMap<String, ServerConfig>,
    #[serde(skip)]
    pub nodes: HashMap<String, NodeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    #[serde(default = "default_agent_port")]
    pub agent_port: u16,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfigFile {
    pub server: ServerConfig,
    #[serde(default)]
    pub nodes: HashMap<String, NodeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub server_host: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub description: Option<String>,
}

fn default_drain_period() -> u64 {
    defaults::DRAIN_PERIOD_SECONDS
}

fn default_condition_timeout() -> u64 {
    defaults::CONDITION_TIMEOUT_SECONDS
}

fn default_condition_retry() -> u64 {
    defaults::CONDITION_RETRY_MILLIS
}

fn default_agent_port() -> u16 {
    defaults::AGENT_PORT
}

fn default_enabled() -> bool {
    true
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drain_period_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "drain_period_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.condition_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "condition_timeout_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.condition_retry_millis == 0
            || self.condition_retry_millis >= self.condition_timeout_seconds * 1000
        {
            return Err(ConfigError::InvalidValue {
                field: "condition_retry_millis".to_string(),
                reason: "must be non-zero and shorter than condition_timeout_seconds".to_string(),
            });
        }

        for (node_name, node) in &self.nodes {
            if node.server_host.is_empty() {
                return Err(ConfigError::MissingRequired {
                    field: format!("nodes.{}.server_host", node_name),
                });
            }
            if !self.servers.contains_key(&node.server_host) {
                return Err(ConfigError::InvalidValue {
                    field: format!("nodes.{}.server_host", node_name),
                    reason: format!("unknown server '{}'", node.server_host),
                });
            }
        }

        Ok(())
    }

    pub fn schedule_settings(&self) -> ScheduleSettings {
        ScheduleSettings {
            period: Duration::from_secs(self.drain_period_seconds),
            condition_timeout: Duration::from_secs(self.condition_timeout_seconds),
            condition_retry_period: Duration::from_millis(self.condition_retry_millis),
        }
    }

    /// Resolve an enabled node from the inventory
    pub fn node(&self, node_name: &str) -> Option<Node> {
        self.nodes
            .get(node_name)
            .filter(|node| node.enabled)
            .map(|node| Node::new(node_name, node.server_host.clone()))
    }
}
