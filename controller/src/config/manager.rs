use super::{Config, ServerConfigFile};
use crate::errors::ConfigError;
use anyhow::{anyhow, Result};
use glob::glob;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        config.validate()?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let main_config_content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: main_config_path.clone(),
                reason: e.to_string(),
            })?;

        let mut config: Config =
            toml::from_str(&main_config_content).map_err(|e| ConfigError::ParseError {
                reason: format!("{}: {}", main_config_path, e),
            })?;

        // Every other file describes one server and the nodes it hosts
        let pattern = format!("{}/*.toml", config_dir);
        let mut server_configs = HashMap::new();
        let mut all_nodes = HashMap::new();

        for entry in glob(&pattern).map_err(|e| anyhow!("Glob pattern error: {}", e))? {
            let path = entry.map_err(|e| anyhow!("Glob entry error: {}", e))?;
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("Invalid filename"))?;

            if filename == "main.toml" {
                continue;
            }

            let server_name = filename
                .strip_suffix(".toml")
                .ok_or_else(|| anyhow!("Invalid config filename: {}", filename))?;

            debug!("Loading server config: {}", path.display());

            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| ConfigError::LoadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let server_config_file: ServerConfigFile =
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    reason: format!("{}: {}", path.display(), e),
                })?;

            server_configs.insert(server_name.to_string(), server_config_file.server);

            for (node_name, mut node_config) in server_config_file.nodes {
                node_config.server_host = server_name.to_string();

                // Don't double-prefix names that already carry the server name
                let final_node_name = if node_name.starts_with(&format!("{}-", server_name)) {
                    node_name
                } else {
                    format!("{}-{}", server_name, node_name)
                };

                all_nodes.insert(final_node_name, node_config);
            }
        }

        config.servers = server_configs;
        config.nodes = all_nodes;

        info!(
            "Loaded {} servers, {} nodes (drain period {}s)",
            config.servers.len(),
            config.nodes.len(),
            config.drain_period_seconds
        );

        Ok(config)
    }
}
