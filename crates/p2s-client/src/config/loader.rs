//! Configuration loader for YAML files

use std::path::Path;
use tokio::fs;

use crate::config::types::ClientConfig;
use crate::errors::{ClientError, ClientResult};

/// Loads and validates [`ClientConfig`] from YAML.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file.
    ///
    /// Relative `files` entries and a relative output directory are resolved
    /// against the directory containing the configuration file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> ClientResult<ClientConfig> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            ClientError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::from_str(&content)?;

        if let Some(base_dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            for file in config.files.iter_mut() {
                if file.is_relative() {
                    *file = base_dir.join(&*file);
                }
            }
            if config.output.directory.is_relative() {
                config.output.directory = base_dir.join(&config.output.directory);
            }
        }

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_str(content: &str) -> ClientResult<ClientConfig> {
        // An empty document is a valid, all-defaults configuration.
        let config: ClientConfig = if content.trim().is_empty() {
            ClientConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| ClientError::Config(format!("Failed to parse YAML config: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }
}
