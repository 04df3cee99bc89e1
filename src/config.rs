//! Configuration management for ChainTrace

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ChainError, Result};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Origins allowed by CORS. `"*"` mirrors the request origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            bind_addr: default_bind_addr(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Read `path`, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.network.allowed_origins.is_empty() {
        return Err(ChainError::Config(
            "network.allowed_origins must list at least one origin (use \"*\" for any)"
                .to_string(),
        ));
    }
    if config.network.bind_addr.is_empty() {
        return Err(ChainError::Config(
            "network.bind_addr must not be empty".to_string(),
        ));
    }

    Ok(config)
}

fn default_api_port() -> u16 {
    5000
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}
