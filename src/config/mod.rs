//! # Configuration Management Module
//!
//! Centralized configuration for the KrishiQuest server with validation,
//! defaults, and persistence.
//!
//! The configuration is organized into logical sections:
//!
//! - [`ServerConfig`] - HTTP bind address and port
//! - [`StorageConfig`] - Data directory and seed catalog location
//! - [`LoggingConfig`] - Logging settings
//!
//! ## Configuration File Format
//!
//! KrishiQuest uses TOML format for human-readable configuration:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [storage]
//! data_dir = "./data"
//! seed_dir = "./data/seeds"
//!
//! [logging]
//! level = "info"
//! file = "krishiquest.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Directory holding quests.json, schemes.json, and market_prices.json
    /// used to seed empty catalogs at startup.
    #[serde(default = "default_seed_dir")]
    pub seed_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

fn default_seed_dir() -> String {
    "./data/seeds".to_string()
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                seed_dir: default_seed_dir(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("krishiquest.log".to_string()),
            },
        }
    }
}
