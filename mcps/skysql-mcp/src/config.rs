//! Configuration loading for skysql-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variable SKYSQL_MCP_CONFIG_PATH
//! 2. $XDG_CONFIG_HOME/skysql-mcp/config.toml
//! 3. ./skysql-mcp.toml
//! 4. Default values
//!
//! `SKYSQL_API_URL` overrides the API base address after loading. The API key
//! is never part of the file; it is read from the environment whenever a
//! client is built.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream SkySQL API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// SkySQL REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base address of the SkySQL API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Connect + read budget for each request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Public IP echo service used by the allowlist tool
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,
}

fn default_base_url() -> String {
    "https://api.skysql.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "SKYSQL_API_KEY".to_string()
}

fn default_ip_echo_url() -> String {
    "https://checkip.amazonaws.com".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
            ip_echo_url: default_ip_echo_url(),
        }
    }
}

impl ApiConfig {
    /// Config pointing at an arbitrary API address, e.g. a mock server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Config {
    /// Load configuration from the first readable location, falling back to defaults
    pub fn load() -> Self {
        let mut config = Self::find_config_paths()
            .into_iter()
            .find_map(|path| Self::read_file(&path))
            .unwrap_or_else(|| {
                tracing::info!("No config file found, using defaults");
                Self::default()
            });

        if let Ok(url) = std::env::var("SKYSQL_API_URL") {
            config.api.base_url = url;
        }

        config
    }

    fn read_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                return None;
            }
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Candidate config file locations, in priority order
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("SKYSQL_MCP_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("skysql-mcp").join("config.toml"));
        }

        paths.push(PathBuf::from("skysql-mcp.toml"));

        paths
    }
}
