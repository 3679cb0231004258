//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Fairness table collector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Whether the API may trigger collection runs
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// First page of the fairness table
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Pause between consecutive pages
    #[serde(default = "default_page_delay")]
    pub page_delay_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://solpot.com/fairness/jackpot".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_page_delay() -> u64 {
    2000
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            page_delay_ms: default_page_delay(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Live game cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveGameConfig {
    /// Age after which a pushed live game is reported as unavailable
    #[serde(default = "default_stale_after")]
    pub stale_after_seconds: u64,
}

fn default_stale_after() -> u64 {
    30
}

impl Default for LiveGameConfig {
    fn default() -> Self {
        Self {
            stale_after_seconds: default_stale_after(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub collector: CollectorConfig,

    #[serde(default)]
    pub live_game: LiveGameConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            collector: CollectorConfig::default(),
            live_game: LiveGameConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.collector.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Collector timeout must be greater than 0".to_string(),
            ));
        }

        if let Err(e) = Url::parse(&self.collector.base_url) {
            return Err(ConfigError::ValidationError(format!(
                "Collector base_url {:?} is not a valid URL: {}",
                self.collector.base_url, e
            )));
        }

        if self.live_game.stale_after_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Live game stale_after_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
