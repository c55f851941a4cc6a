//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching config/magpie.toml.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::adapters::magpie::{MagpieConfig, API_URL_ENV, DEFAULT_API_BASE_URL};
use crate::domain::token::DEFAULT_NETWORK;

/// Main configuration structure matching config/magpie.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Magpie API section
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
    /// API base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSection {
    /// Get base URL with environment variable override
    /// Checks MAGPIE_API_URL env var first, falls back to config value
    pub fn get_base_url(&self) -> String {
        effective_base_url(std::env::var(API_URL_ENV).ok(), &self.base_url)
    }
}

/// Override wins when it is non-blank; both sides are trimmed
fn effective_base_url(env_override: Option<String>, configured: &str) -> String {
    env_override
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| configured.trim().to_string())
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    if base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "api.base_url cannot be empty".to_string(),
        ));
    }

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must be an http(s) URL, got {}",
            base_url
        )));
    }

    Ok(())
}

impl From<&ApiSection> for MagpieConfig {
    fn from(api: &ApiSection) -> Self {
        Self {
            timeout: Duration::from_secs(api.timeout_secs),
            ..MagpieConfig::with_base_url(api.get_base_url())
        }
    }
}

/// Token catalog section
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSection {
    /// Network used by scenarios that do not name one
    #[serde(default = "default_network")]
    pub default_network: String,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            default_network: default_network(),
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_network() -> String {
    DEFAULT_NETWORK.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load configuration, falling back to defaults when the file does not exist
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }
    load_config(path)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(self.api.base_url.trim())?;

        // MAGPIE_API_URL replaces the file value at runtime
        let effective = self.api.get_base_url();
        validate_base_url(&effective).map_err(|_| {
            ConfigError::ValidationError(format!(
                "{} must be an http(s) URL, got {}",
                API_URL_ENV, effective
            ))
        })?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be > 0".to_string(),
            ));
        }

        if self.catalog.default_network.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog.default_network cannot be empty".to_string(),
            ));
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of trace/debug/info/warn/error, got {}",
                self.logging.level
            )));
        }

        Ok(())
    }
}
