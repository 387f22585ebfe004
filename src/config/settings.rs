//! Application settings loaded from `config.toml`.
//!
//! Every field has a default so the file is optional. Secrets never live in the
//! file: the advisory API key is read from the environment (`.env` is loaded by
//! the binary through `dotenvy`).

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable holding the advisory API key.
pub const ADVISORY_API_KEY_VAR: &str = "ADVISORY_API_KEY";
/// Environment variable overriding `[sync] base_url`.
pub const SYNC_BASE_URL_VAR: &str = "SYNC_BASE_URL";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Local persistence settings
    pub storage: StorageConfig,
    /// Cloud sync settings
    pub sync: SyncConfig,
    /// Advisory service settings
    pub advisory: AdvisoryConfig,
}

/// `[storage]` section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// `SeaORM` connection URL; `DATABASE_URL` overrides it
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// `[sync]` section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    /// Key/value endpoint; blobs live at `<base_url>/<code>`
    pub base_url: String,
    /// First segment of generated sync codes
    pub code_prefix: String,
    /// Quiet period before an automatic push, in milliseconds
    pub debounce_ms: u64,
    /// Per-request timeout, in seconds
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.keyvalue.xyz".to_string(),
            code_prefix: "ICPBB".to_string(),
            debounce_ms: 2000,
            request_timeout_secs: 30,
        }
    }
}

impl SyncConfig {
    /// Debounce delay as a [`Duration`].
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `[advisory]` section
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Base URL of the text-generation API
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// Language the advice should be written in
    pub language: String,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            language: "Brazilian Portuguese".to_string(),
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads configuration from `path`, or the defaults when the file does not exist.
///
/// # Errors
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if path_ref.exists() {
        load_config(path_ref)
    } else {
        info!("No config file at {:?}, using defaults", path_ref);
        Ok(AppConfig::default())
    }
}

/// Applies environment overrides (`DATABASE_URL`, `SYNC_BASE_URL`) to a loaded config.
#[must_use]
pub fn with_env_overrides(mut config: AppConfig) -> AppConfig {
    config.storage.database_url =
        crate::config::database::get_database_url(&config.storage.database_url);
    if let Ok(base_url) = std::env::var(SYNC_BASE_URL_VAR) {
        config.sync.base_url = base_url;
    }
    config
}

/// Reads the advisory API key from the environment, if set and non-empty.
#[must_use]
pub fn advisory_api_key() -> Option<String> {
    std::env::var(ADVISORY_API_KEY_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty())
}
