//! Service configuration
//!
//! One JSON file with a section per subsystem. Every field has a default,
//! so `{}` is a valid configuration.
//!
//! ```json
//! {
//!   "http":    { "host": "0.0.0.0", "port": 8080, "cors_origins": [] },
//!   "store":   { "backend": "sqlite", "path": "./students.db" },
//!   "cache":   { "backend": "memory" },
//!   "logging": { "level": "info", "format": "text" }
//! }
//! ```
//!
//! The cache section may instead name a Redis server:
//! `{ "backend": "redis", "url": "redis://127.0.0.1:6379/", "timeout_ms": 500 }`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheConfig;
use crate::http_server::HttpServerConfig;
use crate::observability::LoggingConfig;
use crate::storage::StoreConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later at runtime
    pub fn validate(&self) -> ConfigResult<()> {
        if self.http.port == 0 {
            return Err(ConfigError::Invalid("http.port must be > 0".to_string()));
        }
        if self.http.host.trim().is_empty() {
            return Err(ConfigError::Invalid("http.host must not be empty".to_string()));
        }

        if let StoreConfig::Sqlite { path } = &self.store {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("store.path must not be empty".to_string()));
            }
        }

        if let CacheConfig::Redis { url, timeout_ms } = &self.cache {
            if url.trim().is_empty() {
                return Err(ConfigError::Invalid("cache.url must not be empty".to_string()));
            }
            if *timeout_ms == 0 {
                return Err(ConfigError::Invalid("cache.timeout_ms must be > 0".to_string()));
            }
        }

        self.logging
            .filter()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    /// Pretty JSON, as written by `init`
    pub fn to_json_pretty(&self) -> String {
        // Plain structs and enums with string keys cannot fail to serialize.
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
