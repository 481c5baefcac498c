//! Logging setup
//!
//! Installs a `tracing-subscriber` fmt subscriber. Output is one line per
//! event, either human-readable text or structured JSON.
//!
//! `RUST_LOG`, when set, overrides the configured level.
//!
//! # Usage
//!
//! ```ignore
//! use student_registry::observability::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::default())?;
//! tracing::info!(port = 8080, "starting");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `student_registry=debug,tower_http=info`
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level into a filter
    pub fn filter(&self) -> Result<EnvFilter, ObservabilityError> {
        EnvFilter::try_new(&self.level)
            .map_err(|e| ObservabilityError::InvalidFilter(self.level.clone(), e.to_string()))
    }
}

/// Logging setup errors
#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Invalid log filter '{0}': {1}")]
    InvalidFilter(String, String),

    #[error("Could not install log subscriber: {0}")]
    Install(String),
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config.filter()?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| ObservabilityError::Install(e.to_string()))
}
