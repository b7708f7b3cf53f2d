//! Bridge configuration.
//!
//! Loaded from an optional TOML file, then overridden by command-line
//! flags in the binary. Every field has a default, so an empty file is a
//! valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::Directive;

use crate::bridge::BridgeOptions;
use crate::error::{BridgeError, BridgeResult};

/// Diagnostic output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line events.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Level for this crate's events, e.g. `info` or `debug`.
    pub level: String,
    /// Event format.
    pub format: LogFormat,
    /// Write events to stderr.
    pub stderr: bool,
    /// Append events to this file.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            stderr: true,
            file: None,
        }
    }
}

impl LogConfig {
    /// Filter directive scoping `level` to this crate.
    ///
    /// # Errors
    ///
    /// Returns an error if `level` is not a valid directive.
    pub fn directive(&self) -> BridgeResult<Directive> {
        format!("qtforge_bridge={}", self.level)
            .parse()
            .map_err(|e| BridgeError::Config(format!("invalid log.level '{}': {e}", self.level)))
    }
}

/// Main bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Stop after acknowledging a `shutdown` request.
    pub shutdown_on_request: bool,
    /// Diagnostic log settings.
    pub log: LogConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            shutdown_on_request: true,
            log: LogConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            BridgeError::Config(format!(
                "failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> BridgeResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| BridgeError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> BridgeResult<()> {
        if self.log.level.trim().is_empty() {
            return Err(BridgeError::Config("log.level cannot be empty".to_string()));
        }

        self.log.directive()?;

        if let Some(file) = &self.log.file {
            if file.as_os_str().is_empty() {
                return Err(BridgeError::Config("log.file cannot be empty".to_string()));
            }
        }

        Ok(())
    }

    /// Loop options derived from this configuration.
    pub fn bridge_options(&self) -> BridgeOptions {
        BridgeOptions {
            shutdown_on_request: self.shutdown_on_request,
        }
    }
}
