//! Configuration for Rsh/Rsb tools
//!
//! Loaded from a TOML file; every section and field has a default, so an
//! empty file is a valid configuration.
//!
//! # Example
//! ```toml
//! [store]
//! codepage = "windows-1251"
//! writable = false
//!
//! [logging]
//! filter = "rsh_rs=debug"
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::format::Codepage;
use crate::store::StoreOptions;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Unknown codepage: {0}")]
    UnknownCodepage(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.store.codepage()?;
        Ok(config)
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

/// How Rsb files are opened
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Codepage label of the text header and string fields
    #[serde(default = "default_codepage")]
    pub codepage: String,

    /// Open files for writing (needed to update event data)
    #[serde(default = "default_writable")]
    pub writable: bool,
}

fn default_codepage() -> String {
    "windows-1251".to_string()
}

fn default_writable() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            codepage: default_codepage(),
            writable: default_writable(),
        }
    }
}

impl StoreConfig {
    /// Resolve the configured codepage label
    pub fn codepage(&self) -> Result<Codepage, ConfigError> {
        Codepage::for_label(&self.codepage)
            .ok_or_else(|| ConfigError::UnknownCodepage(self.codepage.clone()))
    }

    /// Options for [`EventStore::open_with`](crate::store::EventStore::open_with)
    pub fn to_options(&self) -> Result<StoreOptions, ConfigError> {
        Ok(StoreOptions {
            codepage: self.codepage()?,
            writable: self.writable,
        })
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "rsh_rs=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}
