//! Error types for loading listing configuration.
//!
//! Filtering, sorting and summarizing never fail: unknown fields read as
//! absent and unknown facet values match nothing. Only configuration loading
//! can go wrong.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`DashboardConfig`](crate::DashboardConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// YAML syntax or shape error.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or shape error.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither YAML nor JSON.
    #[error("unsupported configuration format '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    /// Parsed, but semantically inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A listing was requested that the configuration does not define.
    #[error("unknown listing '{0}'")]
    UnknownListing(String),
}

impl ConfigError {
    /// Create a validation error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
