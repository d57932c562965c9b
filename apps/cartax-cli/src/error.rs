//! CLI error types.

use std::path::PathBuf;

use cartax_core::TaxError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Everything that can stop a pricing run.
#[derive(Debug, Error)]
pub enum CliError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Config file is not valid TOML or has wrong field types.
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A config value (file or environment) is out of its allowed set.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input document could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input document is not the expected JSON shape.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Output could not be serialized.
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    /// The tax pass itself failed.
    #[error(transparent)]
    Tax(#[from] TaxError),
}
