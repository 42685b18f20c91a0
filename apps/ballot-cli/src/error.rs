//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Everything that can stop the CLI before it prints a report.
///
/// Refused votes and registrations are not errors here; they are part of
/// the report.
#[derive(Debug, Error)]
pub enum CliError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// An environment override could not be parsed.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// The merged configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad command line.
    #[error("{0}")]
    Usage(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
