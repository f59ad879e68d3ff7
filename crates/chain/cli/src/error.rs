//! CLI error types

use chain_manifest::ManifestError;
use chain_types::ChainError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Manifest could not be loaded or compiled
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Planning or resolution failed
    #[error("{0}")]
    Chain(#[from] ChainError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
