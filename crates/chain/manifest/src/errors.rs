//! Manifest error types

/// Errors that can occur while loading, validating or compiling a manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty name in {0}")]
    EmptyName(String),

    #[error("Declaration '{0}' is an empty list")]
    EmptyDeclaration(String),

    #[error("Declaration '{declaration}' lists dependency '{dependency}' more than once")]
    DuplicateDependency {
        declaration: String,
        dependency: String,
    },

    #[error("Declaration '{declaration}' uses unknown operation '{operation}'")]
    UnknownOperation {
        declaration: String,
        operation: String,
    },
}

/// Result type alias for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;
