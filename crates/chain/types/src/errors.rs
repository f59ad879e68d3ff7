//! Error types for chain resolution

use crate::Name;
use std::sync::Arc;

/// Errors that can occur while planning or resolving a chain
///
/// Cloneable so one failure can be observed by every dependent that
/// awaited the failed declaration.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Cyclic dependency: {}", format_chain(.chain))]
    CyclicDependency { chain: Vec<Name> },

    #[error("Lookup failure: '{name}' is not provided by the service registry")]
    LookupFailure { name: Name },

    #[error("Computation '{name}' failed: {cause}")]
    ComputationFailure {
        name: Name,
        cause: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Resolution timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

impl ChainError {
    /// The cycle, if this is a structural error
    pub fn cycle(&self) -> Option<&[Name]> {
        match self {
            Self::CyclicDependency { chain } => Some(chain),
            _ => None,
        }
    }

    /// Name of the declaration or service the failure is attributed to
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::CyclicDependency { chain } => chain.first(),
            Self::LookupFailure { name } | Self::ComputationFailure { name, .. } => Some(name),
            Self::Timeout { .. } => None,
        }
    }

    /// Structural errors are detected before anything runs
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::CyclicDependency { .. })
    }
}

fn format_chain(chain: &[Name]) -> String {
    chain
        .iter()
        .map(Name::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type alias for chain operations
pub type ChainResult<T> = Result<T, ChainError>;
