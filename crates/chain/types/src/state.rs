//! Declaration lifecycle during a resolution run
//!
//! ```text
//! Unresolved ──► Pending ──► Running ──► Resolved
//!     │             │            │
//!     │             └────────────┴─────► Failed
//!     └──► Resolved | Failed            (references skip Pending/Running)
//! ```

use serde::{Deserialize, Serialize};

/// State of a single declaration within one resolution
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationState {
    /// Scheduled, nothing happened yet
    #[default]
    Unresolved,
    /// Waiting for dependencies
    Pending,
    /// Computation invoked
    Running,
    /// Value available
    Resolved,
    /// Lookup or computation failed, or a dependency failed
    Failed,
}

impl DeclarationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Failed)
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: DeclarationState) -> bool {
        use DeclarationState::*;
        matches!(
            (self, next),
            (Unresolved, Pending)
                | (Unresolved, Resolved)
                | (Unresolved, Failed)
                | (Pending, Running)
                | (Pending, Failed)
                | (Running, Resolved)
                | (Running, Failed)
        )
    }
}

impl std::fmt::Display for DeclarationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unresolved => "unresolved",
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Resolved => "resolved",
            Self::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}
