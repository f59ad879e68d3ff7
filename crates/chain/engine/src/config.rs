//! Resolver configuration

use serde::{Deserialize, Serialize};

/// What happens to in-flight declarations once one of them fails
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Drop every outstanding declaration on the first failure
    #[default]
    CancelOnFailure,
    /// Drive every declaration on its own task; unrelated branches still
    /// finish in the background after the caller has seen the failure
    LetAllFinish,
}

/// Configuration for a [`ChainResolver`](crate::ChainResolver)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Handling of in-flight work after a failure
    pub failure_policy: FailurePolicy,
    /// Maximum number of computations running at the same time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::CancelOnFailure,
            max_concurrency: None,
        }
    }
}

impl ResolverConfig {
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Limit concurrently running computations; zero is treated as one
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.failure_policy, FailurePolicy::CancelOnFailure);
        assert!(config.max_concurrency.is_none());
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let config = ResolverConfig::default().with_max_concurrency(0);
        assert_eq!(config.max_concurrency, Some(1));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"failure_policy": "let_all_finish"}"#).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::LetAllFinish);
        assert!(config.max_concurrency.is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ResolverConfig::default()
            .with_failure_policy(FailurePolicy::LetAllFinish)
            .with_max_concurrency(4);
        let json = serde_json::to_string(&config).unwrap();
        let restored: ResolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
