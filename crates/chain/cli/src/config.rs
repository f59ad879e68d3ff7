//! CLI configuration

use crate::error::{CliError, CliResult};
use chain_engine::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
///
/// ```toml
/// timeout_ms = 5000
///
/// [resolver]
/// failure_policy = "let_all_finish"
/// max_concurrency = 8
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CliConfig {
    /// Upper bound for a whole resolution, in milliseconds
    pub timeout_ms: Option<u64>,

    /// Resolver failure policy and concurrency
    pub resolver: ResolverConfig,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&contents)
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Ok(CliConfig::default())
        }
    }

    pub fn from_toml(contents: &str) -> CliResult<Self> {
        toml::from_str(contents).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("chain").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_engine::FailurePolicy;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.timeout_ms.is_none());
        assert_eq!(config.resolver, ResolverConfig::default());
    }

    #[test]
    fn test_load_missing_config() {
        let config = CliConfig::load(Some("/nonexistent/path/config.toml")).unwrap();
        assert!(config.timeout_ms.is_none());
    }

    #[test]
    fn test_parse_resolver_table() {
        let config = CliConfig::from_toml(
            r#"
            timeout_ms = 250

            [resolver]
            failure_policy = "let_all_finish"
            max_concurrency = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.timeout_ms, Some(250));
        assert_eq!(config.resolver.failure_policy, FailurePolicy::LetAllFinish);
        assert_eq!(config.resolver.max_concurrency, Some(2));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let err = CliConfig::from_toml("[resolver]\nfailure_policy = \"sometimes\"").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
