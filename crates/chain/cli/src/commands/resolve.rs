//! `chain resolve`: resolve every declaration of a manifest

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{self, compact, print_success, OutputFormat};
use chain_engine::{ChainResolver, ResolutionReport, ResolvedChain, StaticRegistry};
use chain_types::{ChainError, ChainResult};
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tabled::Tabled;

/// Table row for resolved values
#[derive(Debug, Serialize, Tabled)]
struct ValueRow {
    name: String,
    value: String,
}

/// Table row for the per-declaration report
#[derive(Debug, Serialize, Tabled)]
struct StateRow {
    name: String,
    state: String,
    transitions: usize,
    detail: String,
}

fn value_rows(resolved: &ResolvedChain<Value>) -> Vec<ValueRow> {
    resolved
        .iter()
        .map(|(name, value)| ValueRow {
            name: name.to_string(),
            value: compact(value),
        })
        .collect()
}

fn state_rows(report: &ResolutionReport) -> Vec<StateRow> {
    report
        .states
        .iter()
        .map(|(name, state)| {
            let transitions = report.transitions_for(name.as_str());
            let detail = transitions
                .iter()
                .rev()
                .find_map(|record| record.detail.clone())
                .unwrap_or_else(|| "-".into());
            StateRow {
                name: name.to_string(),
                state: state.to_string(),
                transitions: transitions.len(),
                detail,
            }
        })
        .collect()
}

/// Bound `future` by an optional timeout
async fn bounded<T>(timeout_ms: Option<u64>, future: impl Future<Output = T>) -> ChainResult<T> {
    match timeout_ms {
        Some(ms) => tokio::time::timeout(Duration::from_millis(ms), future)
            .await
            .map_err(|_| ChainError::Timeout { elapsed_ms: ms }),
        None => Ok(future.await),
    }
}

/// Execute the resolve command
pub async fn execute(
    file: &Path,
    timeout_ms: Option<u64>,
    with_report: bool,
    config: &CliConfig,
    format: OutputFormat,
) -> CliResult<()> {
    let (manifest, declarations) = super::load(file)?;
    let registry: StaticRegistry<Value> = manifest
        .services
        .iter()
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect();
    let resolver = ChainResolver::new(registry).with_config(config.resolver.clone());
    let timeout_ms = timeout_ms.or(config.timeout_ms);

    let (outcome, report) = if with_report {
        let (outcome, report) = bounded(timeout_ms, resolver.resolve_with_report(&declarations)).await?;
        (outcome, Some(report))
    } else {
        (bounded(timeout_ms, resolver.resolve(&declarations)).await?, None)
    };

    let resolved = match outcome {
        Ok(resolved) => resolved,
        Err(err) => {
            if let Some(report) = &report {
                print_report(report, format)?;
            }
            return Err(err.into());
        }
    };

    match format {
        OutputFormat::Table => {
            if let Some(report) = &report {
                print_report(report, format)?;
            }
            output::print_output(value_rows(&resolved), format)?;
            print_success(&format!(
                "Resolved {} declarations ({})",
                resolved.len(),
                resolved.resolution_id().short()
            ));
        }
        OutputFormat::Json => {
            let mut document = json!({
                "resolution_id": resolved.resolution_id(),
                "values": resolved.values(),
            });
            if let Some(report) = &report {
                document["report"] = serde_json::to_value(report)?;
            }
            output::print_single(&document)?;
        }
    }
    Ok(())
}

fn print_report(report: &ResolutionReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => output::print_output(state_rows(report), format),
        OutputFormat::Json => output::print_single(&json!({ "report": report })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_types::{Declaration, Declarations, DeclarationState};

    #[tokio::test]
    async fn test_bounded_times_out() {
        let err = bounded(Some(10), std::future::pending::<()>()).await.unwrap_err();
        assert!(matches!(err, ChainError::Timeout { elapsed_ms: 10 }));
    }

    #[tokio::test]
    async fn test_bounded_without_limit() {
        assert_eq!(bounded(None, async { 5 }).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_rows_from_failed_resolution() {
        let decls: Declarations<Value> = Declarations::new()
            .with("ok", Declaration::constant(json!(1)))
            .with("gone", Declaration::reference("missing"));
        let resolver = ChainResolver::new(StaticRegistry::<Value>::new());

        let (outcome, report) = resolver.resolve_with_report(&decls).await;
        assert!(outcome.is_err());

        let rows = state_rows(&report);
        let gone = rows.iter().find(|row| row.name == "gone").unwrap();
        assert_eq!(gone.state, DeclarationState::Failed.to_string());
        assert!(gone.detail.contains("missing"));
    }

    #[tokio::test]
    async fn test_value_rows_in_declaration_order() {
        let decls: Declarations<Value> = Declarations::new()
            .with("b", Declaration::constant(json!("two")))
            .with("a", Declaration::constant(json!([1])));
        let resolved = ChainResolver::new(StaticRegistry::<Value>::new())
            .resolve(&decls)
            .await
            .unwrap();

        let rows = value_rows(&resolved);
        assert_eq!(rows[0].name, "b");
        assert_eq!(rows[0].value, "two");
        assert_eq!(rows[1].value, "[1]");
    }
}
