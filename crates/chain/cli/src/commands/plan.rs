//! `chain plan`: cycle check and depth listing

use crate::error::CliResult;
use crate::output::{self, print_success, OutputFormat};
use chain_engine::{plan, ChainPlan};
use chain_types::{Declarations, Name};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tabled::Tabled;

/// Table row for plan display
#[derive(Debug, Serialize, Tabled)]
struct PlanRow {
    /// Declared or external name
    name: String,
    /// reference, computation or external
    kind: String,
    /// Longest dependency path to a leaf
    depth: usize,
    /// Dependencies in argument order
    dependencies: String,
}

fn rows(declarations: &Declarations<Value>, plan: &ChainPlan) -> Vec<PlanRow> {
    let external = plan.external().iter().map(|name| PlanRow {
        name: name.to_string(),
        kind: "external".into(),
        depth: 0,
        dependencies: "-".into(),
    });

    let declared = plan.order().iter().filter_map(|name| {
        let declaration = declarations.get(name.as_str())?;
        let dependencies = declaration.dependencies();
        Some(PlanRow {
            name: name.to_string(),
            kind: declaration.kind().into(),
            depth: plan.depth(name.as_str()).unwrap_or(0),
            dependencies: if dependencies.is_empty() {
                "-".into()
            } else {
                dependencies
                    .iter()
                    .map(Name::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        })
    });

    external.chain(declared).collect()
}

/// Execute the plan command
pub fn execute(file: &Path, format: OutputFormat) -> CliResult<()> {
    let (_, declarations) = super::load(file)?;
    let plan = plan(&declarations)?;

    match format {
        OutputFormat::Table => {
            output::print_output(rows(&declarations, &plan), format)?;
            print_success(&format!(
                "No cycles: {} declarations, max depth {}",
                plan.len(),
                plan.max_depth()
            ));
        }
        OutputFormat::Json => output::print_single(&plan)?,
    }
    Ok(())
}
