//! CLI command implementations

pub mod plan;
pub mod resolve;

use crate::error::CliResult;
use crate::operations;
use chain_manifest::ChainManifest;
use chain_types::Declarations;
use serde_json::Value;
use std::path::Path;

/// Load a manifest file and compile it against the built-in operations
fn load(file: &Path) -> CliResult<(ChainManifest, Declarations<Value>)> {
    let manifest = ChainManifest::from_path(file)?;
    let declarations = manifest.compile(&operations::builtin_catalog())?;
    tracing::debug!(
        file = %file.display(),
        declarations = declarations.len(),
        "Manifest loaded"
    );
    Ok((manifest, declarations))
}
