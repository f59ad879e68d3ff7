//! Compiler: manifest to declarations
//!
//! Validates the manifest, then binds every chain's trailing operation
//! name to a function from the catalog.

use crate::catalog::OperationCatalog;
use crate::errors::{ManifestError, ManifestResult};
use crate::manifest::{ChainManifest, RawDeclaration};
use crate::validator;
use chain_types::{Declaration, Declarations};

/// Compile a manifest into declarations ready for resolution
pub fn compile<V: 'static>(
    manifest: &ChainManifest,
    catalog: &OperationCatalog<V>,
) -> ManifestResult<Declarations<V>> {
    validator::validate(manifest)?;

    let mut declarations = Declarations::new();
    for (name, raw) in &manifest.declarations {
        let declaration = match raw {
            RawDeclaration::Reference(target) => Declaration::reference(target.as_str()),
            RawDeclaration::Chain(items) => {
                let Some((operation, dependencies)) = items.split_last() else {
                    return Err(ManifestError::EmptyDeclaration(name.clone()));
                };
                let function =
                    catalog
                        .get(operation)
                        .ok_or_else(|| ManifestError::UnknownOperation {
                            declaration: name.clone(),
                            operation: operation.clone(),
                        })?;
                Declaration::from_fn(dependencies.iter().map(String::as_str), function)
            }
        };
        declarations.insert(name.as_str(), declaration);
    }

    tracing::debug!(
        declarations = declarations.len(),
        services = manifest.services.len(),
        "Manifest compiled"
    );
    Ok(declarations)
}

impl ChainManifest {
    /// Compile this manifest against `catalog`
    pub fn compile<V: 'static>(
        &self,
        catalog: &OperationCatalog<V>,
    ) -> ManifestResult<Declarations<V>> {
        compile(self, catalog)
    }
}
