//! Structural checks on a manifest, independent of any operation catalog
//!
//! Cycles and missing services are left to the resolver; they depend on
//! the declarations as a whole and on the registry at run time.

use crate::errors::{ManifestError, ManifestResult};
use crate::manifest::{ChainManifest, RawDeclaration};
use std::collections::HashSet;

/// Validate every declaration, stopping at the first problem
pub fn validate(manifest: &ChainManifest) -> ManifestResult<()> {
    for (name, declaration) in &manifest.declarations {
        if name.is_empty() {
            return Err(ManifestError::EmptyName("declaration list".into()));
        }
        validate_declaration(name, declaration)?;
    }
    Ok(())
}

fn validate_declaration(name: &str, declaration: &RawDeclaration) -> ManifestResult<()> {
    match declaration {
        RawDeclaration::Reference(target) => {
            if target.is_empty() {
                return Err(ManifestError::EmptyName(format!("reference '{}'", name)));
            }
        }
        RawDeclaration::Chain(items) => {
            let Some((operation, dependencies)) = items.split_last() else {
                return Err(ManifestError::EmptyDeclaration(name.to_string()));
            };
            if operation.is_empty() {
                return Err(ManifestError::EmptyName(format!("operation of '{}'", name)));
            }

            let mut seen = HashSet::new();
            for dependency in dependencies {
                if dependency.is_empty() {
                    return Err(ManifestError::EmptyName(format!("dependencies of '{}'", name)));
                }
                if !seen.insert(dependency.as_str()) {
                    return Err(ManifestError::DuplicateDependency {
                        declaration: name.to_string(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}
