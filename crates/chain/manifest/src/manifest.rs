//! Manifest document model
//!
//! ```json
//! {
//!   "services": { "base_url": "https://example.org" },
//!   "declarations": {
//!     "url": "base_url",
//!     "page": ["url", "fetch"],
//!     "summary": ["page", "url", "concat"]
//!   }
//! }
//! ```
//!
//! A string declaration references a service. An array lists dependency
//! names followed by the name of the operation that combines them.

use crate::errors::ManifestResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single declaration as written in the document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDeclaration {
    /// Name of the service to look up
    Reference(String),
    /// Dependency names, then the operation name
    Chain(Vec<String>),
}

impl RawDeclaration {
    /// Split a chain into `(dependencies, operation)`
    ///
    /// `None` for references and for empty chains.
    pub fn split(&self) -> Option<(&[String], &str)> {
        match self {
            Self::Reference(_) => None,
            Self::Chain(items) => items
                .split_last()
                .map(|(operation, dependencies)| (dependencies, operation.as_str())),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

/// Declarations loaded from JSON, in document order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainManifest {
    /// Values made available to references, when the document carries them
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub services: IndexMap<String, serde_json::Value>,

    pub declarations: IndexMap<String, RawDeclaration>,
}

impl ChainManifest {
    pub fn from_json_str(input: &str) -> ManifestResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_value(value: serde_json::Value) -> ManifestResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a manifest file
    pub fn from_path(path: impl AsRef<Path>) -> ManifestResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn get(&self, name: &str) -> Option<&RawDeclaration> {
        self.declarations.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
