//! Chain Manifests
//!
//! Declarations can be written down as JSON instead of built in code. A
//! manifest maps names to either a service reference (a string) or a
//! chain (an array of dependency names followed by an operation name).
//! Operation names are bound to functions through an [`OperationCatalog`].
//!
//! # Example
//!
//! ```rust
//! use chain_manifest::{ChainManifest, OperationCatalog};
//!
//! let manifest = ChainManifest::from_json_str(r#"{
//!     "declarations": {
//!         "base": "rate",
//!         "doubled": ["base", "double"]
//!     }
//! }"#).unwrap();
//!
//! let mut catalog: OperationCatalog<i64> = OperationCatalog::new();
//! catalog.register_sync("double", |args| Ok(args[0] * 2));
//!
//! let decls = manifest.compile(&catalog).unwrap();
//! assert_eq!(decls.len(), 2);
//! assert!(decls.get("base").unwrap().is_reference());
//! ```

#![deny(unsafe_code)]

pub mod catalog;
pub mod compiler;
pub mod errors;
pub mod manifest;
pub mod validator;

pub use catalog::OperationCatalog;
pub use compiler::compile;
pub use errors::{ManifestError, ManifestResult};
pub use manifest::{ChainManifest, RawDeclaration};
pub use validator::validate;
