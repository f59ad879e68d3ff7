//! Chain Domain Types
//!
//! A chain is a set of **named declarations** that depend on each other.
//! Each declaration either references a service held by an external
//! registry, or computes its value from the values of other declarations.
//!
//! # Key Concepts
//!
//! - **Name**: The key a declaration (or external service) is known by.
//! - **Declaration**: Either a `Reference` to a registry entry, or a
//!   `Computation` listing its dependencies and the function to run once
//!   they have resolved.
//! - **Declarations**: The ordered set handed to a resolver for one run.
//! - **DeclarationState**: Lifecycle of a single declaration during a run.
//! - **ChainError**: Structural (cycle) and value-level (lookup,
//!   computation) failures.
//!
//! # Example
//!
//! ```rust
//! use chain_types::*;
//!
//! let decls: Declarations<i64> = Declarations::new()
//!     .with("base", Declaration::reference("config.base"))
//!     .with("double", Declaration::sync(["base"], |args| Ok(args[0] * 2)));
//!
//! assert_eq!(decls.len(), 2);
//! assert_eq!(decls.get("double").unwrap().dependencies(), &[Name::new("base")]);
//! ```

#![deny(unsafe_code)]

mod declaration;
mod errors;
mod name;
mod state;

pub use declaration::*;
pub use errors::*;
pub use name::*;
pub use state::*;
