//! Chain Resolver Runtime
//!
//! The chain engine turns a set of interdependent declarations into
//! values. It checks the dependency graph for cycles before anything
//! runs, orders declarations by depth, and then resolves every
//! declaration concurrently: each computation waits for exactly the
//! values it depends on and runs once.
//!
//! # Architecture
//!
//! The [`ChainResolver`] composes specialized components:
//!
//! - [`ServiceRegistry`]: Resolves external references ([`StaticRegistry`], [`FnRegistry`])
//! - [`planner`]: Cycle detection, depth computation and scheduling order
//! - [`ResolutionTracker`]: Records per-declaration state transitions
//! - [`ResolverConfig`]: Failure policy and concurrency limits
//!
//! # Example
//!
//! ```rust
//! use chain_engine::{ChainResolver, StaticRegistry};
//! use chain_types::{Declaration, Declarations};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = StaticRegistry::new().with("rate", 3);
//! let resolver = ChainResolver::new(registry);
//!
//! let decls = Declarations::new()
//!     .with("rate", Declaration::reference("rate"))
//!     .with("a", Declaration::constant(1))
//!     .with("b", Declaration::sync(["a", "rate"], |args| Ok(args[0] + args[1])));
//!
//! let resolved = resolver.resolve(&decls).await.unwrap();
//! assert_eq!(resolved.get("b"), Some(&4));
//! # }
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod planner;
pub mod registry;
pub mod resolver;
pub mod tracker;

// Re-export main types
pub use config::{FailurePolicy, ResolverConfig};
pub use planner::{plan, ChainPlan};
pub use registry::{FnRegistry, ServiceRegistry, StaticRegistry};
pub use resolver::{resolve, ChainResolver, ResolvedChain};
pub use tracker::{ResolutionReport, ResolutionTracker, TransitionRecord};
