//! Declarations: what a chain is made of
//!
//! A declaration is either a reference to an external service or a
//! computation over the values of other declarations. Computations are
//! asynchronous and fallible; their arguments arrive positionally, in the
//! order the dependencies were declared.

use crate::Name;
use futures::future::{BoxFuture, FutureExt};
use indexmap::IndexMap;
use std::future::Future;
use std::sync::Arc;

/// Error type returned by computation functions
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Future produced by a computation function
pub type ComputationFuture<V> = BoxFuture<'static, Result<V, BoxError>>;

/// Shared computation function: positional dependency values in, value out
pub type ComputationFn<V> = Arc<dyn Fn(Vec<V>) -> ComputationFuture<V> + Send + Sync>;

// ── Computation ──────────────────────────────────────────────────────

/// A computation and the names it depends on
pub struct Computation<V> {
    dependencies: Vec<Name>,
    function: ComputationFn<V>,
}

impl<V> Computation<V> {
    pub fn new<I, N>(dependencies: I, function: ComputationFn<V>) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            function,
        }
    }

    /// Dependency names, in argument order
    pub fn dependencies(&self) -> &[Name] {
        &self.dependencies
    }

    /// Invoke the function with resolved dependency values
    pub fn invoke(&self, args: Vec<V>) -> ComputationFuture<V> {
        (self.function)(args)
    }
}

impl<V> Clone for Computation<V> {
    fn clone(&self) -> Self {
        Self {
            dependencies: self.dependencies.clone(),
            function: Arc::clone(&self.function),
        }
    }
}

impl<V> std::fmt::Debug for Computation<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computation")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

// ── Declaration ──────────────────────────────────────────────────────

/// A single named entry of a chain
pub enum Declaration<V> {
    /// Resolved by looking the target up in the service registry
    Reference(Name),
    /// Resolved by running a computation over other declarations
    Computation(Computation<V>),
}

impl<V> Declaration<V> {
    /// Reference to an external service
    pub fn reference(target: impl Into<Name>) -> Self {
        Self::Reference(target.into())
    }

    /// Asynchronous computation
    pub fn computation<I, N, F, Fut>(dependencies: I, function: F) -> Self
    where
        V: 'static,
        I: IntoIterator<Item = N>,
        N: Into<Name>,
        F: Fn(Vec<V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
    {
        let function: ComputationFn<V> = Arc::new(move |args| function(args).boxed());
        Self::Computation(Computation::new(dependencies, function))
    }

    /// Synchronous computation, wrapped into a ready future
    pub fn sync<I, N, F>(dependencies: I, function: F) -> Self
    where
        V: Send + 'static,
        I: IntoIterator<Item = N>,
        N: Into<Name>,
        F: Fn(Vec<V>) -> Result<V, BoxError> + Send + Sync + 'static,
    {
        let function: ComputationFn<V> =
            Arc::new(move |args| futures::future::ready(function(args)).boxed());
        Self::Computation(Computation::new(dependencies, function))
    }

    /// Computation built from an already shared function
    pub fn from_fn<I, N>(dependencies: I, function: ComputationFn<V>) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        Self::Computation(Computation::new(dependencies, function))
    }

    /// Computation without dependencies that always yields `value`
    pub fn constant(value: V) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        Self::sync(Vec::<Name>::new(), move |_| Ok(value.clone()))
    }

    /// Names this declaration depends on (empty for references)
    pub fn dependencies(&self) -> &[Name] {
        match self {
            Self::Reference(_) => &[],
            Self::Computation(computation) => computation.dependencies(),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// Short label used in logs and plan listings
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reference(_) => "reference",
            Self::Computation(_) => "computation",
        }
    }
}

impl<V> Clone for Declaration<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Reference(target) => Self::Reference(target.clone()),
            Self::Computation(computation) => Self::Computation(computation.clone()),
        }
    }
}

impl<V> std::fmt::Debug for Declaration<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference(target) => f.debug_tuple("Reference").field(target).finish(),
            Self::Computation(computation) => computation.fmt(f),
        }
    }
}

// ── Declarations ─────────────────────────────────────────────────────

/// Ordered mapping of names to declarations, supplied fresh per resolution
pub struct Declarations<V> {
    entries: IndexMap<Name, Declaration<V>>,
}

impl<V> Declarations<V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<Name>, declaration: Declaration<V>) -> Self {
        self.insert(name, declaration);
        self
    }

    /// Insert a declaration, returning the one it replaced
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(
        &mut self,
        name: impl Into<Name>,
        declaration: Declaration<V>,
    ) -> Option<Declaration<V>> {
        self.entries.insert(name.into(), declaration)
    }

    pub fn get(&self, name: &str) -> Option<&Declaration<V>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Declared names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Declaration<V>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for Declarations<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for Declarations<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<V> std::fmt::Debug for Declarations<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<V, N: Into<Name>> FromIterator<(N, Declaration<V>)> for Declarations<V> {
    fn from_iter<T: IntoIterator<Item = (N, Declaration<V>)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, declaration)| (name.into(), declaration))
                .collect(),
        }
    }
}
