//! Service registry: resolves external references by name
//!
//! The resolver never owns services. Whatever hosts it supplies a
//! registry, and reference declarations (plus undeclared dependency
//! names) are looked up there.

use chain_types::Name;
use std::collections::HashMap;
use std::sync::Arc;

/// Name → value lookup consumed by the resolver
pub trait ServiceRegistry<V>: Send + Sync {
    /// Look up a service; `None` surfaces as `ChainError::LookupFailure`
    fn lookup(&self, name: &Name) -> Option<V>;
}

impl<V, R> ServiceRegistry<V> for Arc<R>
where
    R: ServiceRegistry<V> + ?Sized,
{
    fn lookup(&self, name: &Name) -> Option<V> {
        (**self).lookup(name)
    }
}

// ── Static Registry ──────────────────────────────────────────────────

/// In-memory registry of named services
#[derive(Clone, Debug)]
pub struct StaticRegistry<V> {
    services: HashMap<Name, V>,
}

impl<V> StaticRegistry<V> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Builder-style registration
    pub fn with(mut self, name: impl Into<Name>, value: V) -> Self {
        self.register(name, value);
        self
    }

    /// Register a service, returning the value it replaced
    pub fn register(&mut self, name: impl Into<Name>, value: V) -> Option<V> {
        let name = name.into();
        tracing::debug!(service = %name, "Service registered");
        self.services.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.services.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.services.remove(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&Name> {
        let mut names: Vec<&Name> = self.services.keys().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl<V> Default for StaticRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, N: Into<Name>> FromIterator<(N, V)> for StaticRegistry<V> {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut registry = Self::new();
        for (name, value) in iter {
            registry.register(name, value);
        }
        registry
    }
}

impl<V> ServiceRegistry<V> for StaticRegistry<V>
where
    V: Clone + Send + Sync,
{
    fn lookup(&self, name: &Name) -> Option<V> {
        self.services.get(name).cloned()
    }
}

// ── Function Registry ────────────────────────────────────────────────

/// Adapts a lookup closure into a registry
pub struct FnRegistry<F> {
    lookup: F,
}

impl<F> FnRegistry<F> {
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<V, F> ServiceRegistry<V> for FnRegistry<F>
where
    F: Fn(&Name) -> Option<V> + Send + Sync,
{
    fn lookup(&self, name: &Name) -> Option<V> {
        (self.lookup)(name)
    }
}

impl<F> std::fmt::Debug for FnRegistry<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRegistry").finish_non_exhaustive()
    }
}
