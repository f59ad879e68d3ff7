//! Operation catalog: named functions a manifest can refer to

use chain_types::{BoxError, ComputationFn};
use futures::future::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Named operations available to manifest declarations
pub struct OperationCatalog<V> {
    operations: HashMap<String, ComputationFn<V>>,
}

impl<V: 'static> OperationCatalog<V> {
    pub fn new() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Register an asynchronous operation, replacing any previous one
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, operation: F) -> &mut Self
    where
        F: Fn(Vec<V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
    {
        let function: ComputationFn<V> = Arc::new(move |args| operation(args).boxed());
        self.operations.insert(name.into(), function);
        self
    }

    /// Register a synchronous operation
    pub fn register_sync<F>(&mut self, name: impl Into<String>, operation: F) -> &mut Self
    where
        V: Send,
        F: Fn(Vec<V>) -> Result<V, BoxError> + Send + Sync + 'static,
    {
        let function: ComputationFn<V> =
            Arc::new(move |args| futures::future::ready(operation(args)).boxed());
        self.operations.insert(name.into(), function);
        self
    }

    pub fn get(&self, name: &str) -> Option<ComputationFn<V>> {
        self.operations.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Registered operation names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<V: 'static> Default for OperationCatalog<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for OperationCatalog<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.operations.keys().collect();
        names.sort();
        f.debug_struct("OperationCatalog")
            .field("operations", &names)
            .finish()
    }
}
