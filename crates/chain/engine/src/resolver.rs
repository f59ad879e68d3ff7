//! Chain Resolver: the entry point for resolving declarations
//!
//! Resolution happens in two phases:
//! 1. **Plan**: cycle detection and depth ordering. Structural errors are
//!    reported here, before any computation runs.
//! 2. **Resolve**: every declaration is scheduled at once. References are
//!    looked up immediately; each computation becomes a shared future that
//!    awaits its dependencies' futures and then runs exactly once.
//!
//! Execution order is governed by data availability alone. Independent
//! branches interleave; a failed branch fails its dependents without
//! invoking them, and the combined result is the first failure observed.
//! Joins complete in whatever order nodes settle, so a failure is reported
//! as soon as it happens, never behind a slower sibling.

use crate::config::{FailurePolicy, ResolverConfig};
use crate::planner::{self, ChainPlan};
use crate::registry::ServiceRegistry;
use crate::tracker::{ResolutionReport, ResolutionTracker, StateCursor};
use chain_types::*;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use futures::stream::{FuturesUnordered, StreamExt};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::Instrument;

/// A declaration's eventual value, awaitable by any number of dependents
type NodeFuture<V> = Shared<BoxFuture<'static, ChainResult<V>>>;

/// Resolves declarations against a service registry
pub struct ChainResolver<V> {
    /// Source of external references
    registry: Arc<dyn ServiceRegistry<V>>,
    /// Failure policy and concurrency limits
    config: ResolverConfig,
}

impl<V> ChainResolver<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a resolver with the default configuration
    pub fn new(registry: impl ServiceRegistry<V> + 'static) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    /// Create a resolver around a registry shared with other owners
    pub fn from_shared(registry: Arc<dyn ServiceRegistry<V>>) -> Self {
        Self {
            registry,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Check declarations for cycles and compute depths without running anything
    pub fn plan(&self, declarations: &Declarations<V>) -> ChainResult<ChainPlan> {
        planner::plan(declarations)
    }

    /// Resolve every declaration
    ///
    /// Completes with one value per declared name (in declaration order),
    /// or with the first structural, lookup or computation failure.
    pub async fn resolve(&self, declarations: &Declarations<V>) -> ChainResult<ResolvedChain<V>> {
        let tracker = ResolutionTracker::disabled(ResolutionId::generate());
        self.run(declarations, tracker).await
    }

    /// Resolve and also return the state history of every declaration
    pub async fn resolve_with_report(
        &self,
        declarations: &Declarations<V>,
    ) -> (ChainResult<ResolvedChain<V>>, ResolutionReport) {
        let (tracker, log) = ResolutionTracker::channel(ResolutionId::generate());
        let outcome = self.run(declarations, tracker).await;
        let report = log.into_report(declarations.names());
        (outcome, report)
    }

    async fn run(
        &self,
        declarations: &Declarations<V>,
        tracker: ResolutionTracker,
    ) -> ChainResult<ResolvedChain<V>> {
        let span = tracing::info_span!(
            "chain_resolve",
            resolution = %tracker.resolution_id().short()
        );
        self.run_planned(declarations, tracker).instrument(span).await
    }

    async fn run_planned(
        &self,
        declarations: &Declarations<V>,
        tracker: ResolutionTracker,
    ) -> ChainResult<ResolvedChain<V>> {
        let started = Instant::now();
        let plan = planner::plan(declarations)?;
        let scheduled = self.schedule(declarations, &plan, &tracker);

        if self.config.failure_policy == FailurePolicy::LetAllFinish {
            drive_in_background(&scheduled);
        }

        let names: Vec<Name> = scheduled.keys().cloned().collect();
        let values = match join_fail_fast(scheduled.into_values()).await {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Chain resolution failed"
                );
                return Err(err);
            }
        };

        let mut by_name: IndexMap<Name, V> = names.into_iter().zip(values).collect();
        let values: IndexMap<Name, V> = declarations
            .names()
            .filter_map(|name| by_name.swap_remove(name).map(|value| (name.clone(), value)))
            .collect();

        tracing::info!(
            declarations = values.len(),
            max_depth = plan.max_depth(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Chain resolved"
        );

        Ok(ResolvedChain {
            resolution_id: tracker.resolution_id().clone(),
            values,
        })
    }

    /// Turn every declaration into a node future, in plan order
    fn schedule(
        &self,
        declarations: &Declarations<V>,
        plan: &ChainPlan,
        tracker: &ResolutionTracker,
    ) -> IndexMap<Name, NodeFuture<V>> {
        let limiter = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let mut nodes: HashMap<Name, NodeFuture<V>> = HashMap::new();
        for name in plan.external() {
            nodes.insert(name.clone(), self.lookup(name.clone(), name, tracker));
        }

        let mut scheduled = IndexMap::with_capacity(plan.len());
        for name in plan.order() {
            let Some(declaration) = declarations.get(name.as_str()) else {
                continue;
            };

            let node = match declaration {
                Declaration::Reference(target) => self.lookup(name.clone(), target, tracker),
                Declaration::Computation(computation) => {
                    // Plan order guarantees every dependency is already scheduled
                    let dependencies = computation
                        .dependencies()
                        .iter()
                        .map(|dependency| match nodes.get(dependency) {
                            Some(node) => node.clone(),
                            None => self.lookup(dependency.clone(), dependency, tracker),
                        })
                        .collect();
                    compute(
                        computation.clone(),
                        dependencies,
                        limiter.clone(),
                        tracker.cursor(name.clone()),
                    )
                }
            };

            nodes.insert(name.clone(), node.clone());
            scheduled.insert(name.clone(), node);
        }

        scheduled
    }

    /// Resolve a reference through the registry, immediately
    fn lookup(&self, name: Name, target: &Name, tracker: &ResolutionTracker) -> NodeFuture<V> {
        let mut cursor = tracker.cursor(name);
        let outcome = match self.registry.lookup(target) {
            Some(value) => {
                cursor.advance(DeclarationState::Resolved, None);
                Ok(value)
            }
            None => {
                tracing::warn!(declaration = %cursor.name(), service = %target, "Service lookup failed");
                let err = ChainError::LookupFailure {
                    name: target.clone(),
                };
                cursor.advance(DeclarationState::Failed, Some(err.to_string()));
                Err(err)
            }
        };
        future::ready(outcome).boxed().shared()
    }
}

impl<V> std::fmt::Debug for ChainResolver<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A computation node: wait for dependencies, then run once
fn compute<V>(
    computation: Computation<V>,
    dependencies: Vec<NodeFuture<V>>,
    limiter: Option<Arc<Semaphore>>,
    mut cursor: StateCursor,
) -> NodeFuture<V>
where
    V: Clone + Send + Sync + 'static,
{
    cursor.advance(DeclarationState::Pending, None);

    async move {
        let args = match join_fail_fast(dependencies).await {
            Ok(args) => args,
            Err(err) => {
                cursor.advance(
                    DeclarationState::Failed,
                    Some(format!("dependency failed: {}", err)),
                );
                return Err(err);
            }
        };

        let _permit = match limiter {
            Some(semaphore) => semaphore.acquire_owned().await.ok(),
            None => None,
        };

        cursor.advance(DeclarationState::Running, None);
        match computation.invoke(args).await {
            Ok(value) => {
                cursor.advance(DeclarationState::Resolved, None);
                Ok(value)
            }
            Err(cause) => {
                tracing::warn!(declaration = %cursor.name(), error = %cause, "Computation failed");
                cursor.advance(DeclarationState::Failed, Some(cause.to_string()));
                Err(ChainError::ComputationFailure {
                    name: cursor.name().clone(),
                    cause: Arc::from(cause),
                })
            }
        }
    }
    .boxed()
    .shared()
}

/// Await every node, keeping values in input order
///
/// Returns on the first error to settle, dropping the rest.
async fn join_fail_fast<V>(nodes: impl IntoIterator<Item = NodeFuture<V>>) -> ChainResult<Vec<V>>
where
    V: Clone + Send + Sync + 'static,
{
    let mut pending: FuturesUnordered<_> = nodes
        .into_iter()
        .enumerate()
        .map(|(index, node)| node.map(move |outcome| (index, outcome)))
        .collect();

    let mut slots: Vec<Option<V>> = (0..pending.len()).map(|_| None).collect();
    while let Some((index, outcome)) = pending.next().await {
        slots[index] = Some(outcome?);
    }
    Ok(slots.into_iter().flatten().collect())
}

/// Give every node its own task so it completes even if the caller stops
/// awaiting after a failure
fn drive_in_background<V>(scheduled: &IndexMap<Name, NodeFuture<V>>)
where
    V: Clone + Send + Sync + 'static,
{
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::warn!("No tokio runtime; declarations are driven by the caller only");
        return;
    };
    for node in scheduled.values() {
        let node = node.clone();
        handle.spawn(
            async move {
                let _ = node.await;
            }
            .in_current_span(),
        );
    }
}

// ── Resolved Chain ───────────────────────────────────────────────────

/// Values of every declared name, in declaration order
#[derive(Clone, Debug)]
pub struct ResolvedChain<V> {
    resolution_id: ResolutionId,
    values: IndexMap<Name, V>,
}

impl<V> ResolvedChain<V> {
    pub fn resolution_id(&self) -> &ResolutionId {
        &self.resolution_id
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.values.get(name)
    }

    pub fn values(&self) -> &IndexMap<Name, V> {
        &self.values
    }

    pub fn into_values(self) -> IndexMap<Name, V> {
        self.values
    }

    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &V)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolve declarations against a registry with the default configuration
pub async fn resolve<V, R>(
    declarations: &Declarations<V>,
    registry: R,
) -> ChainResult<ResolvedChain<V>>
where
    V: Clone + Send + Sync + 'static,
    R: ServiceRegistry<V> + 'static,
{
    ChainResolver::new(registry).resolve(declarations).await
}
