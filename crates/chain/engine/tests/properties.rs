//! Property tests: resolution over arbitrary dependency graphs.
//!
//! Acyclic graphs resolve to one value per declaration, each computed from
//! its dependencies' exact values. Cyclic graphs fail with a chain that is
//! a real cycle, and nothing runs.

use chain_engine::{plan, ChainResolver, StaticRegistry};
use chain_types::{ChainError, Declaration, Declarations, Name};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Dependency lists for `n` nodes; node `i` is named `n{i}`.
fn arb_graph(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_nodes).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0..n, 0..3), n)
    })
}

/// Dependency lists where node `i` only depends on nodes `< i`.
fn arb_dag(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    arb_graph(max_nodes).prop_map(|graph| {
        graph
            .into_iter()
            .enumerate()
            .map(|(i, deps)| deps.into_iter().filter(|d| *d < i).collect())
            .collect()
    })
}

fn name(i: usize) -> String {
    format!("n{i}")
}

/// Each node yields `i + 1 + sum(deps)` and counts its invocations.
fn declarations(graph: &[Vec<usize>], calls: &Arc<AtomicUsize>) -> Declarations<i64> {
    // Reverse declaration order so plan order differs from index order
    (0..graph.len())
        .rev()
        .map(|i| {
            let calls = Arc::clone(calls);
            let own = i as i64 + 1;
            let deps: Vec<String> = graph[i].iter().map(|d| name(*d)).collect();
            let decl = Declaration::sync(deps, move |args| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(own + args.iter().sum::<i64>())
            });
            (name(i), decl)
        })
        .collect()
}

fn expected_value(graph: &[Vec<usize>], i: usize, memo: &mut HashMap<usize, i64>) -> i64 {
    if let Some(v) = memo.get(&i) {
        return *v;
    }
    let mut value = i as i64 + 1;
    for d in &graph[i] {
        value += expected_value(graph, *d, memo);
    }
    memo.insert(i, value);
    value
}

fn longest_path(graph: &[Vec<usize>], i: usize) -> usize {
    graph[i]
        .iter()
        .map(|d| longest_path(graph, *d) + 1)
        .max()
        .unwrap_or(0)
}

fn is_acyclic(graph: &[Vec<usize>]) -> bool {
    // Kahn's algorithm over edges i -> dep
    let n = graph.len();
    let mut indegree = vec![0usize; n];
    for deps in graph {
        for d in deps {
            indegree[*d] += 1;
        }
    }
    let mut ready: Vec<usize> = (0..n).filter(|i| indegree[*i] == 0).collect();
    let mut seen = 0;
    while let Some(i) = ready.pop() {
        seen += 1;
        for d in &graph[i] {
            indegree[*d] -= 1;
            if indegree[*d] == 0 {
                ready.push(*d);
            }
        }
    }
    seen == n
}

fn index_of(name: &Name) -> usize {
    name.as_str()[1..].parse().unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn acyclic_graphs_resolve_every_declaration(graph in arb_dag(8)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let decls = declarations(&graph, &calls);
        let resolver = ChainResolver::new(StaticRegistry::<i64>::new());

        let resolved = runtime().block_on(resolver.resolve(&decls)).unwrap();

        prop_assert_eq!(resolved.len(), graph.len());
        prop_assert_eq!(calls.load(Ordering::SeqCst), graph.len());
        let mut memo = HashMap::new();
        for i in 0..graph.len() {
            let expected = expected_value(&graph, i, &mut memo);
            prop_assert_eq!(resolved.get(&name(i)), Some(&expected));
        }
    }

    #[test]
    fn depth_is_longest_dependency_path(graph in arb_dag(8)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let decls = declarations(&graph, &calls);

        let plan = plan(&decls).unwrap();

        for i in 0..graph.len() {
            prop_assert_eq!(plan.depth(&name(i)), Some(longest_path(&graph, i)));
        }
        // Every dependency is scheduled before its dependents
        let position: HashMap<&str, usize> = plan
            .order()
            .iter()
            .enumerate()
            .map(|(pos, n)| (n.as_str(), pos))
            .collect();
        for (i, deps) in graph.iter().enumerate() {
            for d in deps {
                prop_assert!(position[name(*d).as_str()] < position[name(i).as_str()]);
            }
        }
        prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cycles_are_reported_before_anything_runs(graph in arb_graph(6)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let decls = declarations(&graph, &calls);
        let resolver = ChainResolver::new(StaticRegistry::<i64>::new());

        let outcome = runtime().block_on(resolver.resolve(&decls));

        if is_acyclic(&graph) {
            prop_assert!(outcome.is_ok());
        } else {
            match outcome {
                Err(ChainError::CyclicDependency { chain }) => {
                    prop_assert!(chain.len() >= 2);
                    prop_assert_eq!(chain.first(), chain.last());
                    for pair in chain.windows(2) {
                        let from = index_of(&pair[0]);
                        let to = index_of(&pair[1]);
                        prop_assert!(graph[from].contains(&to));
                    }
                }
                other => prop_assert!(false, "expected a cycle, got {:?}", other),
            }
            prop_assert_eq!(calls.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn resolution_is_idempotent(graph in arb_dag(6)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let decls = declarations(&graph, &calls);
        let resolver = ChainResolver::new(StaticRegistry::<i64>::new());
        let rt = runtime();

        let first = rt.block_on(resolver.resolve(&decls)).unwrap();
        let second = rt.block_on(resolver.resolve(&decls)).unwrap();

        prop_assert_eq!(first.values(), second.values());
    }
}
