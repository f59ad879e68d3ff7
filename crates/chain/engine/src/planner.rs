//! Planner: cycle detection, depth computation and scheduling order
//!
//! Planning walks the dependency graph depth-first from every declaration
//! (in declaration order), carrying the path of names currently being
//! visited. Meeting a name that is already on the path is a cycle. The
//! same walk records each node's depth: the length of the longest
//! dependency path from the node down to a leaf.
//!
//! Planning always completes before any computation is invoked, so a
//! cycle anywhere in the graph means nothing runs.

use chain_types::{ChainError, ChainResult, Declarations, Name};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The outcome of planning a set of declarations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPlan {
    /// Declared names, every dependency before its dependents
    order: Vec<Name>,
    /// Depth of every declared name, in declaration order
    depths: IndexMap<Name, usize>,
    /// Dependency names without a declaration, resolved via the registry
    external: Vec<Name>,
}

impl ChainPlan {
    /// Scheduling order: ascending depth, ties broken by declaration order
    pub fn order(&self) -> &[Name] {
        &self.order
    }

    /// Depth of a declared or external name
    pub fn depth(&self, name: &str) -> Option<usize> {
        self.depths.get(name).copied().or_else(|| {
            self.external
                .iter()
                .any(|external| external.as_str() == name)
                .then_some(0)
        })
    }

    /// Depths of declared names, in declaration order
    pub fn depths(&self) -> &IndexMap<Name, usize> {
        &self.depths
    }

    /// Undeclared dependency names, in order of discovery
    pub fn external(&self) -> &[Name] {
        &self.external
    }

    /// Deepest dependency chain in the plan
    pub fn max_depth(&self) -> usize {
        self.depths.values().copied().max().unwrap_or(0)
    }

    /// Number of declared names
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Plan a set of declarations
///
/// Fails with [`ChainError::CyclicDependency`] if any declaration reaches
/// itself. The reported chain runs from the first repeated name through
/// the point of detection, so its first and last entries are equal.
pub fn plan<V>(declarations: &Declarations<V>) -> ChainResult<ChainPlan> {
    let mut walker = Walker {
        declarations,
        depths: HashMap::new(),
        external: IndexSet::new(),
    };

    for name in declarations.names() {
        let mut path = Vec::new();
        walker.visit(name, &mut path)?;
    }

    let depths: IndexMap<Name, usize> = declarations
        .names()
        .map(|name| {
            let depth = walker.depths.get(name).copied().unwrap_or(0);
            (name.clone(), depth)
        })
        .collect();

    let mut order: Vec<Name> = depths.keys().cloned().collect();
    order.sort_by_key(|name| depths.get(name).copied().unwrap_or(0));

    let plan = ChainPlan {
        order,
        depths,
        external: walker.external.into_iter().collect(),
    };

    tracing::debug!(
        declarations = plan.len(),
        external = plan.external.len(),
        max_depth = plan.max_depth(),
        "Chain planned"
    );
    Ok(plan)
}

struct Walker<'a, V> {
    declarations: &'a Declarations<V>,
    depths: HashMap<Name, usize>,
    external: IndexSet<Name>,
}

impl<V> Walker<'_, V> {
    fn visit(&mut self, name: &Name, path: &mut Vec<Name>) -> ChainResult<usize> {
        if let Some(start) = path.iter().position(|visited| visited == name) {
            let mut chain = path[start..].to_vec();
            chain.push(name.clone());
            tracing::warn!(cycle = ?chain, "Cyclic dependency detected");
            return Err(ChainError::CyclicDependency { chain });
        }

        // Fully explored nodes cannot reach the current path
        if let Some(&depth) = self.depths.get(name) {
            return Ok(depth);
        }

        let Some(declaration) = self.declarations.get(name.as_str()) else {
            self.external.insert(name.clone());
            return Ok(0);
        };

        path.push(name.clone());
        let mut depth = 0;
        for dependency in declaration.dependencies() {
            depth = depth.max(self.visit(dependency, path)? + 1);
        }
        path.pop();

        self.depths.insert(name.clone(), depth);
        Ok(depth)
    }
}
