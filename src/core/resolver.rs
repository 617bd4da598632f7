//! Dependency resolution
//!
//! Expands a list of requested libraries into their full transitive closure
//! and orders it so that every library comes before all of its dependencies.
//!
//! Every library except `core` and the math library implicitly depends on
//! `core`, so `core` is part of every resolved set.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::catalog::DependencyCatalog;
use crate::error::ResolverError;

/// The Arduino core library
pub const CORE_LIBRARY: &str = "core";

/// The system math library. Never compiled, never has sources.
pub const MATH_LIBRARY: &str = "m";

/// Links of one node in the dependency graph
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Links {
    /// Libraries that depend on this one
    incoming: BTreeSet<String>,
    /// Libraries this one depends on
    outgoing: BTreeSet<String>,
}

/// Dependency graph for one resolution
///
/// Built fresh for every call and consumed by [`DependencyGraph::into_build_order`].
/// `incoming` and `outgoing` are kept as consistent pairs: if `A` has an
/// out-link to `B`, `B` has an in-link from `A`.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, Links>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for `requested` by breadth-first expansion over `catalog`
    pub fn expand<S: AsRef<str>>(requested: &[S], catalog: &DependencyCatalog) -> Self {
        let mut graph = Self::new();
        let mut visited: BTreeSet<String> =
            requested.iter().map(|lib| lib.as_ref().to_string()).collect();
        let mut frontier: Vec<String> = visited.iter().cloned().collect();

        while !frontier.is_empty() {
            let mut next = Vec::new();

            for lib in frontier {
                // Copy: the catalog must not see the implicit core edge.
                let mut dependencies = catalog.dependencies(&lib).cloned().unwrap_or_default();
                if lib != CORE_LIBRARY && lib != MATH_LIBRARY {
                    dependencies.insert(CORE_LIBRARY.to_string());
                }

                for dep in &dependencies {
                    if visited.insert(dep.clone()) {
                        next.push(dep.clone());
                    }
                }
                graph.add_library(&lib, dependencies);
            }

            frontier = next;
        }

        graph
    }

    /// Record a library and its direct dependencies
    pub fn add_library(&mut self, name: &str, dependencies: BTreeSet<String>) {
        for dep in &dependencies {
            self.nodes
                .entry(dep.clone())
                .or_default()
                .incoming
                .insert(name.to_string());
        }
        self.nodes.entry(name.to_string()).or_default().outgoing = dependencies;
    }

    /// Whether the graph holds a library
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of libraries in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consume the graph into build order
    ///
    /// Libraries nobody (left) depends on are emitted first and removed,
    /// which releases their dependencies in turn. Ties between ready libraries
    /// are broken by name so the order is deterministic.
    pub fn into_build_order(mut self) -> Result<Vec<String>, ResolverError> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut ready: BTreeSet<String> = self
            .nodes
            .iter()
            .filter(|(_, links)| links.incoming.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        while let Some(name) = ready.pop_first() {
            let Some(links) = self.nodes.remove(&name) else {
                continue;
            };

            for dep in links.outgoing {
                if let Some(target) = self.nodes.get_mut(&dep) {
                    target.incoming.remove(&name);
                    if target.incoming.is_empty() {
                        ready.insert(dep);
                    }
                }
            }

            order.push(name);
        }

        if self.nodes.is_empty() {
            Ok(order)
        } else {
            Err(ResolverError::CyclicDependency {
                remaining: self.nodes.into_keys().collect(),
            })
        }
    }
}

/// Resolves requested libraries against a catalog
#[derive(Debug, Clone, Copy)]
pub struct DependencyResolver<'a> {
    catalog: &'a DependencyCatalog,
}

impl<'a> DependencyResolver<'a> {
    /// Create a resolver over a catalog
    pub fn new(catalog: &'a DependencyCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve `requested` into an ordered build set
    ///
    /// Each library precedes all of its dependencies. Libraries missing from
    /// the catalog are assumed to have no dependencies; whether they exist at
    /// all is checked when their sources are located.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<String>, ResolverError> {
        if requested.is_empty() {
            return Ok(vec![CORE_LIBRARY.to_string()]);
        }

        let graph = DependencyGraph::expand(requested, self.catalog);
        tracing::debug!("Dependency graph has {} libraries", graph.len());

        let order = graph.into_build_order()?;
        tracing::debug!("Resolved build order: {}", order.join(" "));
        Ok(order)
    }
}
