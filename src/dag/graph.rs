// src/dag/graph.rs

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::errors::UnknownDependency;

/// A stable dependency graph.
///
/// Elements keep the order in which they were first added; resolution only
/// breaks that order where a dependency forces it.
///
/// The map is both the insertion-ordered edge list and the lookup table, so
/// every element appears exactly once in each. Dependencies are a set: adding
/// the same dependency twice has no further effect.
#[derive(Debug, Clone)]
pub struct DependencyGraph<T> {
    edges: IndexMap<T, IndexSet<T>>,
}

impl<T> DependencyGraph<T> {
    pub fn new() -> Self {
        Self {
            edges: IndexMap::new(),
        }
    }

    /// Number of distinct elements ever added.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All elements, in order of first appearance.
    pub fn elements(&self) -> impl Iterator<Item = &T> {
        self.edges.keys()
    }

    /// Elements with their dependency sets, in insertion order.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (&T, &IndexSet<T>)> {
        self.edges.iter()
    }
}

impl<T: Eq + Hash> DependencyGraph<T> {
    /// Add `name` to the end of the graph, or merge into it if already known.
    ///
    /// May be called several times for the same element; the dependency sets
    /// are unioned and the element keeps its original position. Dependencies
    /// are not checked here, so forward references are fine; see
    /// [`validate`](Self::validate).
    pub fn add<I>(&mut self, name: T, deps: I)
    where
        I: IntoIterator<Item = T>,
    {
        let entry = self.edges.entry(name).or_default();
        entry.extend(deps);
    }

    pub fn contains(&self, name: &T) -> bool {
        self.edges.contains_key(name)
    }

    /// Direct dependencies of `name`, in the order they were first added.
    ///
    /// Returns `None` if `name` is not an element of the graph.
    pub fn dependencies_of<'a>(
        &'a self,
        name: &T,
    ) -> Option<impl Iterator<Item = &'a T> + use<'a, T>> {
        self.edges.get(name).map(|deps| deps.iter())
    }

    /// Check that every dependency refers to a known element.
    ///
    /// Elements are walked in insertion order, and their dependencies in the
    /// order they were added, so the reported dependency is deterministic.
    pub fn validate(&self) -> Result<(), UnknownDependency<T>>
    where
        T: Clone,
    {
        for (position, (name, deps)) in self.edges.iter().enumerate() {
            if let Some(dep) = deps.iter().find(|dep| !self.edges.contains_key(*dep)) {
                debug!(position, "element depends on an unknown element");
                return Err(UnknownDependency {
                    dependent: name.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        Ok(())
    }

    /// Index of a known element in insertion order.
    pub(crate) fn index_of(&self, name: &T) -> Option<usize> {
        self.edges.get_index_of(name)
    }
}

impl<T> Default for DependencyGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Each `(name, deps)` pair behaves like one [`DependencyGraph::add`] call.
impl<T, I> Extend<(T, I)> for DependencyGraph<T>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    fn extend<It: IntoIterator<Item = (T, I)>>(&mut self, iter: It) {
        for (name, deps) in iter {
            self.add(name, deps);
        }
    }
}

impl<T, I> FromIterator<(T, I)> for DependencyGraph<T>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    fn from_iter<It: IntoIterator<Item = (T, I)>>(iter: It) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}
