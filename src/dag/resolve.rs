// src/dag/resolve.rs

//! Stable resolution of a [`DependencyGraph`].
//!
//! The ordering is a Kahn-style topological sort with free-list promotion:
//!
//! - Every element starts with a count of its dependencies.
//! - Elements with no dependencies are moved, in insertion order, into a
//!   contiguous "free" prefix of a working sequence.
//! - A cursor walks that prefix. Each element under the cursor is produced,
//!   then every later element depending on it has its count decreased. An
//!   element whose count reaches zero is swapped to the end of the free
//!   prefix, which grows.
//! - When the cursor catches up with the end of the free prefix, either every
//!   element was produced, or the rest are stuck behind a cycle.
//!
//! Elements freed by the same producer are promoted in the order they sit in
//! the working sequence, so the output is reproducible for a given graph and
//! not merely some valid topological order.
//!
//! The working sequence is a per-resolution array of indices; the graph
//! itself is only read.

use std::hash::Hash;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::dag::DependencyGraph;
use crate::errors::{ResolveError, UnknownDependency};

impl<T: Eq + Hash + Clone> DependencyGraph<T> {
    /// Lazily produce the graph's elements in dependency order.
    ///
    /// Each item is either the next element (`Ok`) or the single trailing
    /// error (`Err`), after which the iterator is exhausted.
    ///
    /// # Early exit
    ///
    /// A cycle is only detected once every element that can be freed has been
    /// produced. Dropping the iterator before that point never yields an
    /// error, even when the part of the graph that was not consumed contains
    /// a cycle. Consumers that need a full validity check must drain the
    /// iterator or use [`resolve`](Self::resolve).
    ///
    /// The iterator borrows the graph, so the graph cannot be changed while a
    /// resolution is in progress.
    pub fn resolve_iter(&self) -> ResolveIter<'_, T> {
        ResolveIter::new(self)
    }

    /// Resolve the whole graph into a vector, in dependency order.
    ///
    /// On failure no elements are returned, not even the prefix that was
    /// ordered before the error was found.
    pub fn resolve(&self) -> Result<Vec<T>, ResolveError<T>> {
        // Every element is produced exactly once on success.
        let mut resolved = Vec::with_capacity(self.len());

        for element in self.resolve_iter() {
            resolved.push(element?.clone());
        }

        Ok(resolved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing validated or computed yet.
    Pending,
    /// Working state is seeded; elements are being produced.
    Producing,
    Finished,
}

/// Iterator returned by [`DependencyGraph::resolve_iter`].
#[derive(Debug)]
pub struct ResolveIter<'a, T> {
    graph: &'a DependencyGraph<T>,
    phase: Phase,

    /// Element names, indexed by insertion position.
    names: Vec<&'a T>,
    /// Insertion positions of the elements depending on each element.
    dependents: Vec<Vec<usize>>,
    /// Dependencies not yet produced, per element.
    refcounts: Vec<usize>,

    /// Working sequence of elements. `[0, fcur)` is produced, `[fcur, fmax)`
    /// is free and waiting, `[fmax, len)` still has dependencies.
    order: Vec<usize>,
    /// `position[element]` is the element's index in `order`.
    position: Vec<usize>,
    fcur: usize,
    fmax: usize,

    /// Scratch buffer for elements freed by one producer.
    freed: Vec<usize>,
}

impl<'a, T: Eq + Hash + Clone> ResolveIter<'a, T> {
    fn new(graph: &'a DependencyGraph<T>) -> Self {
        Self {
            graph,
            phase: Phase::Pending,
            names: Vec::new(),
            dependents: Vec::new(),
            refcounts: Vec::new(),
            order: Vec::new(),
            position: Vec::new(),
            fcur: 0,
            fmax: 0,
            freed: Vec::new(),
        }
    }

    /// Elements not produced so far, in current working order.
    ///
    /// Once the iterator has yielded [`ResolveError::CircularDependency`],
    /// these are exactly the elements that are part of a cycle or depend on
    /// one. Before the first pull (or after a validation failure) this is
    /// every element in insertion order.
    pub fn unresolved(&self) -> Vec<&'a T> {
        if self.order.is_empty() {
            let graph = self.graph;
            return graph.elements().collect();
        }

        self.order[self.fcur..]
            .iter()
            .map(|&element| self.names[element])
            .collect()
    }

    /// Validate the graph and build the working state.
    fn start(&mut self) -> Result<(), UnknownDependency<T>> {
        let graph = self.graph;
        graph.validate()?;

        let len = graph.len();
        self.names.reserve_exact(len);
        self.refcounts.reserve_exact(len);
        self.dependents = vec![Vec::new(); len];

        for (index, (name, deps)) in graph.edges().enumerate() {
            self.names.push(name);
            self.refcounts.push(deps.len());

            for dep in deps {
                // Validation guarantees every dependency is a known element.
                if let Some(dep_index) = graph.index_of(dep) {
                    self.dependents[dep_index].push(index);
                }
            }
        }

        self.order = (0..len).collect();
        self.position = (0..len).collect();

        // Seed the free prefix with dependency-free elements, keeping their
        // insertion order.
        for i in 0..len {
            let element = self.order[i];
            if self.refcounts[element] == 0 {
                self.promote(element);
            }
        }

        debug!(elements = len, free = self.fmax, "resolving dependency graph");
        Ok(())
    }

    /// Swap `element` to the end of the free prefix.
    fn promote(&mut self, element: usize) {
        let from = self.position[element];
        let displaced = self.order[self.fmax];

        self.order.swap(self.fmax, from);
        self.position[element] = self.fmax;
        self.position[displaced] = from;
        self.fmax += 1;
    }

    /// Drop `produced` from the counts of its dependents, promoting those that
    /// become free in working-sequence order.
    fn release(&mut self, produced: usize) {
        let mut freed = std::mem::take(&mut self.freed);

        for &dependent in &self.dependents[produced] {
            let count = &mut self.refcounts[dependent];
            if *count == 0 {
                continue;
            }

            *count -= 1;
            if *count == 0 {
                freed.push(dependent);
            }
        }

        // Promoting one element only moves slots before the next freed one,
        // so sorting once up front gives the same order as a forward scan.
        freed.sort_unstable_by_key(|&element| self.position[element]);
        for &element in &freed {
            self.promote(element);
        }

        freed.clear();
        self.freed = freed;
    }
}

impl<'a, T: Eq + Hash + Clone> Iterator for ResolveIter<'a, T> {
    type Item = Result<&'a T, ResolveError<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.phase {
            Phase::Finished => return None,
            Phase::Pending => {
                if let Err(err) = self.start() {
                    debug!("dependency graph failed validation");
                    self.phase = Phase::Finished;
                    return Some(Err(ResolveError::UnknownDependency(err)));
                }
                self.phase = Phase::Producing;
            }
            Phase::Producing => {}
        }

        if self.fcur < self.fmax {
            let element = self.order[self.fcur];
            trace!(position = self.fcur, free = self.fmax, "producing element");

            self.fcur += 1;
            self.release(element);
            return Some(Ok(self.names[element]));
        }

        self.phase = Phase::Finished;

        let len = self.order.len();
        if self.fmax != len {
            debug!(
                resolved = self.fmax,
                unresolved = len - self.fmax,
                "circular dependency detected"
            );
            return Some(Err(ResolveError::CircularDependency));
        }

        debug!(resolved = len, "dependency graph resolved");
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.phase {
            Phase::Pending => (0, Some(self.graph.len() + 1)),
            Phase::Producing => (
                self.fmax - self.fcur,
                Some(self.order.len() - self.fcur + 1),
            ),
            Phase::Finished => (0, Some(0)),
        }
    }
}

impl<T: Eq + Hash + Clone> FusedIterator for ResolveIter<'_, T> {}
