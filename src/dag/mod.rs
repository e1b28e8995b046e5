// src/dag/mod.rs

//! Dependency graph storage and resolution.
//!
//! - [`graph`] holds the insertion-ordered, add-or-merge graph store.
//! - [`resolve`] turns a graph into a stable dependency order, either lazily
//!   ([`ResolveIter`]) or all at once.

pub mod graph;
pub mod resolve;

pub use graph::DependencyGraph;
pub use resolve::ResolveIter;
