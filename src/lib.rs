// src/lib.rs

//! Stable dependency graph resolution.
//!
//! A [`DependencyGraph`] stores elements in the order they were first added,
//! each with a set of dependencies. Resolving it yields every element after
//! all of its dependencies, keeping insertion order wherever the
//! dependencies allow:
//!
//! ```
//! use stabledag::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add("A", []);
//! graph.add("B", ["A"]);
//! graph.add("C", []);
//! graph.add("D", ["B", "A"]);
//! graph.add("E", []);
//!
//! assert_eq!(graph.resolve().unwrap(), vec!["A", "C", "E", "B", "D"]);
//! ```
//!
//! The rest of the crate (manifest loading, CLI, logging) backs the
//! `stabledag` binary.

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod types;

use std::io::Write;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::errors::StabledagError;

pub use crate::dag::{DependencyGraph, ResolveIter};
pub use crate::errors::{ResolveError, UnknownDependency};

/// High-level entry point used by `main.rs`.
///
/// Loads the manifest, applies CLI overrides, resolves the graph and writes
/// the order to `out`. Nothing is written when resolution fails.
pub fn run<W: Write>(args: CliArgs, out: &mut W) -> Result<()> {
    let manifest = load_and_validate(&args.manifest)
        .with_context(|| format!("loading manifest {}", args.manifest.display()))?;

    let format = args.format.unwrap_or(manifest.config.format);
    let take = args.take.or(manifest.config.take);
    if take == Some(0) {
        bail!("--take must be >= 1 (got 0)");
    }
    let graph = manifest.to_graph();

    if args.dry_run {
        print_dry_run(&graph, out)?;
        return Ok(());
    }

    let order = resolve_order(&graph, take)?;
    out.write_all(format.render(&order).as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Resolve `graph`, stopping after `take` elements if given.
///
/// With a limit only the lazy prefix is consumed, so a cycle beyond it goes
/// unreported. Without one the whole graph is resolved eagerly and any error
/// discards the partial order.
pub fn resolve_order(
    graph: &DependencyGraph<String>,
    take: Option<usize>,
) -> std::result::Result<Vec<String>, StabledagError> {
    let order = match take {
        None => graph.resolve().inspect_err(|err| {
            if err.is_circular_dependency() {
                log_unresolved(graph.resolve_iter());
            }
        })?,
        Some(limit) => take_lazily(graph, limit)?,
    };

    info!(resolved = order.len(), total = graph.len(), "resolution finished");
    Ok(order)
}

fn take_lazily(
    graph: &DependencyGraph<String>,
    limit: usize,
) -> std::result::Result<Vec<String>, StabledagError> {
    let mut iter = graph.resolve_iter();
    let mut order = Vec::with_capacity(graph.len().min(limit));

    while order.len() < limit {
        match iter.next() {
            Some(Ok(element)) => order.push(element.clone()),
            Some(Err(err)) => {
                if err.is_circular_dependency() {
                    log_unresolved(iter);
                }
                return Err(err.into());
            }
            None => break,
        }
    }

    Ok(order)
}

/// Drain `iter` and log the elements stuck behind a cycle.
fn log_unresolved(mut iter: ResolveIter<'_, String>) {
    iter.by_ref().for_each(drop);
    warn!(unresolved = ?iter.unresolved(), "elements left unresolved");
}

/// Print every node with its dependencies, in manifest order.
fn print_dry_run<W: Write>(graph: &DependencyGraph<String>, out: &mut W) -> Result<()> {
    writeln!(out, "stabledag dry-run")?;
    writeln!(out, "nodes ({}):", graph.len())?;

    for name in graph.elements() {
        writeln!(out, "  - {name}")?;
        let after: Vec<&String> = graph
            .dependencies_of(name)
            .map(|deps| deps.collect())
            .unwrap_or_default();
        if !after.is_empty() {
            writeln!(out, "      after: {:?}", after)?;
        }
    }

    debug!("dry-run complete (no resolution)");
    Ok(())
}
