#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use stabledag::DependencyGraph;

/// Build a string graph from a compact table.
///
/// Each row is `[element, deps...]`; every row is one `add` call, so a name
/// may repeat. Empty rows are skipped.
pub fn graph_from_rows(rows: &[&[&str]]) -> DependencyGraph<String> {
    let mut graph = DependencyGraph::new();
    for row in rows {
        if let Some((name, deps)) = row.split_first() {
            graph.add(name.to_string(), deps.iter().map(|d| d.to_string()));
        }
    }
    graph
}

/// Builder for `DependencyGraph<String>` to simplify test setup.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DependencyGraph<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, name: &str) -> Self {
        self.graph.add(name.to_string(), []);
        self
    }

    pub fn node_after(mut self, name: &str, deps: &[&str]) -> Self {
        self.graph
            .add(name.to_string(), deps.iter().map(|d| d.to_string()));
        self
    }

    pub fn build(self) -> DependencyGraph<String> {
        self.graph
    }
}

/// Builder for manifest TOML text.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    take: Option<usize>,
    format: Option<String>,
    nodes: Vec<(String, Vec<String>)>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(mut self, n: usize) -> Self {
        self.take = Some(n);
        self
    }

    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn node(self, name: &str) -> Self {
        self.node_after(name, &[])
    }

    pub fn node_after(mut self, name: &str, deps: &[&str]) -> Self {
        self.nodes.push((
            name.to_string(),
            deps.iter().map(|d| d.to_string()).collect(),
        ));
        self
    }

    pub fn to_toml(&self) -> String {
        let mut out = String::new();

        if self.take.is_some() || self.format.is_some() {
            out.push_str("[config]\n");
            if let Some(take) = self.take {
                out.push_str(&format!("take = {take}\n"));
            }
            if let Some(ref format) = self.format {
                out.push_str(&format!("format = {format:?}\n"));
            }
            out.push('\n');
        }

        for (name, deps) in &self.nodes {
            out.push_str("[[node]]\n");
            out.push_str(&format!("name = {name:?}\n"));
            if !deps.is_empty() {
                out.push_str(&format!("after = {deps:?}\n"));
            }
            out.push('\n');
        }

        out
    }

    /// Write the manifest as `Stabledag.toml` inside `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("Stabledag.toml");
        fs::write(&path, self.to_toml())
            .with_context(|| format!("writing manifest {}", path.display()))?;
        Ok(path)
    }
}
