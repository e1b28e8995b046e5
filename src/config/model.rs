// src/config/model.rs

use serde::Deserialize;

use crate::dag::DependencyGraph;
use crate::types::OutputFormat;

/// Top-level manifest as read from a TOML file.
///
/// ```toml
/// [config]
/// take = 3
/// format = "inline"
///
/// [[node]]
/// name = "A"
///
/// [[node]]
/// name = "B"
/// after = ["A"]
/// ```
///
/// Nodes are an array of tables so that file order is the graph's insertion
/// order. A name may appear more than once; later entries merge their
/// `after` lists into the first one.
#[derive(Debug, Clone, Deserialize)]
pub struct RawManifest {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub node: Vec<NodeConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSection {
    /// Stop after this many elements.
    ///
    /// Uses lazy resolution: a cycle in the part of the graph that is never
    /// reached is not reported.
    #[serde(default)]
    pub take: Option<usize>,

    #[serde(default)]
    pub format: OutputFormat,
}

/// One `[[node]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub name: String,

    /// Names of the nodes this one must come after.
    #[serde(default)]
    pub after: Vec<String>,
}

/// Validated manifest.
///
/// Only produced through `TryFrom<RawManifest>`, see `config::validate`.
/// Unknown `after` references and cycles are left for the resolver to
/// report.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub config: ConfigSection,
    pub node: Vec<NodeConfig>,
}

impl Manifest {
    pub(crate) fn new_unchecked(config: ConfigSection, node: Vec<NodeConfig>) -> Self {
        Self { config, node }
    }

    /// Build the dependency graph, one `add` per `[[node]]` in file order.
    pub fn to_graph(&self) -> DependencyGraph<String> {
        self.node
            .iter()
            .map(|n| (n.name.clone(), n.after.iter().cloned()))
            .collect()
    }
}
