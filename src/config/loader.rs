// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{Manifest, RawManifest};
use crate::errors::Result;

/// Load a manifest from `path` without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawManifest> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let manifest: RawManifest = toml::from_str(&contents)?;
    debug!(path = %path.display(), nodes = manifest.node.len(), "manifest parsed");

    Ok(manifest)
}

/// Load a manifest and validate it.
///
/// Checks the `[config]` section and node names. Whether the graph itself
/// resolves (unknown dependencies, cycles) is decided by the resolver.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Manifest> {
    let raw = load_from_path(&path)?;
    let manifest = Manifest::try_from(raw)?;
    Ok(manifest)
}

/// `Stabledag.toml` in the current working directory.
pub fn default_manifest_path() -> PathBuf {
    PathBuf::from("Stabledag.toml")
}
