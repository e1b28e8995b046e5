// src/config/mod.rs

//! Manifest loading and validation for the `stabledag` binary.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: reading a manifest from disk.
//! - `validate.rs`: checks that do not need the resolver.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_manifest_path, load_and_validate, load_from_path};
pub use model::{ConfigSection, Manifest, NodeConfig, RawManifest};
