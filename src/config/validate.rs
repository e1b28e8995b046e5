// src/config/validate.rs

use crate::config::model::{Manifest, RawManifest};
use crate::errors::{Result, StabledagError};

impl TryFrom<RawManifest> for Manifest {
    type Error = StabledagError;

    fn try_from(raw: RawManifest) -> std::result::Result<Self, Self::Error> {
        validate_raw_manifest(&raw)?;
        Ok(Manifest::new_unchecked(raw.config, raw.node))
    }
}

fn validate_raw_manifest(raw: &RawManifest) -> Result<()> {
    validate_global_config(raw)?;
    validate_node_names(raw)?;
    Ok(())
}

fn validate_global_config(raw: &RawManifest) -> Result<()> {
    if raw.config.take == Some(0) {
        return Err(StabledagError::ConfigError(
            "[config].take must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_node_names(raw: &RawManifest) -> Result<()> {
    for (i, node) in raw.node.iter().enumerate() {
        if node.name.trim().is_empty() {
            return Err(StabledagError::ConfigError(format!(
                "node #{} has an empty `name`",
                i + 1
            )));
        }
        if node.after.iter().any(|dep| dep.trim().is_empty()) {
            return Err(StabledagError::ConfigError(format!(
                "node '{}' has an empty entry in `after`",
                node.name
            )));
        }
    }
    Ok(())
}
