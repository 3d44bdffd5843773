//! IO helpers for reading caller override layers from disk.

use super::merge::{Layer, merge_all};
use crate::ConfigError;
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read and parse a single JSON5 override layer. The root must be an object.
pub(super) fn load_override_layer(path: &Path) -> Result<Layer, ConfigError> {
    debug!("loading override layer (path={})", path.display());
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = json5::from_str(&contents).map_err(|source| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        source,
    })?;
    if !value.is_object() {
        return Err(ConfigError::InvalidOverride {
            path: path.to_path_buf(),
            message: "expected an object at the root".to_string(),
        });
    }
    Ok(value)
}

/// Combine override files (in order) and an inline layer (last) into one
/// caller-override layer. `None` when there is nothing to apply.
pub(super) fn caller_overrides(
    paths: &[PathBuf],
    inline: Option<&Layer>,
) -> Result<Option<Layer>, ConfigError> {
    if paths.is_empty() && inline.is_none() {
        return Ok(None);
    }
    let mut layers = paths
        .iter()
        .map(|path| load_override_layer(path))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(inline) = inline {
        layers.push(inline.clone());
    }
    debug!("combined caller overrides (layers={})", layers.len());
    Ok(Some(merge_all(&layers)))
}
