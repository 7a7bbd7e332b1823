//! Configuration file handling for scmport
//!
//! This module contains data structures for:
//! - `.scmport/config.yaml` - Import configuration
//! - `project.yaml` - Project manifests found in checkouts

pub mod import;
pub mod manifest;

use std::fs;
use std::path::Path;

use crate::error::{Result, ScmError};

// Re-export commonly used types
pub use import::{CONFIG_FILE, ImportConfiguration};
pub use manifest::{DEFAULT_MANIFEST, ModelReader, YamlModelReader};

/// Generic helper to load a config file with default fallback
///
/// Returns `default` when the file does not exist, as config files are optional.
pub fn load_config_file<F, T>(config_dir: &Path, filename: &str, default: T, parser: F) -> Result<T>
where
    F: FnOnce(&str) -> std::result::Result<T, serde_yaml::Error>,
{
    let path = config_dir.join(filename);

    if !path.exists() {
        return Ok(default);
    }

    let content = fs::read_to_string(&path).map_err(|e| ScmError::ConfigReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    parser(&content).map_err(|e| ScmError::ConfigParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
