//! Project manifest reading
//!
//! A manifest is a small YAML document describing one project:
//!
//! ```yaml
//! group: org.example
//! name: core
//! version: 1.0.0
//! modules:
//!   - api
//!   - impl
//! ```

use std::fs;
use std::path::Path;

use crate::domain::ProjectModel;
use crate::error::{Result, model_read_failed};

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "project.yaml";

/// Reads a manifest file into a project model
pub trait ModelReader: Send + Sync {
    fn read_model(&self, manifest: &Path) -> Result<ProjectModel>;
}

/// Manifest reader for `project.yaml` files
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlModelReader;

impl ModelReader for YamlModelReader {
    fn read_model(&self, manifest: &Path) -> Result<ProjectModel> {
        let content = fs::read_to_string(manifest)
            .map_err(|e| model_read_failed(manifest.display().to_string(), e.to_string()))?;

        let model: ProjectModel = serde_yaml::from_str(&content)
            .map_err(|e| model_read_failed(manifest.display().to_string(), e.to_string()))?;

        if model.name.trim().is_empty() {
            return Err(model_read_failed(
                manifest.display().to_string(),
                "project name cannot be empty",
            ));
        }

        Ok(model)
    }
}
