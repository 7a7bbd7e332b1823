//! Project domain types
//!
//! A project is a buildable unit identified by a manifest file found under a
//! checkout root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Project model read from a manifest file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectModel {
    /// Optional group the project belongs to (e.g. "org.example")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Project name
    pub name: String,

    /// Project version (for reference only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Project description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Module directories relative to the manifest directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
}

impl ProjectModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A project discovered under a checkout root, before import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Path to the manifest file
    pub manifest: PathBuf,

    /// Directory containing the manifest
    pub directory: PathBuf,

    /// Model, if it has been read already
    pub model: Option<ProjectModel>,

    /// Nested module projects
    pub modules: Vec<ProjectDescriptor>,
}

impl ProjectDescriptor {
    /// Create a descriptor for a manifest without a model
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        let manifest = manifest.into();
        let directory = manifest
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self {
            manifest,
            directory,
            model: None,
            modules: Vec::new(),
        }
    }

    /// Attach a pre-set model
    #[must_use]
    pub fn with_model(mut self, model: ProjectModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Model name if resolved, otherwise the directory name
    pub fn display_name(&self) -> String {
        if let Some(model) = &self.model {
            return model.name.clone();
        }
        self.directory
            .file_name()
            .map_or_else(|| self.directory.display().to_string(), |n| {
                n.to_string_lossy().into_owned()
            })
    }

    /// Number of descriptors in this subtree, including self
    pub fn count(&self) -> usize {
        1 + self.modules.iter().map(ProjectDescriptor::count).sum::<usize>()
    }
}
