//! Selectable data units
//!
//! Each unit captures one piece of workspace state. Units are chosen per
//! report; gatherers always run.

use crate::config::ImportConfiguration;
use crate::error::Result;
use crate::operations::report::gatherers::GatherContext;
use crate::operations::report::sources::{FileSource, TextSource};
use crate::workspace::{Workspace, WorkspaceProject};

/// One selectable piece of report data
pub trait DataUnit {
    /// Identifier used in status records
    fn id(&self) -> &str;

    fn gather(&self, context: &mut GatherContext<'_>) -> Result<()>;
}

/// Registered projects as JSON
pub struct WorkspaceData {
    projects: Vec<WorkspaceProject>,
}

impl WorkspaceData {
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            projects: workspace.projects(),
        }
    }
}

impl DataUnit for WorkspaceData {
    fn id(&self) -> &str {
        "data:workspace"
    }

    fn gather(&self, context: &mut GatherContext<'_>) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.projects)?;
        context.consume("workspace", &mut TextSource::new("workspace.json", json))
    }
}

/// Effective import configuration
pub struct ConfigData {
    config: ImportConfiguration,
}

impl ConfigData {
    pub fn new(config: ImportConfiguration) -> Self {
        Self { config }
    }
}

impl DataUnit for ConfigData {
    fn id(&self) -> &str {
        "data:config"
    }

    fn gather(&self, context: &mut GatherContext<'_>) -> Result<()> {
        let yaml = self.config.to_yaml()?;
        context.consume("config", &mut TextSource::new("config.yaml", yaml))
    }
}

/// Location and manifest of one workspace project
///
/// A missing manifest is recorded as a failure while the location entry is
/// still written.
pub struct ProjectData {
    id: String,
    folder: String,
    location: String,
    manifest: FileSource,
}

impl ProjectData {
    pub fn new(project: &WorkspaceProject, manifest: &str) -> Self {
        Self {
            id: format!("data:project:{}", project.name),
            folder: format!("projects/{}", project.name),
            location: format!("{}\n", project.location.display()),
            manifest: FileSource::new(project.location.join(manifest)),
        }
    }
}

impl DataUnit for ProjectData {
    fn id(&self) -> &str {
        &self.id
    }

    fn gather(&self, context: &mut GatherContext<'_>) -> Result<()> {
        context.consume(
            &self.folder,
            &mut TextSource::new("location.txt", self.location.as_str()),
        )?;
        context.try_consume(&self.folder, &mut self.manifest.clone());
        Ok(())
    }
}
