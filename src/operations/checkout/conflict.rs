//! Name collision check against the workspace

use crate::config::ModelReader;
use crate::domain::{ConflictReport, ProjectDescriptor, ProjectModel};
use crate::error::Result;
use crate::workspace::WorkspaceLookup;

/// Finds the first discovered project whose derived name already exists
///
/// Missing models are read through the model reader and stored on the
/// descriptor; nothing else about a descriptor is changed.
pub struct ConflictDetector<'a, F> {
    reader: &'a dyn ModelReader,
    workspace: &'a dyn WorkspaceLookup,
    naming: F,
}

impl<'a, F> ConflictDetector<'a, F>
where
    F: Fn(&ProjectModel) -> Result<String>,
{
    pub fn new(reader: &'a dyn ModelReader, workspace: &'a dyn WorkspaceLookup, naming: F) -> Self {
        Self {
            reader,
            workspace,
            naming,
        }
    }

    /// Check descriptors in order, stopping at the first collision
    ///
    /// A descriptor whose name cannot be derived does not stop the check of
    /// the others. If no real collision is found, the first such descriptor
    /// is reported as [`ConflictReport::Unresolved`].
    pub fn detect(&self, projects: &mut [ProjectDescriptor]) -> ConflictReport {
        let mut unresolved = None;

        for project in projects.iter_mut() {
            match self.derive_name(project) {
                Ok(name) if self.workspace.exists(&name) => {
                    tracing::info!(
                        name = %name,
                        manifest = %project.manifest.display(),
                        "project name already exists in workspace"
                    );
                    return ConflictReport::Conflict {
                        manifest: project.manifest.clone(),
                        name,
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        manifest = %project.manifest.display(),
                        error = %e,
                        "cannot derive project name"
                    );
                    unresolved.get_or_insert_with(|| ConflictReport::Unresolved {
                        manifest: project.manifest.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        unresolved.unwrap_or(ConflictReport::NoConflict)
    }

    fn derive_name(&self, project: &mut ProjectDescriptor) -> Result<String> {
        let model = match project.model.take() {
            Some(model) => model,
            None => self.reader.read_model(&project.manifest)?,
        };

        let name = (self.naming)(&model);
        project.model = Some(model);
        name
    }
}
