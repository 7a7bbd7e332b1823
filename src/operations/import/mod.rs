//! Import of discovered projects into the workspace

use std::sync::Arc;

use crate::config::{ImportConfiguration, ModelReader, YamlModelReader};
use crate::domain::ProjectDescriptor;
use crate::error::{Result, import_failed};
use crate::workspace::WorkspaceLookup;

/// Imports a batch of projects
pub trait ProjectImporter: Send + Sync {
    /// Import `projects`, returning how many were imported
    ///
    /// Called exactly once per run; failures are not retried.
    fn import_projects(
        &self,
        projects: &[ProjectDescriptor],
        config: &ImportConfiguration,
    ) -> Result<usize>;
}

/// Registers each project in the workspace under its derived name
pub struct WorkspaceImporter {
    workspace: Arc<dyn WorkspaceLookup>,
    reader: Arc<dyn ModelReader>,
}

impl WorkspaceImporter {
    pub fn new(workspace: Arc<dyn WorkspaceLookup>) -> Self {
        Self {
            workspace,
            reader: Arc::new(YamlModelReader),
        }
    }

    #[must_use]
    pub fn with_reader(mut self, reader: Arc<dyn ModelReader>) -> Self {
        self.reader = reader;
        self
    }

    fn import_one(&self, project: &ProjectDescriptor, config: &ImportConfiguration) -> Result<String> {
        let model = match &project.model {
            Some(model) => model.clone(),
            None => self.reader.read_model(&project.manifest)?,
        };

        let name = config.project_name(&model)?;
        self.workspace.create(&name, &project.directory)?;

        if !project.modules.is_empty() {
            tracing::debug!(name = %name, modules = project.count() - 1, "imported with modules");
        }
        Ok(name)
    }
}

impl ProjectImporter for WorkspaceImporter {
    fn import_projects(
        &self,
        projects: &[ProjectDescriptor],
        config: &ImportConfiguration,
    ) -> Result<usize> {
        let mut imported = 0;
        let mut failures = Vec::new();

        for project in projects {
            match self.import_one(project, config) {
                Ok(name) => {
                    tracing::info!(name = %name, "imported project");
                    imported += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        manifest = %project.manifest.display(),
                        error = %e,
                        "project import failed"
                    );
                    failures.push(format!("{}: {e}", project.display_name()));
                }
            }
        }

        if failures.is_empty() {
            Ok(imported)
        } else {
            Err(import_failed(format!(
                "{} of {} project(s) failed ({})",
                failures.len(),
                projects.len(),
                failures.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectModel;
    use crate::error::ScmError;
    use crate::workspace::Workspace;
    use std::fs;
    use tempfile::TempDir;

    fn project(dir: &std::path::Path, name: &str) -> ProjectDescriptor {
        ProjectDescriptor::new(dir.join(name).join("project.yaml")).with_model(ProjectModel::new(name))
    }

    #[test]
    fn test_imports_all_projects() {
        let temp = TempDir::new().unwrap();
        let workspace = Arc::new(Workspace::init(temp.path()).unwrap());
        let importer = WorkspaceImporter::new(workspace.clone());

        let projects = vec![project(temp.path(), "api"), project(temp.path(), "core")];
        let count = importer
            .import_projects(&projects, &ImportConfiguration::default())
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            workspace.find_project("api").map(|p| p.location),
            Some(temp.path().join("api"))
        );
    }

    #[test]
    fn test_reads_missing_model() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("lib");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("project.yaml"), "name: lib\n").unwrap();
        let workspace = Arc::new(Workspace::init(temp.path()).unwrap());

        let count = WorkspaceImporter::new(workspace.clone())
            .import_projects(
                &[ProjectDescriptor::new(dir.join("project.yaml"))],
                &ImportConfiguration::default(),
            )
            .unwrap();

        assert_eq!(count, 1);
        assert!(workspace.exists("lib"));
    }

    #[test]
    fn test_failures_are_aggregated() {
        let temp = TempDir::new().unwrap();
        let workspace = Arc::new(Workspace::init(temp.path()).unwrap());
        workspace.create("core", temp.path()).unwrap();

        let projects = vec![
            project(temp.path(), "core"),
            project(temp.path(), "api"),
            ProjectDescriptor::new(temp.path().join("missing/project.yaml")),
        ];
        let result = WorkspaceImporter::new(workspace.clone())
            .import_projects(&projects, &ImportConfiguration::default());

        match result {
            Err(ScmError::ImportFailed { message }) => {
                assert!(message.starts_with("2 of 3"));
                assert!(message.contains("core"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        // The project that could be imported still was.
        assert!(workspace.exists("api"));
    }
}
