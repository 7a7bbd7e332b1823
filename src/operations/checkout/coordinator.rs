//! Carries out an [`ImportDecision`]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ImportConfiguration;
use crate::domain::{ProjectDescriptor, StatusLog, StatusRecord, WorkflowOutcome};
use crate::error::{Result, ScmError};
use crate::jobs::{CancellationToken, JobStatus, WorkQueue};
use crate::operations::checkout::cleanup::cleanup;
use crate::operations::checkout::decision::{EmptyFallback, ImportDecision};
use crate::operations::import::ProjectImporter;
use crate::scanner::collect_projects;
use crate::ui::{Interaction, Selection};
use crate::workspace::WorkspaceLookup;

const DIALOG_TITLE: &str = "Project Import";
const IMPORT_JOB: &str = "Importing projects";

/// Executes the chosen branch: import, selection, fallbacks or cleanup
///
/// Cleanup always covers every location of the run. It happens only when
/// nothing was found or the user backed out, never after an import attempt.
pub struct ImportCoordinator<'a> {
    queue: &'a WorkQueue,
    interaction: &'a dyn Interaction,
    workspace: &'a dyn WorkspaceLookup,
    importer: Arc<dyn ProjectImporter>,
    config: &'a ImportConfiguration,
    token: &'a CancellationToken,
}

impl<'a> ImportCoordinator<'a> {
    pub fn new(
        queue: &'a WorkQueue,
        interaction: &'a dyn Interaction,
        workspace: &'a dyn WorkspaceLookup,
        importer: Arc<dyn ProjectImporter>,
        config: &'a ImportConfiguration,
        token: &'a CancellationToken,
    ) -> Self {
        Self {
            queue,
            interaction,
            workspace,
            importer,
            config,
            token,
        }
    }

    pub fn execute(
        &self,
        decision: &ImportDecision,
        locations: &[PathBuf],
        projects: &[ProjectDescriptor],
        log: &mut StatusLog,
    ) -> WorkflowOutcome {
        match decision {
            ImportDecision::ImportAll => self.import(projects.to_vec(), locations, log),
            ImportDecision::Select => self.select(locations, projects, log),
            ImportDecision::AbortEmpty(EmptyFallback::AlternateImport(location)) => {
                self.offer_alternate(location, locations, log)
            }
            ImportDecision::AbortEmpty(EmptyFallback::CreateProject(location)) => {
                self.offer_create(location, locations, log)
            }
            ImportDecision::AbortEmpty(EmptyFallback::Cleanup) => {
                tracing::info!("no projects found in any location");
                self.abort(locations, log)
            }
        }
    }

    fn select(
        &self,
        locations: &[PathBuf],
        projects: &[ProjectDescriptor],
        log: &mut StatusLog,
    ) -> WorkflowOutcome {
        let selection = self
            .interaction
            .select_projects(locations, projects, self.config);

        match selection {
            Ok(_) if self.token.is_cancelled() => self.abort(locations, log),
            Ok(Selection::Proceed(selected)) if selected.is_empty() => {
                tracing::info!("no projects selected");
                self.abort(locations, log)
            }
            Ok(Selection::Proceed(selected)) => self.import(selected, locations, log),
            Ok(Selection::Cancelled) => self.abort(locations, log),
            Err(e) => self.dialog_failed(&e, locations, log),
        }
    }

    fn offer_alternate(
        &self,
        location: &Path,
        locations: &[PathBuf],
        log: &mut StatusLog,
    ) -> WorkflowOutcome {
        let message = format!(
            "No projects found, but {} carries other project configuration. Import it with the matching tool?",
            location.display()
        );

        match self.confirm(&message) {
            Ok(true) => match self.interaction.import_alternate(location) {
                Ok(()) => WorkflowOutcome::Completed(0),
                Err(e) => failed("alternate import", e, log),
            },
            Ok(false) => self.abort(locations, log),
            Err(e) => self.dialog_failed(&e, locations, log),
        }
    }

    fn offer_create(
        &self,
        location: &Path,
        locations: &[PathBuf],
        log: &mut StatusLog,
    ) -> WorkflowOutcome {
        let name = location
            .file_name()
            .map_or_else(|| location.display().to_string(), |n| n.to_string_lossy().to_string());
        let message = format!(
            "No projects found. Create project '{name}' from the sources in {}?",
            location.display()
        );

        match self.confirm(&message) {
            Ok(true) => match self.workspace.create(&name, location) {
                Ok(project) => {
                    tracing::info!(name = %project.name, "created project from checkout");
                    WorkflowOutcome::Completed(1)
                }
                Err(e) => failed("create project", e, log),
            },
            Ok(false) => self.abort(locations, log),
            Err(e) => self.dialog_failed(&e, locations, log),
        }
    }

    /// A cancelled run turns any answer into a rejection
    fn confirm(&self, message: &str) -> Result<bool> {
        let answer = self.interaction.confirm(DIALOG_TITLE, message)?;
        Ok(answer && !self.token.is_cancelled())
    }

    /// Import on a separate job, once; failures keep the sources on disk
    ///
    /// A run cancelled before the importer starts is cleaned up like any
    /// other back-out.
    fn import(
        &self,
        projects: Vec<ProjectDescriptor>,
        locations: &[PathBuf],
        log: &mut StatusLog,
    ) -> WorkflowOutcome {
        if self.token.is_cancelled() {
            tracing::info!("cancelled before import");
            return self.abort(locations, log);
        }

        let importer = Arc::clone(&self.importer);
        let config = self.config.clone();
        let run_token = self.token.clone();

        let submitted = self.queue.submit(IMPORT_JOB, move |token| -> JobStatus<usize> {
            if token.is_cancelled() || run_token.is_cancelled() {
                return JobStatus::Cancelled;
            }
            let final_set = collect_projects(&projects, config.include_modules);
            importer.import_projects(&final_set, &config).into()
        });

        let status = match submitted {
            Ok(handle) => handle.wait(),
            Err(e) => JobStatus::Failure(e),
        };

        match status {
            JobStatus::Success(count) => WorkflowOutcome::Completed(count),
            JobStatus::Failure(e) => failed("import", e, log),
            JobStatus::Cancelled => self.abort(locations, log),
        }
    }

    fn dialog_failed(
        &self,
        err: &ScmError,
        locations: &[PathBuf],
        log: &mut StatusLog,
    ) -> WorkflowOutcome {
        if !matches!(err, ScmError::CheckoutCancelled) {
            tracing::warn!(error = %err, "dialog failed, treating as cancelled");
            log.push(StatusRecord::warning("interaction", err.to_string()));
        }
        self.abort(locations, log)
    }

    fn abort(&self, locations: &[PathBuf], log: &mut StatusLog) -> WorkflowOutcome {
        cleanup(locations, log);
        WorkflowOutcome::Cancelled
    }
}

fn failed(source: &str, err: ScmError, log: &mut StatusLog) -> WorkflowOutcome {
    tracing::error!(source, error = %err, "checkout workflow failed");
    log.push(StatusRecord::from_error(source, &err));
    WorkflowOutcome::Failed(err)
}
