//! Checkout workflow
//!
//! This module handles:
//! - Checking out all requested locations
//! - Scanning them for projects
//! - Checking derived names against the workspace
//! - Choosing and carrying out the import path
//!
//! One run is driven by [`ProjectCheckoutWorkflow::run`], normally on a
//! worker submitted with [`ProjectCheckoutWorkflow::spawn`]. Dialogs go
//! through the [`Interaction`] seam, which the CLI backs with a proxy to the
//! terminal thread.

pub mod cleanup;
pub mod conflict;
pub mod coordinator;
pub mod decision;
pub mod operation;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{ImportConfiguration, ModelReader, YamlModelReader};
use crate::domain::{
    CheckoutRequest, ConflictReport, ProjectDescriptor, ProjectModel, StatusLog, StatusRecord,
    WorkflowOutcome,
};
use crate::error::Result;
use crate::git::SourceControl;
use crate::jobs::{CancellationToken, JobHandle, JobStatus, WorkQueue};
use crate::scanner::{ProjectScanner, collect_projects};
use crate::ui::{Interaction, ProgressReporter};
use crate::workspace::WorkspaceLookup;

pub use cleanup::cleanup;
pub use conflict::ConflictDetector;
pub use coordinator::ImportCoordinator;
pub use decision::{EmptyFallback, ImportDecision, ImportDecisionEngine, WorkflowState};
pub use operation::{CheckoutOperation, CheckoutOutcome};

use super::import::ProjectImporter;

const CHECKOUT_JOB: &str = "Checking out projects";

/// Everything a finished run produced
#[derive(Debug)]
pub struct CheckoutReport {
    pub outcome: WorkflowOutcome,

    /// Local checkout locations, in request order
    pub locations: Vec<PathBuf>,

    /// Projects that were offered for import
    pub projects: Vec<ProjectDescriptor>,

    /// Decision taken, if the run got that far
    pub decision: Option<ImportDecision>,

    /// Warnings and errors recorded during the run
    pub status: StatusLog,

    /// States visited, starting with `Init`
    pub states: Vec<WorkflowState>,
}

/// Per-run bookkeeping
struct Run<'p> {
    state: WorkflowState,
    states: Vec<WorkflowState>,
    locations: Vec<PathBuf>,
    projects: Vec<ProjectDescriptor>,
    decision: Option<ImportDecision>,
    status: StatusLog,
    progress: &'p mut dyn ProgressReporter,
}

impl<'p> Run<'p> {
    fn new(progress: &'p mut dyn ProgressReporter) -> Self {
        Self {
            state: WorkflowState::Init,
            states: vec![WorkflowState::Init],
            locations: Vec::new(),
            projects: Vec::new(),
            decision: None,
            status: StatusLog::new(),
            progress,
        }
    }

    fn advance(&mut self, to: WorkflowState) {
        match self.state.next(to) {
            Some(next) => {
                tracing::debug!(from = ?self.state, to = ?next, "workflow transition");
                self.state = next;
            }
            None => {
                tracing::error!(from = ?self.state, to = ?to, "invalid workflow transition");
                self.state = to;
            }
        }
        self.states.push(self.state);
        self.progress.set_message(self.state.label());
    }

    fn finish(mut self, outcome: WorkflowOutcome) -> CheckoutReport {
        if !self.state.is_terminal() {
            self.advance(WorkflowState::Terminal);
        }

        match &outcome {
            WorkflowOutcome::Failed(_) => self.progress.abandon(),
            _ => self.progress.finish(),
        }

        CheckoutReport {
            outcome,
            locations: self.locations,
            projects: self.projects,
            decision: self.decision,
            status: self.status,
            states: self.states,
        }
    }
}

/// Checks out remote locations and imports the projects they contain
pub struct ProjectCheckoutWorkflow {
    scm: Arc<dyn SourceControl>,
    reader: Arc<dyn ModelReader>,
    workspace: Arc<dyn WorkspaceLookup>,
    interaction: Arc<dyn Interaction>,
    importer: Arc<dyn ProjectImporter>,
    config: ImportConfiguration,
    queue: WorkQueue,
}

impl ProjectCheckoutWorkflow {
    pub fn new(
        scm: Arc<dyn SourceControl>,
        workspace: Arc<dyn WorkspaceLookup>,
        interaction: Arc<dyn Interaction>,
        importer: Arc<dyn ProjectImporter>,
    ) -> Self {
        Self {
            scm,
            reader: Arc::new(YamlModelReader),
            workspace,
            interaction,
            importer,
            config: ImportConfiguration::default(),
            queue: WorkQueue::new(),
        }
    }

    #[must_use]
    pub fn with_reader(mut self, reader: Arc<dyn ModelReader>) -> Self {
        self.reader = reader;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ImportConfiguration) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_queue(mut self, queue: WorkQueue) -> Self {
        self.queue = queue;
        self
    }

    pub fn config(&self) -> &ImportConfiguration {
        &self.config
    }

    /// Run the workflow on a job of its own
    pub fn spawn(
        self,
        request: CheckoutRequest,
        mut progress: Box<dyn ProgressReporter>,
    ) -> Result<JobHandle<CheckoutReport>> {
        let queue = self.queue.clone();
        queue.submit(CHECKOUT_JOB, move |token| {
            JobStatus::Success(self.run(&request, token, progress.as_mut()))
        })
    }

    /// Run the whole workflow on the calling thread
    ///
    /// `token` is observed between stages and after every dialog.
    pub fn run(
        &self,
        request: &CheckoutRequest,
        token: &CancellationToken,
        progress: &mut dyn ProgressReporter,
    ) -> CheckoutReport {
        let mut run = Run::new(progress);
        run.progress.begin(0);

        run.advance(WorkflowState::CheckingOut);
        match CheckoutOperation::run(request, self.scm.as_ref(), token) {
            Ok(CheckoutOutcome::Completed(result)) => run.locations = result.locations,
            Ok(CheckoutOutcome::Cancelled { partial }) => {
                if !partial.is_empty() {
                    run.status.push(StatusRecord::warning(
                        "checkout",
                        format!("cancelled; {} location(s) left on disk", partial.len()),
                    ));
                }
                run.locations = partial;
                return run.finish(WorkflowOutcome::Cancelled);
            }
            Err(e) => {
                run.status.push(StatusRecord::from_error("checkout", &e));
                return run.finish(WorkflowOutcome::Failed(e));
            }
        }

        if token.is_cancelled() {
            return run.finish(WorkflowOutcome::Cancelled);
        }

        run.advance(WorkflowState::Scanning);
        let scanned = ProjectScanner::new(run.locations.clone(), self.config.recursive)
            .with_reader(self.reader.as_ref())
            .with_manifest_name(&self.config.manifest)
            .scan();
        let tree = match scanned {
            Ok(tree) => tree,
            Err(e) => {
                run.status.push(StatusRecord::from_error("scan", &e));
                return run.finish(WorkflowOutcome::Failed(e));
            }
        };
        run.projects = collect_projects(&tree, self.config.include_modules);
        tracing::info!(
            locations = run.locations.len(),
            projects = run.projects.len(),
            "scan finished"
        );

        if token.is_cancelled() {
            return run.finish(WorkflowOutcome::Cancelled);
        }

        let import_all = request.import_all_projects;
        let conflict = if import_all && !run.projects.is_empty() {
            run.advance(WorkflowState::ResolvingConflicts);
            let report = self.detect_conflicts(&mut run.projects);
            if let ConflictReport::Unresolved { manifest, reason } = &report {
                run.status.push(
                    StatusRecord::warning(
                        "conflict check",
                        format!("cannot derive name for {}", manifest.display()),
                    )
                    .with_cause(reason.clone()),
                );
            }
            Some(report)
        } else {
            None
        };

        run.advance(WorkflowState::Deciding);
        let decision = ImportDecisionEngine::new(&self.config.alternate_markers).decide(
            &run.locations,
            &run.projects,
            import_all,
            conflict.as_ref(),
        );
        tracing::info!(?decision, "import decision");
        run.advance(decision.state());
        run.decision = Some(decision.clone());

        let coordinator = ImportCoordinator::new(
            &self.queue,
            self.interaction.as_ref(),
            self.workspace.as_ref(),
            Arc::clone(&self.importer),
            &self.config,
            token,
        );
        let outcome = coordinator.execute(&decision, &run.locations, &run.projects, &mut run.status);

        if matches!(decision, ImportDecision::Select) && outcome.is_completed() {
            run.advance(WorkflowState::Importing);
        }
        run.finish(outcome)
    }

    fn detect_conflicts(&self, projects: &mut [ProjectDescriptor]) -> ConflictReport {
        let config = &self.config;
        ConflictDetector::new(
            self.reader.as_ref(),
            self.workspace.as_ref(),
            |model: &ProjectModel| config.project_name(model),
        )
        .detect(projects)
    }
}
