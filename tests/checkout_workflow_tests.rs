//! Checkout workflow scenario tests
//!
//! Drive `ProjectCheckoutWorkflow` end to end with fake collaborators and
//! check the decision taken, the dialogs shown and what is left on disk.

mod common;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use scmport::config::ImportConfiguration;
use scmport::domain::{CheckoutRequest, ProjectDescriptor, WorkflowOutcome};
use scmport::error::{Result, ScmError, checkout_failed, import_failed};
use scmport::git::SourceControl;
use scmport::jobs::{CancellationToken, JobStatus};
use scmport::operations::checkout::{
    CheckoutReport, EmptyFallback, ImportDecision, ProjectCheckoutWorkflow, WorkflowState,
};
use scmport::operations::import::ProjectImporter;
use scmport::ui::{Interaction, Selection, SilentProgressReporter, ui_channel};
use scmport::workspace::{WorkspaceLookup, WorkspaceProject};

// ============================================================================
// Fakes
// ============================================================================

/// Writes a fixed file layout per location into `destination/<location>`
#[derive(Default)]
struct FakeScm {
    layouts: HashMap<String, Vec<(String, String)>>,
    failing: HashSet<String>,
}

impl FakeScm {
    fn with(mut self, location: &str, files: &[(&str, &str)]) -> Self {
        self.layouts.insert(
            location.to_string(),
            files
                .iter()
                .map(|(path, content)| ((*path).to_string(), (*content).to_string()))
                .collect(),
        );
        self
    }

    fn failing(mut self, location: &str) -> Self {
        self.failing.insert(location.to_string());
        self
    }
}

impl SourceControl for FakeScm {
    fn checkout(&self, location: &str, destination: &Path) -> Result<PathBuf> {
        if self.failing.contains(location) {
            return Err(checkout_failed(location, "remote hung up"));
        }
        let local = destination.join(location);
        std::fs::create_dir_all(&local)?;
        for (path, content) in self.layouts.get(location).into_iter().flatten() {
            let file = local.join(path);
            std::fs::create_dir_all(file.parent().unwrap())?;
            std::fs::write(file, content)?;
        }
        Ok(local)
    }
}

#[derive(Default)]
struct FakeWorkspace {
    existing: HashSet<String>,
    created: Mutex<Vec<String>>,
    /// Cancelled on the first name lookup
    cancels: Option<CancellationToken>,
}

impl FakeWorkspace {
    fn with_existing(names: &[&str]) -> Self {
        Self {
            existing: names.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }
}

impl WorkspaceLookup for FakeWorkspace {
    fn exists(&self, name: &str) -> bool {
        if let Some(token) = &self.cancels {
            token.cancel();
        }
        self.existing.contains(name)
    }

    fn create(&self, name: &str, location: &Path) -> Result<WorkspaceProject> {
        self.created.lock().unwrap().push(name.to_string());
        Ok(WorkspaceProject {
            name: name.to_string(),
            location: location.to_path_buf(),
        })
    }
}

/// Scripted answers; records every dialog
struct FakeInteraction {
    confirm: bool,
    select_all: bool,
    calls: Mutex<Vec<String>>,
    offered: Mutex<Vec<ProjectDescriptor>>,
    /// Cancelled while a dialog is open, before it answers
    cancels: Option<CancellationToken>,
}

impl FakeInteraction {
    fn answering(confirm: bool, select_all: bool) -> Self {
        Self {
            confirm,
            select_all,
            calls: Mutex::new(Vec::new()),
            offered: Mutex::new(Vec::new()),
            cancels: None,
        }
    }

    fn cancelling(mut self, token: &CancellationToken) -> Self {
        self.cancels = Some(token.clone());
        self
    }

    fn cancel_run(&self) {
        if let Some(token) = &self.cancels {
            token.cancel();
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Interaction for FakeInteraction {
    fn confirm(&self, _title: &str, _message: &str) -> Result<bool> {
        self.calls.lock().unwrap().push("confirm".to_string());
        self.cancel_run();
        Ok(self.confirm)
    }

    fn select_projects(
        &self,
        _locations: &[PathBuf],
        projects: &[ProjectDescriptor],
        _config: &ImportConfiguration,
    ) -> Result<Selection> {
        self.calls.lock().unwrap().push("select".to_string());
        *self.offered.lock().unwrap() = projects.to_vec();
        self.cancel_run();
        if self.select_all {
            Ok(Selection::Proceed(projects.to_vec()))
        } else {
            Ok(Selection::Cancelled)
        }
    }

    fn import_alternate(&self, _location: &Path) -> Result<()> {
        self.calls.lock().unwrap().push("alternate".to_string());
        Ok(())
    }
}

#[derive(Default)]
struct FakeImporter {
    fail: bool,
    batches: Mutex<Vec<Vec<String>>>,
}

impl ProjectImporter for FakeImporter {
    fn import_projects(
        &self,
        projects: &[ProjectDescriptor],
        _config: &ImportConfiguration,
    ) -> Result<usize> {
        let names = projects.iter().map(ProjectDescriptor::display_name).collect();
        self.batches.lock().unwrap().push(names);
        if self.fail {
            return Err(import_failed("disk full"));
        }
        Ok(projects.len())
    }
}

struct Harness {
    workspace: Arc<FakeWorkspace>,
    interaction: Arc<FakeInteraction>,
    importer: Arc<FakeImporter>,
    destination: PathBuf,
    _temp: common::TestWorkspace,
}

impl Harness {
    fn new(workspace: FakeWorkspace, interaction: FakeInteraction, importer: FakeImporter) -> Self {
        let temp = common::TestWorkspace::new();
        Self {
            workspace: Arc::new(workspace),
            interaction: Arc::new(interaction),
            importer: Arc::new(importer),
            destination: temp.path.join("checkouts"),
            _temp: temp,
        }
    }

    fn workflow(&self, scm: FakeScm) -> ProjectCheckoutWorkflow {
        ProjectCheckoutWorkflow::new(
            Arc::new(scm),
            self.workspace.clone(),
            self.interaction.clone(),
            self.importer.clone(),
        )
    }

    fn run(&self, scm: FakeScm, locations: &[&str], import_all: bool) -> CheckoutReport {
        self.run_with_token(scm, locations, import_all, &CancellationToken::new())
    }

    fn run_with_token(
        &self,
        scm: FakeScm,
        locations: &[&str],
        import_all: bool,
        token: &CancellationToken,
    ) -> CheckoutReport {
        let request = CheckoutRequest::new(
            locations.iter().map(ToString::to_string).collect(),
            &self.destination,
        )
        .import_all(import_all);
        self.workflow(scm)
            .run(&request, token, &mut SilentProgressReporter)
    }

    fn imported(&self) -> Vec<Vec<String>> {
        self.importer.batches.lock().unwrap().clone()
    }
}

fn manifest(name: &str) -> String {
    common::manifest(name)
}

// ============================================================================
// Empty results
// ============================================================================

#[test]
fn test_single_location_without_projects_offers_create() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let scm = FakeScm::default().with("docs", &[("README.md", "docs")]);

    let report = harness.run(scm, &["docs"], true);

    assert_eq!(
        report.decision,
        Some(ImportDecision::AbortEmpty(EmptyFallback::CreateProject(
            harness.destination.join("docs")
        )))
    );
    assert!(matches!(report.outcome, WorkflowOutcome::Completed(1)));
    assert_eq!(harness.interaction.calls(), vec!["confirm"]);
    assert_eq!(*harness.workspace.created.lock().unwrap(), vec!["docs"]);
    assert!(harness.destination.join("docs/README.md").is_file());
}

#[test]
fn test_rejected_create_cleans_up_without_residue() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(false, false),
        FakeImporter::default(),
    );
    let scm = FakeScm::default().with("docs", &[("README.md", "docs")]);

    let report = harness.run(scm, &["docs"], false);

    assert!(matches!(report.outcome, WorkflowOutcome::Cancelled));
    assert!(!harness.destination.join("docs").exists());
    // The destination root itself is not ours to remove.
    assert!(harness.destination.is_dir());
    assert!(harness.workspace.created.lock().unwrap().is_empty());
    assert_eq!(
        report.states,
        vec![
            WorkflowState::Init,
            WorkflowState::CheckingOut,
            WorkflowState::Scanning,
            WorkflowState::Deciding,
            WorkflowState::AbortingEmpty,
            WorkflowState::Terminal,
        ]
    );
}

#[test]
fn test_many_locations_without_projects_clean_up_silently() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let scm = FakeScm::default()
        .with("a", &[("notes.txt", "a")])
        .with("b", &[("notes.txt", "b")]);

    let report = harness.run(scm, &["a", "b"], true);

    assert_eq!(
        report.decision,
        Some(ImportDecision::AbortEmpty(EmptyFallback::Cleanup))
    );
    assert!(matches!(report.outcome, WorkflowOutcome::Cancelled));
    assert!(harness.interaction.calls().is_empty());
    assert!(!harness.destination.join("a").exists());
    assert!(!harness.destination.join("b").exists());
    assert!(harness.imported().is_empty());
}

#[test]
fn test_alternate_configuration_is_handed_over() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let scm = FakeScm::default().with("legacy", &[("app/.project", "<projectDescription/>")]);

    let report = harness.run(scm, &["legacy"], false);

    assert!(matches!(
        report.decision,
        Some(ImportDecision::AbortEmpty(EmptyFallback::AlternateImport(_)))
    ));
    assert!(matches!(report.outcome, WorkflowOutcome::Completed(0)));
    assert_eq!(harness.interaction.calls(), vec!["confirm", "alternate"]);
    assert!(harness.destination.join("legacy/app/.project").is_file());
}

// ============================================================================
// Import paths
// ============================================================================

#[test]
fn test_import_all_without_conflict_is_silent() {
    let harness = Harness::new(
        FakeWorkspace::with_existing(&["unrelated"]),
        FakeInteraction::answering(false, false),
        FakeImporter::default(),
    );
    let core = manifest("core");
    let api = manifest("api");
    let scm = FakeScm::default()
        .with("core", &[("project.yaml", core.as_str())])
        .with("api", &[("project.yaml", api.as_str())]);

    let report = harness.run(scm, &["core", "api"], true);

    assert_eq!(report.decision, Some(ImportDecision::ImportAll));
    assert!(matches!(report.outcome, WorkflowOutcome::Completed(2)));
    assert!(harness.interaction.calls().is_empty());
    assert_eq!(harness.imported().len(), 1, "import runs exactly once");
    assert!(report.states.contains(&WorkflowState::ResolvingConflicts));
    assert_eq!(report.states.last(), Some(&WorkflowState::Terminal));
}

#[test]
fn test_conflict_downgrades_to_selection_with_all_projects() {
    let harness = Harness::new(
        FakeWorkspace::with_existing(&["core"]),
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let core = manifest("core");
    let api = manifest("api");
    let scm = FakeScm::default()
        .with("one", &[("project.yaml", core.as_str())])
        .with("two", &[("project.yaml", api.as_str())])
        .with("three", &[("README.md", "nothing here")]);

    let report = harness.run(scm, &["one", "two", "three"], true);

    assert_eq!(report.decision, Some(ImportDecision::Select));
    assert_eq!(harness.interaction.calls(), vec!["select"]);
    let offered: Vec<_> = harness
        .interaction
        .offered
        .lock()
        .unwrap()
        .iter()
        .map(ProjectDescriptor::display_name)
        .collect();
    assert_eq!(offered.len(), 2);
    assert!(offered.contains(&"core".to_string()));
    assert!(offered.contains(&"api".to_string()));

    assert!(matches!(report.outcome, WorkflowOutcome::Completed(2)));
    assert_eq!(harness.imported().len(), 1);
    let selecting = report
        .states
        .iter()
        .position(|s| *s == WorkflowState::Selecting)
        .unwrap();
    assert_eq!(report.states[selecting + 1], WorkflowState::Importing);
}

#[test]
fn test_cancelled_selection_cleans_every_location() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(false, false),
        FakeImporter::default(),
    );
    let core = manifest("core");
    let scm = FakeScm::default()
        .with("core", &[("project.yaml", core.as_str())])
        .with("empty", &[("README.md", "")]);

    let report = harness.run(scm, &["core", "empty"], false);

    assert_eq!(report.decision, Some(ImportDecision::Select));
    assert!(matches!(report.outcome, WorkflowOutcome::Cancelled));
    assert!(!harness.destination.join("core").exists());
    assert!(!harness.destination.join("empty").exists());
    assert!(harness.imported().is_empty());
}

// ============================================================================
// Failures and cancellation
// ============================================================================

#[test]
fn test_import_failure_keeps_sources() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true),
        FakeImporter {
            fail: true,
            ..FakeImporter::default()
        },
    );
    let core = manifest("core");
    let scm = FakeScm::default().with("core", &[("project.yaml", core.as_str())]);

    let report = harness.run(scm, &["core"], true);

    assert!(matches!(
        report.outcome,
        WorkflowOutcome::Failed(ScmError::ImportFailed { .. })
    ));
    assert_eq!(harness.imported().len(), 1, "failed import is not retried");
    assert!(harness.destination.join("core/project.yaml").is_file());
    assert!(report.status.has_errors());
}

#[test]
fn test_checkout_failure_leaves_partial_checkout() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let core = manifest("core");
    let scm = FakeScm::default()
        .with("core", &[("project.yaml", core.as_str())])
        .failing("broken");

    let report = harness.run(scm, &["core", "broken"], true);

    assert!(matches!(
        report.outcome,
        WorkflowOutcome::Failed(ScmError::CheckoutFailed { .. })
    ));
    assert!(report.decision.is_none());
    assert!(harness.destination.join("core").is_dir());
    assert!(harness.interaction.calls().is_empty());
    assert_eq!(
        report.states,
        vec![
            WorkflowState::Init,
            WorkflowState::CheckingOut,
            WorkflowState::Terminal
        ]
    );
}

#[test]
fn test_cancelled_before_checkout_does_nothing() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let token = CancellationToken::new();
    token.cancel();
    let request = CheckoutRequest::new(vec!["core".to_string()], &harness.destination);

    let report = harness
        .workflow(FakeScm::default())
        .run(&request, &token, &mut SilentProgressReporter);

    assert!(matches!(report.outcome, WorkflowOutcome::Cancelled));
    assert!(report.locations.is_empty());
    assert!(!harness.destination.join("core").exists());
}

#[test]
fn test_cancel_while_confirming_cleans_up() {
    let token = CancellationToken::new();
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true).cancelling(&token),
        FakeImporter::default(),
    );
    let scm = FakeScm::default().with("docs", &[("README.md", "docs")]);

    let report = harness.run_with_token(scm, &["docs"], false, &token);

    assert_eq!(harness.interaction.calls(), vec!["confirm"]);
    assert!(matches!(report.outcome, WorkflowOutcome::Cancelled));
    assert!(!harness.destination.join("docs").exists());
    assert!(harness.workspace.created.lock().unwrap().is_empty());
}

#[test]
fn test_cancel_while_selecting_cleans_up() {
    let token = CancellationToken::new();
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true).cancelling(&token),
        FakeImporter::default(),
    );
    let core = manifest("core");
    let scm = FakeScm::default()
        .with("core", &[("project.yaml", core.as_str())])
        .with("empty", &[("README.md", "")]);

    let report = harness.run_with_token(scm, &["core", "empty"], false, &token);

    assert_eq!(harness.interaction.calls(), vec!["select"]);
    assert!(matches!(report.outcome, WorkflowOutcome::Cancelled));
    assert!(!harness.destination.join("core").exists());
    assert!(!harness.destination.join("empty").exists());
    assert!(harness.imported().is_empty());
}

#[test]
fn test_cancel_before_silent_import_cleans_up() {
    let token = CancellationToken::new();
    let harness = Harness::new(
        FakeWorkspace {
            cancels: Some(token.clone()),
            ..FakeWorkspace::default()
        },
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let core = manifest("core");
    let scm = FakeScm::default().with("core", &[("project.yaml", core.as_str())]);

    let report = harness.run_with_token(scm, &["core"], true, &token);

    assert_eq!(report.decision, Some(ImportDecision::ImportAll));
    assert!(matches!(report.outcome, WorkflowOutcome::Cancelled));
    assert!(harness.imported().is_empty());
    assert!(!harness.destination.join("core").exists());
}

#[test]
fn test_unreadable_manifest_forces_selection() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let core = manifest("core");
    let scm = FakeScm::default()
        .with("core", &[("project.yaml", core.as_str())])
        .with("broken", &[("project.yaml", "name: [unclosed")]);

    let report = harness.run(scm, &["core", "broken"], true);

    assert_eq!(report.decision, Some(ImportDecision::Select));
    assert_eq!(harness.interaction.calls(), vec!["select"]);
    assert!(
        report
            .status
            .records()
            .iter()
            .any(|r| r.source() == "conflict check")
    );
}

// ============================================================================
// UI thread marshalling
// ============================================================================

#[test]
fn test_spawned_workflow_asks_through_ui_host() {
    let harness = Harness::new(
        FakeWorkspace::with_existing(&["core"]),
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let core = manifest("core");
    let scm = FakeScm::default().with("core", &[("project.yaml", core.as_str())]);
    let (proxy, host) = ui_channel();

    let workflow = ProjectCheckoutWorkflow::new(
        Arc::new(scm),
        harness.workspace.clone(),
        Arc::new(proxy),
        harness.importer.clone(),
    );
    let request =
        CheckoutRequest::new(vec!["core".to_string()], &harness.destination).import_all(true);
    let handle = workflow
        .spawn(request, Box::new(SilentProgressReporter))
        .unwrap();

    let served = host.serve(harness.interaction.as_ref());

    assert_eq!(served, 1);
    match handle.wait() {
        JobStatus::Success(report) => {
            assert!(matches!(report.outcome, WorkflowOutcome::Completed(1)));
        }
        other => panic!("unexpected status: {other:?}"),
    }
    assert_eq!(harness.interaction.calls(), vec!["select"]);
}

#[test]
fn test_closed_ui_counts_as_cancellation() {
    let harness = Harness::new(
        FakeWorkspace::default(),
        FakeInteraction::answering(true, true),
        FakeImporter::default(),
    );
    let scm = FakeScm::default().with("docs", &[("README.md", "docs")]);
    let (proxy, host) = ui_channel();
    drop(host);

    let workflow = ProjectCheckoutWorkflow::new(
        Arc::new(scm),
        harness.workspace.clone(),
        Arc::new(proxy),
        harness.importer.clone(),
    );
    let request = CheckoutRequest::new(vec!["docs".to_string()], &harness.destination);
    let report = workflow.run(&request, &CancellationToken::new(), &mut SilentProgressReporter);

    assert!(matches!(report.outcome, WorkflowOutcome::Cancelled));
    assert!(!harness.destination.join("docs").exists());
    assert!(report.status.is_empty());
}
