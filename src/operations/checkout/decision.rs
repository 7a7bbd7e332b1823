//! Workflow states and the import decision
//!
//! ```text
//! Init -> CheckingOut -> Scanning -> [ResolvingConflicts] -> Deciding
//!      -> { Importing | Selecting | AbortingEmpty } -> Terminal
//! ```
//!
//! Checking out and scanning may jump straight to `Terminal` on failure or
//! cancellation; `Selecting` either proceeds to `Importing` or ends.

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::domain::{ConflictReport, ProjectDescriptor};

/// Stage of one checkout run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Init,
    CheckingOut,
    Scanning,
    ResolvingConflicts,
    Deciding,
    Importing,
    Selecting,
    AbortingEmpty,
    Terminal,
}

impl WorkflowState {
    /// Move to `to` if the transition table allows it
    pub fn next(self, to: WorkflowState) -> Option<WorkflowState> {
        use WorkflowState::{
            AbortingEmpty, CheckingOut, Deciding, Importing, Init, ResolvingConflicts, Scanning,
            Selecting, Terminal,
        };

        let allowed = matches!(
            (self, to),
            (Init, CheckingOut)
                | (CheckingOut, Scanning | Terminal)
                | (Scanning, ResolvingConflicts | Deciding | Terminal)
                | (ResolvingConflicts, Deciding)
                | (Deciding, Importing | Selecting | AbortingEmpty)
                | (Selecting, Importing | Terminal)
                | (Importing | AbortingEmpty, Terminal)
        );

        allowed.then_some(to)
    }

    pub fn is_terminal(self) -> bool {
        self == WorkflowState::Terminal
    }

    /// Short progress label
    pub fn label(self) -> &'static str {
        match self {
            WorkflowState::Init => "Starting",
            WorkflowState::CheckingOut => "Checking out",
            WorkflowState::Scanning => "Scanning for projects",
            WorkflowState::ResolvingConflicts => "Checking project names",
            WorkflowState::Deciding => "Deciding",
            WorkflowState::Importing => "Importing projects",
            WorkflowState::Selecting => "Waiting for project selection",
            WorkflowState::AbortingEmpty => "No projects found",
            WorkflowState::Terminal => "Done",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fallback offered when no projects were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyFallback {
    /// The single location carries another kind of project configuration
    AlternateImport(PathBuf),

    /// Offer to turn the single location into a plain project
    CreateProject(PathBuf),

    /// Several locations: nothing to offer, remove everything
    Cleanup,
}

/// What the coordinator should do with the discovered projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportDecision {
    AbortEmpty(EmptyFallback),
    ImportAll,
    Select,
}

impl ImportDecision {
    /// State the workflow enters to carry out this decision
    pub fn state(&self) -> WorkflowState {
        match self {
            ImportDecision::AbortEmpty(_) => WorkflowState::AbortingEmpty,
            ImportDecision::ImportAll => WorkflowState::Importing,
            ImportDecision::Select => WorkflowState::Selecting,
        }
    }
}

/// Chooses between silent import, interactive selection and the empty fallbacks
pub struct ImportDecisionEngine<'a> {
    alternate_markers: &'a [String],
}

impl<'a> ImportDecisionEngine<'a> {
    pub fn new(alternate_markers: &'a [String]) -> Self {
        Self { alternate_markers }
    }

    /// Decide how to continue
    ///
    /// `conflict` is `None` when conflicts were not checked because the
    /// caller did not ask for a silent import.
    pub fn decide(
        &self,
        locations: &[PathBuf],
        projects: &[ProjectDescriptor],
        import_all: bool,
        conflict: Option<&ConflictReport>,
    ) -> ImportDecision {
        if projects.is_empty() {
            return match locations {
                [location] if self.has_alternate_marker(location) => {
                    ImportDecision::AbortEmpty(EmptyFallback::AlternateImport(location.clone()))
                }
                [location] => {
                    ImportDecision::AbortEmpty(EmptyFallback::CreateProject(location.clone()))
                }
                _ => ImportDecision::AbortEmpty(EmptyFallback::Cleanup),
            };
        }

        let conflicting = conflict.is_some_and(ConflictReport::is_conflict);
        if import_all && !conflicting {
            ImportDecision::ImportAll
        } else {
            if import_all {
                tracing::info!("name conflict found, switching to interactive selection");
            }
            ImportDecision::Select
        }
    }

    /// Whether any file below `location` matches an alternate marker pattern
    pub fn has_alternate_marker(&self, location: &Path) -> bool {
        let globs: Vec<Glob<'_>> = self
            .alternate_markers
            .iter()
            .filter_map(|pattern| match Glob::new(pattern) {
                Ok(glob) => Some(glob),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "ignoring invalid marker pattern");
                    None
                }
            })
            .collect();

        if globs.is_empty() || !location.is_dir() {
            return false;
        }

        WalkDir::new(location)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || entry.file_name() != ".git")
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .any(|entry| {
                let relative = entry
                    .path()
                    .strip_prefix(location)
                    .unwrap_or(entry.path())
                    .to_string_lossy()
                    .replace('\\', "/");
                let candidate = CandidatePath::from(relative.as_str());
                globs.iter().any(|glob| glob.matched(&candidate).is_some())
            })
    }
}
