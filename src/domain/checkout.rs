//! Checkout workflow domain types

use std::path::PathBuf;

use crate::error::ScmError;

/// What to check out and where
///
/// Immutable once the workflow starts. The decision engine keeps its own copy
/// of `import_all_projects`, which may be downgraded to interactive selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Remote source references (URLs, optionally suffixed with `#ref`)
    pub locations: Vec<String>,

    /// Directory the checkouts are written into
    pub destination: PathBuf,

    /// Import every discovered project without asking
    pub import_all_projects: bool,
}

impl CheckoutRequest {
    pub fn new(locations: Vec<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            locations,
            destination: destination.into(),
            import_all_projects: false,
        }
    }

    #[must_use]
    pub fn import_all(mut self, import_all_projects: bool) -> Self {
        self.import_all_projects = import_all_projects;
        self
    }
}

/// Local directories produced by the checkout step, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutResult {
    pub locations: Vec<PathBuf>,
}

/// Outcome of a name conflict check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReport {
    /// No discovered project collides with the workspace
    NoConflict,

    /// First collision found
    Conflict { manifest: PathBuf, name: String },

    /// A model could not be read, so the name is unknown
    Unresolved { manifest: PathBuf, reason: String },
}

impl ConflictReport {
    /// Whether this report disables the silent import path
    ///
    /// Unresolved names count as conflicts.
    pub fn is_conflict(&self) -> bool {
        !matches!(self, ConflictReport::NoConflict)
    }
}

/// Terminal outcome of one checkout run
#[derive(Debug)]
pub enum WorkflowOutcome {
    Cancelled,
    Failed(ScmError),
    Completed(usize),
}

impl WorkflowOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, WorkflowOutcome::Completed(_))
    }

    pub fn imported(&self) -> usize {
        match self {
            WorkflowOutcome::Completed(count) => *count,
            _ => 0,
        }
    }
}
