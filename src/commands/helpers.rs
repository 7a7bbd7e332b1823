//! Command helper utilities

use std::path::PathBuf;

use crate::error::{Result, ScmError};
use crate::ui::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter};
use crate::workspace::Workspace;

/// Resolve workspace path from optional argument
///
/// If a workspace path is provided, use it. Otherwise,
/// resolve to the current directory.
pub fn resolve_workspace_path(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| ScmError::IoError {
            message: format!("Failed to get current directory: {e}"),
        }),
    }
}

/// Open the workspace containing the resolved path
pub fn open_workspace(workspace: Option<PathBuf>) -> Result<Workspace> {
    let path = resolve_workspace_path(workspace)?;
    let root = Workspace::find_from(&path).ok_or_else(|| ScmError::WorkspaceNotFound {
        path: path.display().to_string(),
    })?;
    Workspace::open(&root)
}

/// Open the enclosing workspace, or create one at the resolved path
pub fn open_or_init_workspace(workspace: Option<PathBuf>) -> Result<Workspace> {
    let path = resolve_workspace_path(workspace)?;
    let root = Workspace::find_from(&path).unwrap_or(path);
    Workspace::init_or_open(&root)
}

/// Progress bar on a terminal, nothing otherwise
pub fn progress_reporter(spinner: bool) -> Box<dyn ProgressReporter> {
    if !console::user_attended_stderr() {
        return Box::new(SilentProgressReporter);
    }
    if spinner {
        Box::new(InteractiveProgressReporter::spinner())
    } else {
        Box::new(InteractiveProgressReporter::new())
    }
}
