//! Report command implementation
//!
//! Collects workspace state, configuration and project manifests into a
//! problem report archive.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::cli::ReportArgs;
use crate::commands::helpers::{open_workspace, progress_reporter};
use crate::config::ImportConfiguration;
use crate::error::{Result, ScmError};
use crate::operations::report::{
    ConfigData, DataUnit, DiagnosticBundler, GathererRegistry, ProjectData, WorkspaceData,
};
use crate::workspace::{Workspace, WorkspaceProject};

/// Run report command
pub fn run(workspace: Option<PathBuf>, args: ReportArgs) -> Result<()> {
    let workspace = open_workspace(workspace)?;

    // A broken configuration is itself worth reporting, so fall back.
    let config = workspace.load_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default configuration for report");
        ImportConfiguration::default()
    });

    let selected = select_projects(&workspace, &args.projects)?;
    let mut units: Vec<Box<dyn DataUnit>> = vec![
        Box::new(WorkspaceData::new(&workspace)),
        Box::new(ConfigData::new(config.clone())),
    ];
    for project in &selected {
        units.push(Box::new(ProjectData::new(project, &config.manifest)));
    }

    let gatherers = GathererRegistry::default_gatherers(workspace.projects(), &config.manifest);
    let bundler = DiagnosticBundler::new(units, gatherers);

    let mut progress = progress_reporter(false);
    let summary = bundler.gather(&args.output, progress.as_mut())?;

    println!(
        "Wrote problem report to {} ({} entries)",
        summary.path.display(),
        summary.artifacts.len()
    );
    if summary.failures() > 0 {
        eprintln!(
            "{} item(s) could not be collected; see pr/ inside the archive",
            summary.failures()
        );
    }
    Ok(())
}

/// Projects named on the command line, or all of them
///
/// A name given more than once selects its project once.
fn select_projects(workspace: &Workspace, names: &[String]) -> Result<Vec<WorkspaceProject>> {
    if names.is_empty() {
        return Ok(workspace.projects());
    }

    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(*name))
        .map(|name| {
            workspace
                .find_project(name)
                .ok_or_else(|| ScmError::ProjectNotFound { name: name.clone() })
        })
        .collect()
}
