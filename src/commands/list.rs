//! List command implementation
//!
//! This command lists the projects registered in the workspace with their
//! locations.

use std::path::{Path, PathBuf};

use console::Style;

use crate::cli::ListArgs;
use crate::commands::helpers::open_workspace;
use crate::config::DEFAULT_MANIFEST;
use crate::error::Result;
use crate::workspace::Workspace;

/// Run list command
pub fn run(workspace: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let workspace = open_workspace(workspace)?;
    list_projects(&workspace, args.detailed)
}

fn list_projects(workspace: &Workspace, detailed: bool) -> Result<()> {
    let projects = workspace.projects();

    if projects.is_empty() {
        println!("No projects imported.");
        return Ok(());
    }

    let manifest = if detailed {
        workspace.load_config()?.manifest
    } else {
        DEFAULT_MANIFEST.to_string()
    };

    println!("Imported projects ({}):", projects.len());
    println!();

    for project in &projects {
        println!("  {}", Style::new().bold().yellow().apply_to(&project.name));
        println!(
            "    {} {}",
            Style::new().bold().apply_to("Location:"),
            display_location(&workspace.root, &project.location)
        );
        if detailed {
            let path = project.location.join(&manifest);
            let state = if path.is_file() {
                Style::new().green().apply_to("present")
            } else {
                Style::new().red().apply_to("missing")
            };
            println!(
                "    {} {} ({state})",
                Style::new().bold().apply_to("Manifest:"),
                path.display()
            );
        }
    }

    Ok(())
}

/// Location relative to the workspace root when it lies inside it
fn display_location(root: &Path, location: &Path) -> String {
    match location.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Ok(relative) => relative.display().to_string(),
        Err(_) => location.display().to_string(),
    }
}
