//! Terminal dialogs using inquire

use std::path::{Path, PathBuf};

use console::style;
use inquire::{Confirm, InquireError, MultiSelect};

use crate::config::ImportConfiguration;
use crate::domain::ProjectDescriptor;
use crate::error::{Result, ScmError};
use crate::ui::interaction::{Interaction, Selection};

/// [`Interaction`] rendered as terminal prompts
///
/// Must only be used from the thread that owns the terminal; wrap it with
/// [`crate::ui::ui_channel`] when the caller is a worker.
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }
}

/// Escape and Ctrl-C end the dialog rather than failing it
fn skipped(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

fn project_label(project: &ProjectDescriptor, config: &ImportConfiguration) -> String {
    let name = project
        .model
        .as_ref()
        .and_then(|model| config.project_name(model).ok())
        .unwrap_or_else(|| project.display_name());

    format!("{name} ({})", project.directory.display())
}

impl Interaction for TerminalInteraction {
    fn confirm(&self, title: &str, message: &str) -> Result<bool> {
        println!("\n{}", style(title).bold());

        match Confirm::new(message).with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            Err(e) if skipped(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn select_projects(
        &self,
        locations: &[PathBuf],
        projects: &[ProjectDescriptor],
        config: &ImportConfiguration,
    ) -> Result<Selection> {
        println!("\n{}", style("Checked out:").bold());
        for location in locations {
            println!("  {}", location.display());
        }
        println!();

        let labels: Vec<String> = projects
            .iter()
            .map(|project| project_label(project, config))
            .collect();
        let all: Vec<usize> = (0..labels.len()).collect();

        let chosen = match MultiSelect::new("Select projects to import", labels.clone())
            .with_default(&all)
            .with_page_size(10)
            .with_help_message("  ↑↓ navigate  space select  enter confirm  esc cancel")
            .prompt_skippable()
        {
            Ok(Some(chosen)) => chosen,
            Ok(None) => return Ok(Selection::Cancelled),
            Err(e) if skipped(&e) => return Ok(Selection::Cancelled),
            Err(e) => return Err(e.into()),
        };

        let selected = projects
            .iter()
            .zip(&labels)
            .filter(|(_, label)| chosen.contains(label))
            .map(|(project, _)| project.clone())
            .collect();

        Ok(Selection::Proceed(selected))
    }

    fn import_alternate(&self, location: &Path) -> Result<()> {
        // No alternate importer is bundled; point the user at the checkout instead.
        println!(
            "\n{} {}",
            style("Sources kept at").bold(),
            style(location.display()).cyan()
        );
        println!("Import them with the tool that owns their project configuration.");

        if location.is_dir() {
            Ok(())
        } else {
            Err(ScmError::FileNotFound {
                path: location.display().to_string(),
            })
        }
    }
}
