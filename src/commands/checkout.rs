//! Checkout command implementation
//!
//! The workflow runs on a background job while this thread serves its
//! dialogs, so prompts always come from the thread owning the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use console::Style;

use crate::cli::CheckoutArgs;
use crate::commands::helpers::{open_or_init_workspace, progress_reporter};
use crate::domain::{CheckoutRequest, Severity, WorkflowOutcome};
use crate::error::Result;
use crate::git::GitSourceControl;
use crate::jobs::JobStatus;
use crate::operations::checkout::{CheckoutReport, ProjectCheckoutWorkflow};
use crate::operations::import::WorkspaceImporter;
use crate::ui::{TerminalInteraction, ui_channel};

/// Checkout directory inside the workspace when `--dest` is not given
pub const DEFAULT_CHECKOUT_DIR: &str = "checkouts";

/// Run checkout command
pub fn run(workspace: Option<PathBuf>, args: CheckoutArgs) -> Result<()> {
    let workspace = Arc::new(open_or_init_workspace(workspace)?);

    let mut config = workspace.load_config()?;
    args.apply_to(&mut config);
    config.validate()?;

    let destination = args
        .dest
        .clone()
        .unwrap_or_else(|| workspace.root.join(DEFAULT_CHECKOUT_DIR));
    let request = CheckoutRequest::new(args.locations, destination).import_all(args.all);

    let (proxy, host) = ui_channel();
    let importer = Arc::new(WorkspaceImporter::new(workspace.clone()));
    let workflow = ProjectCheckoutWorkflow::new(
        Arc::new(GitSourceControl::new()),
        workspace,
        Arc::new(proxy),
        importer,
    )
    .with_config(config);

    let handle = workflow.spawn(request, progress_reporter(true))?;
    let dialogs = host.serve(&TerminalInteraction::new());
    tracing::debug!(dialogs, "interaction host finished");

    match handle.wait() {
        JobStatus::Success(report) => print_report(report),
        JobStatus::Failure(e) => Err(e),
        JobStatus::Cancelled => {
            println!("Checkout cancelled.");
            Ok(())
        }
    }
}

fn print_report(report: CheckoutReport) -> Result<()> {
    for record in report.status.records() {
        let style = match record.severity() {
            Severity::Error => Style::new().red().bold(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Info => Style::new().bold(),
        };
        eprintln!(
            "{} {}: {}",
            style.apply_to(record.severity()),
            record.source(),
            record.message()
        );
    }

    match report.outcome {
        WorkflowOutcome::Completed(count) => {
            println!(
                "Imported {count} project(s) from {} location(s).",
                report.locations.len()
            );
            Ok(())
        }
        WorkflowOutcome::Cancelled => {
            println!("Checkout cancelled. No projects were imported.");
            Ok(())
        }
        WorkflowOutcome::Failed(e) => Err(e),
    }
}
