//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - checkout: Checkout command arguments
//! - report: Problem report command arguments
//! - list: List command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod checkout;
pub mod completions;
pub mod list;
pub mod report;

pub use checkout::CheckoutArgs;
pub use completions::CompletionsArgs;
pub use list::ListArgs;
pub use report::ReportArgs;

/// scmport - check out sources and import their projects
#[derive(Parser, Debug)]
#[command(
    name = "scmport",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Check out remote sources and import the projects they contain",
    long_about = "scmport checks out one or more source locations, discovers the projects \
                  inside them and imports those projects into a workspace. Locations that \
                  yield nothing, or that the user backs out of, are removed again.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  scmport checkout https://example.com/app.git       \x1b[90m# Check out and pick projects\x1b[0m\n   \
                  scmport checkout ./lib ./app --all                 \x1b[90m# Import everything without asking\x1b[0m\n   \
                  scmport list                                       \x1b[90m# List imported projects\x1b[0m\n   \
                  scmport report --output report.zip                 \x1b[90m# Write a problem report\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "SCMPORT_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check out locations and import the projects found
    Checkout(CheckoutArgs),

    /// Write a problem report archive
    Report(ReportArgs),

    /// List projects imported into the workspace
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
