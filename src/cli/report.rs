use clap::Parser;
use std::path::PathBuf;

/// Arguments for the report command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Report on the whole workspace:\n    scmport report --output report.zip\n\n\
                  Include only some project manifests:\n    scmport report -o report.zip --project core --project api")]
pub struct ReportArgs {
    /// Archive to write
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// Include the manifest of this project (repeatable; defaults to all)
    #[arg(long = "project", value_name = "NAME")]
    pub projects: Vec<String>,
}
