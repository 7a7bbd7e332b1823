use clap::Parser;
use std::path::PathBuf;

use crate::config::ImportConfiguration;

/// Arguments for the checkout command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check out and choose projects interactively:\n    scmport checkout https://example.com/app.git\n\n\
                  Check out a branch or tag:\n    scmport checkout https://example.com/app.git#v1.2.0\n\n\
                  Import everything found without asking:\n    scmport checkout ./lib ./app --all\n\n\
                  Check out into a specific directory:\n    scmport checkout git@example.com:team/app.git --dest ../sources\n\n\
                  Name projects after group and name:\n    scmport checkout ./app --name-template \"[group].[name]\"")]
pub struct CheckoutArgs {
    /// Source locations (URL, path, or git@host:path), optionally suffixed with #ref
    #[arg(required = true, value_name = "LOCATION")]
    pub locations: Vec<String>,

    /// Directory to check out into (defaults to <workspace>/checkouts)
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Import all discovered projects without asking, unless a name is taken
    #[arg(long)]
    pub all: bool,

    /// Follow declared modules only instead of walking whole checkouts
    #[arg(long)]
    pub no_recursive: bool,

    /// Import modules as part of their parent project
    #[arg(long)]
    pub include_modules: bool,

    /// Project name template (tokens: [group], [name], [version])
    #[arg(long, value_name = "TEMPLATE")]
    pub name_template: Option<String>,
}

impl CheckoutArgs {
    /// Apply flag overrides on top of the workspace configuration
    pub fn apply_to(&self, config: &mut ImportConfiguration) {
        if self.no_recursive {
            config.recursive = false;
        }
        if self.include_modules {
            config.include_modules = true;
        }
        if let Some(template) = &self.name_template {
            config.name_template.clone_from(template);
        }
    }
}
