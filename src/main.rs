//! scmport - check out remote sources and import the projects they contain

use clap::Parser;

use scmport::cli::{Cli, Commands};
use scmport::{commands, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Checkout(args) => commands::checkout::run(cli.workspace, args),
        Commands::Report(args) => commands::report::run(cli.workspace, args),
        Commands::List(args) => commands::list::run(cli.workspace, args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
