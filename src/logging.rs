//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`. The filter is read from
//! `SCMPORT_LOG`, then `RUST_LOG`; without either, only warnings are shown
//! (`debug` for scmport itself with `--verbose`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SCMPORT_LOG";

/// Build the filter for the given verbosity
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose { "warn,scmport=debug" } else { "warn" }
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        tracing::debug!(error = %e, "logging already initialized");
    }
}
