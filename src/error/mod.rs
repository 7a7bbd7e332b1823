//! Error types and handling for scmport
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Constructor helpers are grouped by domain:
//! - [`checkout`]: Checkout and scan errors
//! - [`fs`]: File system errors
//! - [`report`]: Problem report errors

pub mod checkout;
pub mod fs;
pub mod report;

pub use checkout::{
    checkout_failed, cleanup_failed, import_failed, model_read_failed, scan_failed,
};
pub use fs::{io_error, read_failed as file_read_failed, write_failed as file_write_failed};
pub use report::{archive_failed, gather_failed};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for scmport operations
#[derive(Error, Diagnostic, Debug)]
pub enum ScmError {
    // Checkout errors
    #[error("Failed to check out '{location}': {reason}")]
    #[diagnostic(
        code(scmport::checkout::failed),
        help("Check that the location is correct and you have access to it")
    )]
    CheckoutFailed { location: String, reason: String },

    #[error("Checkout was cancelled")]
    #[diagnostic(code(scmport::checkout::cancelled))]
    CheckoutCancelled,

    #[error("Git operation failed: {message}")]
    #[diagnostic(code(scmport::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to resolve git ref '{git_ref}': {reason}")]
    #[diagnostic(code(scmport::git::ref_resolve_failed))]
    GitRefResolveFailed { git_ref: String, reason: String },

    #[error("Failed to checkout commit '{sha}': {reason}")]
    #[diagnostic(code(scmport::git::checkout_failed))]
    GitCheckoutFailed { sha: String, reason: String },

    // Scan errors
    #[error("Failed to scan '{path}' for projects: {reason}")]
    #[diagnostic(code(scmport::scan::failed))]
    ScanFailed { path: String, reason: String },

    #[error("Failed to read project model from '{path}': {reason}")]
    #[diagnostic(
        code(scmport::model::read_failed),
        help("The manifest must be a YAML document with at least a 'name' field")
    )]
    ModelReadFailed { path: String, reason: String },

    #[error("Invalid project name template '{template}': {reason}")]
    #[diagnostic(
        code(scmport::config::invalid_template),
        help("Supported tokens: [group], [name], [version]")
    )]
    NameTemplateInvalid { template: String, reason: String },

    // Import errors
    #[error("Projects imported with errors: {message}")]
    #[diagnostic(code(scmport::import::failed))]
    ImportFailed { message: String },

    #[error("Project '{name}' already exists in the workspace")]
    #[diagnostic(
        code(scmport::import::project_exists),
        help("Choose a different name template or remove the existing project")
    )]
    ProjectExists { name: String },

    #[error("Project '{name}' is not imported in this workspace")]
    #[diagnostic(
        code(scmport::import::project_not_found),
        help("Run 'scmport list' to see the imported projects")
    )]
    ProjectNotFound { name: String },

    #[error("Failed to delete '{path}': {reason}")]
    #[diagnostic(code(scmport::cleanup::failed))]
    CleanupFailed { path: String, reason: String },

    // Problem report errors
    #[error("Failed to write problem report '{path}': {reason}")]
    #[diagnostic(code(scmport::report::archive_failed))]
    ArchiveFailed { path: String, reason: String },

    #[error("Failure while gathering problem report data from '{source_id}': {message}")]
    #[diagnostic(code(scmport::report::gather_failed))]
    GatherFailed { source_id: String, message: String },

    // Workspace errors
    #[error("Workspace not found at: {path}")]
    #[diagnostic(
        code(scmport::workspace::not_found),
        help("Run 'scmport checkout' to initialize a workspace")
    )]
    WorkspaceNotFound { path: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(scmport::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(scmport::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(scmport::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(scmport::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(scmport::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(scmport::fs::io_error))]
    IoError { message: String },

    // Background work and interaction
    #[error("Job '{name}' failed: {message}")]
    #[diagnostic(code(scmport::jobs::failed))]
    JobFailed { name: String, message: String },

    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(scmport::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    #[error("Interaction failed: {message}")]
    #[diagnostic(code(scmport::ui::interaction_failed))]
    InteractionFailed { message: String },
}

impl From<std::io::Error> for ScmError {
    fn from(err: std::io::Error) -> Self {
        ScmError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ScmError {
    fn from(err: serde_yaml::Error) -> Self {
        ScmError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScmError {
    fn from(err: serde_json::Error) -> Self {
        ScmError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for ScmError {
    fn from(err: git2::Error) -> Self {
        ScmError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for ScmError {
    fn from(err: zip::result::ZipError) -> Self {
        ScmError::ArchiveFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for ScmError {
    fn from(err: inquire::InquireError) -> Self {
        ScmError::InteractionFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ScmError>;
