//! scmport - check out remote sources and import the projects they contain
//!
//! The checkout workflow lives in [`operations::checkout`]; problem report
//! bundling in [`operations::report`]. External collaborators (source
//! control, manifest reading, the workspace, user interaction, import) sit
//! behind traits so the workflow can be driven with other implementations.

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod jobs;
pub mod logging;
pub mod operations;
pub mod scanner;
pub mod ui;
pub mod workspace;

pub use error::{Result, ScmError};
