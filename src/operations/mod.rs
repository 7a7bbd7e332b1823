//! Business logic operations
//!
//! - [`checkout`]: Check out locations, scan, decide and import
//! - [`import`]: Register discovered projects in the workspace
//! - [`report`]: Collect diagnostic data into a problem report archive

pub mod checkout;
pub mod import;
pub mod report;
