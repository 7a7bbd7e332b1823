//! Domain models for scmport
//!
//! This module contains plain domain objects shared by the checkout workflow
//! and the problem report pipeline.

pub mod checkout;
pub mod project;
pub mod status;

pub use checkout::{CheckoutRequest, CheckoutResult, ConflictReport, WorkflowOutcome};
pub use project::{ProjectDescriptor, ProjectModel};
pub use status::{Severity, StatusLog, StatusRecord};
