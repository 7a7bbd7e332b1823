//! Command implementations for scmport CLI

pub mod checkout;
pub mod completions;
pub mod helpers;
pub mod list;
pub mod report;
