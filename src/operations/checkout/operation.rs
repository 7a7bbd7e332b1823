//! Checkout of all requested locations

use std::fs;
use std::path::PathBuf;

use crate::domain::{CheckoutRequest, CheckoutResult};
use crate::error::{Result, ScmError, checkout_failed};
use crate::git::SourceControl;
use crate::jobs::CancellationToken;

/// How the checkout step ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Completed(CheckoutResult),

    /// Cancelled between locations; `partial` is what was already on disk
    Cancelled { partial: Vec<PathBuf> },
}

/// Drives the source control collaborator over every requested location
pub struct CheckoutOperation;

impl CheckoutOperation {
    /// Check out each location in order
    ///
    /// Cancellation is observed before every location. A collaborator error
    /// ends the step; whatever was checked out so far stays on disk.
    pub fn run(
        request: &CheckoutRequest,
        scm: &dyn SourceControl,
        token: &CancellationToken,
    ) -> Result<CheckoutOutcome> {
        fs::create_dir_all(&request.destination).map_err(|e| {
            checkout_failed(
                request.destination.display().to_string(),
                format!("cannot create destination: {e}"),
            )
        })?;

        let mut result = CheckoutResult::default();

        for location in &request.locations {
            if token.is_cancelled() {
                tracing::info!(done = result.locations.len(), "checkout cancelled");
                return Ok(CheckoutOutcome::Cancelled {
                    partial: result.locations,
                });
            }

            let local = scm
                .checkout(location, &request.destination)
                .map_err(|e| match e {
                    ScmError::CheckoutFailed { .. } => e,
                    other => checkout_failed(location.clone(), other.to_string()),
                })?;

            tracing::info!(location = %location, local = %local.display(), "checked out");
            result.locations.push(local);
        }

        if token.is_cancelled() {
            return Ok(CheckoutOutcome::Cancelled {
                partial: result.locations,
            });
        }

        Ok(CheckoutOutcome::Completed(result))
    }
}
