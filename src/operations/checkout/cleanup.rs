//! Removal of checked-out locations
//!
//! Cleanup is best effort: failures are logged and recorded, never returned,
//! and locations that are already gone count as removed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{StatusLog, StatusRecord};
use crate::error::cleanup_failed;

const SOURCE: &str = "cleanup";

/// Delete every location, returning how many were removed by this call
pub fn cleanup(locations: &[PathBuf], log: &mut StatusLog) -> usize {
    let mut removed = 0;

    for location in locations {
        match remove(location) {
            Ok(true) => {
                tracing::info!(location = %location.display(), "removed checkout");
                removed += 1;
            }
            Ok(false) => {
                tracing::debug!(location = %location.display(), "checkout already removed");
            }
            Err(e) => {
                let err = cleanup_failed(location.display().to_string(), e.to_string());
                tracing::warn!(error = %err, "cleanup failed");
                log.push(StatusRecord::warning(SOURCE, err.to_string()).with_cause(format!("{e:?}")));
            }
        }
    }

    removed
}

fn remove(location: &Path) -> std::io::Result<bool> {
    let metadata = match fs::symlink_metadata(location) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(location)
    } else {
        fs::remove_file(location)
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
