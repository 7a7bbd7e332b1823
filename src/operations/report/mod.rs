//! Problem report bundling
//!
//! This module handles:
//! - Running the selected data units and the registered gatherers
//! - Isolating each producer so one failure never stops the others
//! - Writing everything, plus one `pr/status-N.txt` per failure, into a zip
//!
//! ## Archive Layout
//!
//! ```text
//! environment/environment.txt
//! workspace/workspace.json
//! config/config.yaml
//! projects/manifests.txt
//! projects/<name>/location.txt
//! projects/<name>/project.yaml
//! pr/status-0.txt
//! ```

pub mod data;
pub mod gatherers;
pub mod sources;
pub mod target;

use std::collections::HashSet;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::StatusRecord;
use crate::error::{Result, archive_failed};
use crate::jobs::panic_message;
use crate::ui::ProgressReporter;

pub use data::{ConfigData, DataUnit, ProjectData, WorkspaceData};
pub use gatherers::{
    EnvironmentGatherer, GatherContext, Gatherer, GathererRegistry, ManifestListGatherer,
};
pub use sources::{DataSource, FileSource, StatusSource, TextSource};
pub use target::{ArchiveTarget, DataTarget, entry_name};

/// Folder holding the status records of failed producers
pub const STATUS_FOLDER: &str = "pr";

/// What ended up in a written report
#[derive(Debug)]
pub struct BundleSummary {
    pub path: PathBuf,

    /// Entries contributed by data units and gatherers
    pub artifacts: Vec<String>,

    /// One record per failure, in the order they happened
    pub status: Vec<StatusRecord>,
}

impl BundleSummary {
    pub fn failures(&self) -> usize {
        self.status.len()
    }
}

/// Output of one producer, kept back until it has finished
#[derive(Default)]
struct StagingTarget {
    entries: Vec<(String, TextSource)>,
}

impl StagingTarget {
    /// First staged entry that is already in `written` or staged twice
    fn duplicate_of(&self, written: &[String]) -> Option<String> {
        let mut seen: HashSet<String> = written.iter().cloned().collect();
        self.entries
            .iter()
            .map(|(folder, source)| entry_name(folder, source.name()))
            .find(|name| !seen.insert(name.clone()))
    }
}

impl DataTarget for StagingTarget {
    fn consume(&mut self, folder: &str, source: &mut dyn DataSource) -> Result<()> {
        let mut content = Vec::new();
        source.write_to(&mut content)?;
        self.entries
            .push((folder.to_string(), TextSource::new(source.name(), content)));
        Ok(())
    }
}

/// Collects diagnostic data into a single archive
pub struct DiagnosticBundler {
    data_units: Vec<Box<dyn DataUnit>>,
    gatherers: GathererRegistry,
}

impl DiagnosticBundler {
    pub fn new(data_units: Vec<Box<dyn DataUnit>>, gatherers: GathererRegistry) -> Self {
        Self {
            data_units,
            gatherers,
        }
    }

    /// Number of progress units a run reports
    pub fn total_work(&self) -> u64 {
        (self.data_units.len() + self.gatherers.len()) as u64
    }

    /// Write the report to `path`
    ///
    /// Only archive I/O fails the call; the file at `path` is replaced only
    /// once the archive is complete.
    pub fn gather(&self, path: &Path, progress: &mut dyn ProgressReporter) -> Result<BundleSummary> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .map_err(|e| archive_failed(path.display().to_string(), e.to_string()))?;
        let file = NamedTempFile::new_in(&parent)
            .map_err(|e| archive_failed(path.display().to_string(), e.to_string()))?;

        let mut archive = ArchiveTarget::new(file);
        let mut status = Vec::new();
        progress.begin(self.total_work());

        for unit in &self.data_units {
            progress.set_message(unit.id());
            run_isolated(unit.id(), &mut archive, &mut status, |context| {
                unit.gather(context)
            })
            .map_err(|e| reword(path, &e))?;
            progress.inc();
        }

        for gatherer in self.gatherers.iter() {
            progress.set_message(gatherer.id());
            run_isolated(gatherer.id(), &mut archive, &mut status, |context| {
                gatherer.gather(context)
            })
            .map_err(|e| reword(path, &e))?;
            progress.inc();
        }

        let artifacts = archive.entries().to_vec();
        for (index, record) in status.iter().enumerate() {
            let mut source = StatusSource::new(record.clone(), format!("status-{index}.txt"));
            archive
                .consume(STATUS_FOLDER, &mut source)
                .map_err(|e| reword(path, &e))?;
        }

        let file = archive.finish().map_err(|e| reword(path, &e))?;
        file.persist(path)
            .map_err(|e| archive_failed(path.display().to_string(), e.error.to_string()))?;
        progress.finish();

        tracing::info!(
            path = %path.display(),
            artifacts = artifacts.len(),
            failures = status.len(),
            "problem report written"
        );
        Ok(BundleSummary {
            path: path.to_path_buf(),
            artifacts,
            status,
        })
    }
}

/// Run one producer against a staging area and commit its output on success
///
/// Producer failures, panics and entries that would clash with ones already
/// in the archive become status records; nothing of such a producer is
/// written. The returned error is always a write failure on the archive.
fn run_isolated<W, F>(
    id: &str,
    archive: &mut ArchiveTarget<W>,
    status: &mut Vec<StatusRecord>,
    producer: F,
) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
    F: FnOnce(&mut GatherContext<'_>) -> Result<()>,
{
    let mut staging = StagingTarget::default();
    let mut recorded = Vec::new();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        producer(&mut GatherContext::new(id, &mut staging, &mut recorded))
    }));
    status.append(&mut recorded);

    match outcome {
        Ok(Ok(())) => match staging.duplicate_of(archive.entries()) {
            Some(entry) => {
                tracing::warn!(source = id, entry = %entry, "problem report entry already written");
                status.push(gather_failure(id, &format!("duplicate entry '{entry}'")));
            }
            None => {
                for (folder, mut source) in staging.entries {
                    archive.consume(&folder, &mut source)?;
                }
            }
        },
        Ok(Err(e)) => {
            tracing::warn!(source = id, error = %e, "problem report data skipped");
            status.push(gather_failure(id, &e.to_string()).with_cause(format!("{e:?}")));
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(source = id, panic = %message, "problem report producer panicked");
            status.push(gather_failure(id, &message));
        }
    }
    Ok(())
}

fn gather_failure(id: &str, reason: &str) -> StatusRecord {
    StatusRecord::error(
        id,
        format!("Failure while gathering problem report data: {reason}"),
    )
}

fn reword(path: &Path, err: &crate::error::ScmError) -> crate::error::ScmError {
    archive_failed(path.display().to_string(), err.to_string())
}
