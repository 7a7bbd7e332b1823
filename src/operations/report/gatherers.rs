//! Registered gatherers and the context they write through

use std::fmt::Write as _;

use crate::domain::StatusRecord;
use crate::error::Result;
use crate::operations::report::sources::{DataSource, TextSource};
use crate::operations::report::target::DataTarget;
use crate::workspace::WorkspaceProject;

/// Where a data unit or gatherer writes its output
///
/// [`consume`](Self::consume) propagates failures; [`try_consume`](Self::try_consume)
/// records them and lets the producer carry on with its other sources.
pub struct GatherContext<'a> {
    source_id: &'a str,
    target: &'a mut dyn DataTarget,
    status: &'a mut Vec<StatusRecord>,
}

impl<'a> GatherContext<'a> {
    pub fn new(
        source_id: &'a str,
        target: &'a mut dyn DataTarget,
        status: &'a mut Vec<StatusRecord>,
    ) -> Self {
        Self {
            source_id,
            target,
            status,
        }
    }

    pub fn consume(&mut self, folder: &str, source: &mut dyn DataSource) -> Result<()> {
        self.target.consume(folder, source)
    }

    /// Consume `source`, turning a failure into a status record
    pub fn try_consume(&mut self, folder: &str, source: &mut dyn DataSource) -> bool {
        match self.target.consume(folder, source) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(source = self.source_id, folder, error = %e, "report entry skipped");
                self.status.push(StatusRecord::from_error(self.source_id, &e));
                false
            }
        }
    }
}

/// Produces one group of diagnostic data
pub trait Gatherer {
    /// Identifier used in status records
    fn id(&self) -> &str;

    fn gather(&self, context: &mut GatherContext<'_>) -> Result<()>;
}

/// Ordered set of gatherers run after the data units
#[derive(Default)]
pub struct GathererRegistry {
    gatherers: Vec<Box<dyn Gatherer>>,
}

impl GathererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment summary plus the manifest list of `projects`
    pub fn default_gatherers(projects: Vec<WorkspaceProject>, manifest: &str) -> Self {
        Self::new()
            .register(EnvironmentGatherer)
            .register(ManifestListGatherer::new(projects, manifest))
    }

    #[must_use]
    pub fn register(mut self, gatherer: impl Gatherer + 'static) -> Self {
        self.gatherers.push(Box::new(gatherer));
        self
    }

    pub fn len(&self) -> usize {
        self.gatherers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gatherers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Gatherer> {
        self.gatherers.iter().map(Box::as_ref)
    }
}

/// Tool version and host platform
pub struct EnvironmentGatherer;

impl EnvironmentGatherer {
    fn describe() -> String {
        let git = git2::Version::get();
        let (major, minor, patch) = git.libgit2_version();

        let mut text = String::new();
        let _ = writeln!(text, "scmport: {}", env!("CARGO_PKG_VERSION"));
        let _ = writeln!(text, "os: {}", std::env::consts::OS);
        let _ = writeln!(text, "family: {}", std::env::consts::FAMILY);
        let _ = writeln!(text, "arch: {}", std::env::consts::ARCH);
        let _ = writeln!(text, "git2: {}", git.crate_version());
        let _ = writeln!(text, "libgit2: {major}.{minor}.{patch}");
        text
    }
}

impl Gatherer for EnvironmentGatherer {
    fn id(&self) -> &str {
        "gatherer:environment"
    }

    fn gather(&self, context: &mut GatherContext<'_>) -> Result<()> {
        context.consume(
            "environment",
            &mut TextSource::new("environment.txt", Self::describe()),
        )
    }
}

/// Manifest path of every workspace project and whether it still exists
pub struct ManifestListGatherer {
    projects: Vec<WorkspaceProject>,
    manifest: String,
}

impl ManifestListGatherer {
    pub fn new(projects: Vec<WorkspaceProject>, manifest: &str) -> Self {
        Self {
            projects,
            manifest: manifest.to_string(),
        }
    }

    fn describe(&self) -> String {
        let mut text = String::new();
        for project in &self.projects {
            let path = project.location.join(&self.manifest);
            let state = if path.is_file() { "present" } else { "missing" };
            let _ = writeln!(text, "{}\t{}\t{state}", project.name, path.display());
        }
        text
    }
}

impl Gatherer for ManifestListGatherer {
    fn id(&self) -> &str {
        "gatherer:manifests"
    }

    fn gather(&self, context: &mut GatherContext<'_>) -> Result<()> {
        context.consume("projects", &mut TextSource::new("manifests.txt", self.describe()))
    }
}
