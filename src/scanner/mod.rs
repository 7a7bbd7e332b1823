//! Project discovery in checked-out locations
//!
//! This module handles:
//! - Finding manifest files under checkout roots
//! - Following declared modules in non-recursive mode
//! - Nesting descriptors by directory containment
//! - Flattening the descriptor tree into the set of projects to import

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::{DEFAULT_MANIFEST, ModelReader, YamlModelReader};
use crate::domain::ProjectDescriptor;
use crate::error::{Result, scan_failed};

/// Directory names never descended into during a recursive scan
const SKIPPED_DIRS: &[&str] = &["target", "node_modules"];

static DEFAULT_READER: YamlModelReader = YamlModelReader;

/// Walks checkout roots for project manifests
pub struct ProjectScanner<'a> {
    roots: Vec<PathBuf>,
    recursive: bool,
    manifest_name: String,
    reader: &'a dyn ModelReader,
}

impl<'a> ProjectScanner<'a> {
    pub fn new(roots: Vec<PathBuf>, recursive: bool) -> Self {
        Self {
            roots,
            recursive,
            manifest_name: DEFAULT_MANIFEST.to_string(),
            reader: &DEFAULT_READER,
        }
    }

    #[must_use]
    pub fn with_reader(mut self, reader: &'a dyn ModelReader) -> Self {
        self.reader = reader;
        self
    }

    #[must_use]
    pub fn with_manifest_name(mut self, manifest_name: impl Into<String>) -> Self {
        self.manifest_name = manifest_name.into();
        self
    }

    /// Scan all roots, in order
    ///
    /// Missing roots and roots without manifests contribute nothing.
    pub fn scan(&self) -> Result<Vec<ProjectDescriptor>> {
        let mut descriptors = Vec::new();

        for root in &self.roots {
            if !root.is_dir() {
                tracing::debug!(root = %root.display(), "skipping missing scan root");
                continue;
            }

            let found = if self.recursive {
                self.scan_recursive(root)?
            } else {
                self.scan_declared(root)
            };
            tracing::debug!(root = %root.display(), count = found.len(), "scanned root");
            descriptors.extend(found);
        }

        Ok(descriptors)
    }

    fn scan_recursive(&self, root: &Path) -> Result<Vec<ProjectDescriptor>> {
        let mut manifests = Vec::new();

        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).display().to_string();
                scan_failed(path, io::Error::from(e).to_string())
            })?;

            if entry.file_type().is_file() && entry.file_name() == self.manifest_name.as_str() {
                manifests.push(entry.into_path());
            }
        }

        // Parents before children, so every module finds its parent already placed.
        manifests.sort_by_key(|manifest| (manifest.components().count(), manifest.clone()));

        let mut tree = Vec::new();
        for manifest in manifests {
            nest(&mut tree, self.describe(manifest));
        }
        sort_tree(&mut tree);
        Ok(tree)
    }

    fn scan_declared(&self, root: &Path) -> Vec<ProjectDescriptor> {
        let manifest = root.join(&self.manifest_name);
        if !manifest.is_file() {
            return Vec::new();
        }

        let mut visited = HashSet::new();
        vec![self.follow_modules(manifest, &mut visited)]
    }

    fn follow_modules(
        &self,
        manifest: PathBuf,
        visited: &mut HashSet<PathBuf>,
    ) -> ProjectDescriptor {
        visited.insert(canonical(&manifest));
        let mut descriptor = self.describe(manifest);

        let declared = descriptor
            .model
            .as_ref()
            .map(|model| model.modules.clone())
            .unwrap_or_default();

        for module in declared {
            let module_manifest = descriptor.directory.join(&module).join(&self.manifest_name);
            if !module_manifest.is_file() {
                tracing::warn!(
                    module = %module,
                    parent = %descriptor.manifest.display(),
                    "declared module has no manifest"
                );
                continue;
            }
            if visited.contains(&canonical(&module_manifest)) {
                continue;
            }
            let child = self.follow_modules(module_manifest, visited);
            descriptor.modules.push(child);
        }

        descriptor
    }

    fn describe(&self, manifest: PathBuf) -> ProjectDescriptor {
        let descriptor = ProjectDescriptor::new(manifest);
        match self.reader.read_model(&descriptor.manifest) {
            Ok(model) => descriptor.with_model(model),
            Err(e) => {
                tracing::warn!(
                    manifest = %descriptor.manifest.display(),
                    error = %e,
                    "could not read project model"
                );
                descriptor
            }
        }
    }
}

fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.iter().any(|skipped| name == *skipped)
}

fn nest(nodes: &mut Vec<ProjectDescriptor>, descriptor: ProjectDescriptor) {
    let parent = nodes.iter_mut().find(|node| {
        descriptor.directory != node.directory && descriptor.directory.starts_with(&node.directory)
    });

    match parent {
        Some(parent) => nest(&mut parent.modules, descriptor),
        None => nodes.push(descriptor),
    }
}

fn sort_tree(nodes: &mut [ProjectDescriptor]) {
    nodes.sort_by(|a, b| a.directory.cmp(&b.directory));
    for node in nodes {
        sort_tree(&mut node.modules);
    }
}

/// Flatten descriptors into the set of projects to import
///
/// With `include_modules` the top-level descriptors are returned as they are,
/// carrying their modules. Otherwise every descriptor is returned on its own,
/// parents before children.
pub fn collect_projects(
    descriptors: &[ProjectDescriptor],
    include_modules: bool,
) -> Vec<ProjectDescriptor> {
    if include_modules {
        return descriptors.to_vec();
    }

    let mut projects = Vec::new();
    flatten_into(descriptors, &mut projects);
    projects
}

fn flatten_into(descriptors: &[ProjectDescriptor], out: &mut Vec<ProjectDescriptor>) {
    for descriptor in descriptors {
        out.push(ProjectDescriptor {
            modules: Vec::new(),
            ..descriptor.clone()
        });
        flatten_into(&descriptor.modules, out);
    }
}
