//! Workspace management for scmport
//!
//! This module handles:
//! - Workspace detection and initialization
//! - The registry of imported projects
//! - Name lookups used by conflict detection
//!
//! ## Workspace Structure
//!
//! ```text
//! .scmport/
//! ├── workspace.yaml   # Imported projects (name -> location)
//! └── config.yaml      # Optional import configuration
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::config::{ImportConfiguration, load_config_file};
use crate::error::{Result, ScmError};

/// Workspace directory name
pub const WORKSPACE_DIR: &str = ".scmport";

/// Project registry filename
pub const WORKSPACE_FILE: &str = "workspace.yaml";

/// A project registered in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceProject {
    pub name: String,
    pub location: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WorkspaceFile {
    #[serde(default)]
    projects: Vec<WorkspaceProject>,
}

/// Name lookup and project creation over a workspace
pub trait WorkspaceLookup: Send + Sync {
    /// Whether a project with this name already exists
    fn exists(&self, name: &str) -> bool;

    /// Create a named project located at `location`
    fn create(&self, name: &str, location: &Path) -> Result<WorkspaceProject>;
}

/// Represents a scmport workspace
#[derive(Debug)]
pub struct Workspace {
    /// Root directory of the workspace (where .scmport is located)
    pub root: PathBuf,

    /// Path to the .scmport directory
    pub config_dir: PathBuf,

    projects: Mutex<Vec<WorkspaceProject>>,
}

impl Workspace {
    /// Detect if a workspace exists at the given path
    pub fn is_workspace(root: &Path) -> bool {
        root.join(WORKSPACE_DIR).is_dir()
    }

    /// Find a workspace by searching upward from the given path
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if Self::is_workspace(&current) {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Open an existing workspace
    pub fn open(root: &Path) -> Result<Self> {
        let config_dir = root.join(WORKSPACE_DIR);

        if !config_dir.is_dir() {
            return Err(ScmError::WorkspaceNotFound {
                path: root.display().to_string(),
            });
        }

        let file: WorkspaceFile =
            load_config_file(&config_dir, WORKSPACE_FILE, WorkspaceFile::default(), |c| {
                serde_yaml::from_str(c)
            })?;

        Ok(Self {
            root: root.to_path_buf(),
            config_dir,
            projects: Mutex::new(file.projects),
        })
    }

    /// Initialize a new workspace at the given path
    pub fn init(root: &Path) -> Result<Self> {
        let config_dir = root.join(WORKSPACE_DIR);
        fs::create_dir_all(&config_dir)?;

        let workspace = Self {
            root: root.to_path_buf(),
            config_dir,
            projects: Mutex::new(Vec::new()),
        };
        workspace.save()?;

        tracing::debug!(root = %root.display(), "initialized workspace");
        Ok(workspace)
    }

    /// Initialize a workspace if it doesn't exist, or open it if it does
    pub fn init_or_open(root: &Path) -> Result<Self> {
        if Self::is_workspace(root) {
            Self::open(root)
        } else {
            Self::init(root)
        }
    }

    /// Load the import configuration stored in this workspace
    pub fn load_config(&self) -> Result<ImportConfiguration> {
        ImportConfiguration::load(&self.config_dir)
    }

    /// Snapshot of registered projects, sorted by name
    pub fn projects(&self) -> Vec<WorkspaceProject> {
        let mut projects = self.lock_projects().clone();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        projects
    }

    /// Find a registered project by name
    pub fn find_project(&self, name: &str) -> Option<WorkspaceProject> {
        self.lock_projects().iter().find(|p| p.name == name).cloned()
    }

    /// Path of the project registry file
    pub fn workspace_file(&self) -> PathBuf {
        self.config_dir.join(WORKSPACE_FILE)
    }

    /// Write the project registry to disk
    pub fn save(&self) -> Result<()> {
        let projects = self.lock_projects().clone();
        self.write_projects(projects)
    }

    fn write_projects(&self, projects: Vec<WorkspaceProject>) -> Result<()> {
        let path = self.workspace_file();
        let content = serde_yaml::to_string(&WorkspaceFile { projects })?;

        fs::write(&path, content).map_err(|e| ScmError::FileWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn lock_projects(&self) -> MutexGuard<'_, Vec<WorkspaceProject>> {
        self.projects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WorkspaceLookup for Workspace {
    fn exists(&self, name: &str) -> bool {
        self.lock_projects().iter().any(|p| p.name == name)
    }

    fn create(&self, name: &str, location: &Path) -> Result<WorkspaceProject> {
        let mut projects = self.lock_projects();
        if projects.iter().any(|p| p.name == name) {
            return Err(ScmError::ProjectExists {
                name: name.to_string(),
            });
        }

        let project = WorkspaceProject {
            name: name.to_string(),
            location: location.to_path_buf(),
        };
        projects.push(project.clone());

        if let Err(e) = self.write_projects(projects.clone()) {
            projects.pop();
            return Err(e);
        }

        tracing::info!(name, location = %location.display(), "created workspace project");
        Ok(project)
    }
}
