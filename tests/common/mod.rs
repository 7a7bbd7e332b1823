//! Common test utilities for scmport integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test workspace for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = dunce::canonicalize(temp.path()).expect("Failed to canonicalize temp directory");
        Self { temp, path }
    }

    /// Create .scmport directory
    pub fn create_scmport_dir(&self) -> PathBuf {
        let scmport_path = self.path.join(".scmport");
        std::fs::create_dir_all(&scmport_path).expect("Failed to create .scmport directory");
        scmport_path
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Create a git repository under `repos/<name>` with the given files committed
    pub fn create_git_repo(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let repo_path = self.path.join("repos").join(name);
        std::fs::create_dir_all(&repo_path).expect("Failed to create repo directory");
        for (path, content) in files {
            let file_path = repo_path.join(path);
            if let Some(parent) = file_path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent directory");
            }
            std::fs::write(&file_path, content).expect("Failed to write file");
        }
        commit_all(&repo_path);
        repo_path
    }

    /// Get path to scmport binary
    pub fn scmport_bin() -> PathBuf {
        PathBuf::from(env!("CARGO_BIN_EXE_scmport"))
    }
}

/// Initialize a repository at `path` and commit everything in it
fn commit_all(path: &Path) {
    let repo = git2::Repository::init(path).expect("Failed to init repository");
    let mut index = repo.index().expect("Failed to open index");
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .expect("Failed to add files");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let signature =
        git2::Signature::now("Test", "test@example.com").expect("Failed to create signature");
    repo.commit(Some("HEAD"), &signature, &signature, "Initial commit", &tree, &[])
        .expect("Failed to commit");
}

/// Manifest content for a project named `name`
#[allow(dead_code)]
pub fn manifest(name: &str) -> String {
    format!("name: {name}\nversion: 1.0.0\n")
}
