//! Source control for checkouts
//!
//! This module handles:
//! - The [`SourceControl`] seam used by the checkout step
//! - Cloning git repositories (HTTPS, SSH and local directories)
//! - Resolving an optional `#ref` suffix and checking out that commit
//!
//! Authentication is delegated to git's native credential system
//! (SSH agent, keys in `~/.ssh/`, credential helpers).

mod auth;
mod location;
mod refs;

use std::path::{Path, PathBuf};

use git2::{FetchOptions, RemoteCallbacks, Repository, build::RepoBuilder};

use crate::error::{Result, checkout_failed};

pub use location::{SourceLocation, repo_name_from_url};
pub use refs::{checkout_commit, resolve_ref};

/// Fetches one remote location into a local directory
pub trait SourceControl: Send + Sync {
    /// Check out `location` into a new directory below `destination`
    ///
    /// Returns the directory that now holds the checkout.
    fn checkout(&self, location: &str, destination: &Path) -> Result<PathBuf>;
}

/// [`SourceControl`] backed by libgit2
#[derive(Debug, Clone, Copy)]
pub struct GitSourceControl {
    shallow: bool,
}

impl Default for GitSourceControl {
    fn default() -> Self {
        Self { shallow: true }
    }
}

impl GitSourceControl {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceControl for GitSourceControl {
    fn checkout(&self, location: &str, destination: &Path) -> Result<PathBuf> {
        let source = SourceLocation::parse(location);
        let target = checkout_directory(destination, &source)?;

        tracing::info!(
            url = %source.url,
            git_ref = ?source.git_ref,
            target = %target.display(),
            "checking out"
        );

        // A named ref may not be reachable from a depth-1 clone.
        let shallow = self.shallow && source.git_ref.is_none();
        let repo = clone(&source.url, &target, shallow)
            .map_err(|e| checkout_failed(location, interpret_git_error(&e)))?;

        if let Some(git_ref) = source.git_ref.as_deref() {
            let sha = resolve_ref(&repo, Some(git_ref))?;
            checkout_commit(&repo, &sha)?;
            tracing::debug!(git_ref, sha = %sha, "checked out ref");
        }

        Ok(target)
    }
}

/// Pick a fresh directory for a checkout below `destination`
///
/// Uses the repository name, suffixed with a short hash of the URL when that
/// directory is already taken.
pub fn checkout_directory(destination: &Path, source: &SourceLocation) -> Result<PathBuf> {
    let name = repo_name_from_url(&source.url);
    let plain = destination.join(&name);
    if !plain.exists() {
        return Ok(plain);
    }

    let hash = blake3::hash(source.url.as_bytes()).to_hex();
    let hashed = destination.join(format!("{name}-{}", &hash[..8]));
    if !hashed.exists() {
        return Ok(hashed);
    }

    Err(checkout_failed(
        source.url.clone(),
        format!("destination '{}' already exists", hashed.display()),
    ))
}

fn clone(url: &str, target: &Path, shallow: bool) -> std::result::Result<Repository, git2::Error> {
    let mut callbacks = RemoteCallbacks::new();
    auth::setup_auth_callbacks(&mut callbacks);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);

    // Shallow fetches are not supported by the local transport.
    if shallow && !url.starts_with("file://") {
        fetch_options.depth(1);
    }

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);
    builder.clone(url, target)
}

/// Turn a libgit2 error into a message a user can act on
fn interpret_git_error(err: &git2::Error) -> String {
    let message = err.message().to_lowercase();

    if message.contains("not found") || message.contains("404") {
        "repository not found".to_string()
    } else if message.contains("authentication") || message.contains("credentials") {
        "authentication failed".to_string()
    } else if message.contains("permission denied") || message.contains("access denied") {
        "permission denied".to_string()
    } else if message.contains("timed out")
        || message.contains("timeout")
        || message.contains("connection")
        || err.class() == git2::ErrorClass::Net
    {
        format!("network error: {}", err.message())
    } else if err.class() == git2::ErrorClass::Ssl
        || (err.class() == git2::ErrorClass::Http && message.contains("certificate"))
    {
        format!("TLS error: {}", err.message())
    } else {
        err.message().to_string()
    }
}
