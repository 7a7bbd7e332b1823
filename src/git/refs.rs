//! Ref resolution and detached checkouts

use git2::{Commit, Oid, Repository, build::CheckoutBuilder};

use crate::error::{Result, ScmError};

fn ref_error(git_ref: &str, err: &git2::Error) -> ScmError {
    ScmError::GitRefResolveFailed {
        git_ref: git_ref.to_string(),
        reason: err.message().to_string(),
    }
}

fn checkout_error(sha: &str, err: &git2::Error) -> ScmError {
    ScmError::GitCheckoutFailed {
        sha: sha.to_string(),
        reason: err.message().to_string(),
    }
}

/// Resolve a branch, tag or (partial) SHA to a full SHA; `None` means HEAD
pub fn resolve_ref(repo: &Repository, git_ref: Option<&str>) -> Result<String> {
    let commit = match git_ref {
        Some(name) => find_commit(repo, name)?,
        None => repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| ref_error("HEAD", &e))?,
    };

    Ok(commit.id().to_string())
}

fn find_commit<'r>(repo: &'r Repository, name: &str) -> Result<Commit<'r>> {
    let candidates = [
        name.to_string(),
        format!("refs/heads/{name}"),
        format!("refs/tags/{name}"),
        format!("refs/remotes/origin/{name}"),
    ];

    let by_reference = candidates.iter().find_map(|candidate| {
        repo.find_reference(candidate)
            .and_then(|reference| reference.peel_to_commit())
            .ok()
    });
    if let Some(commit) = by_reference {
        return Ok(commit);
    }

    if let Some(commit) = Oid::from_str(name).ok().and_then(|oid| repo.find_commit(oid).ok()) {
        return Ok(commit);
    }

    repo.revparse_single(name)
        .and_then(|object| object.peel_to_commit())
        .map_err(|e| ref_error(name, &e))
}

/// Detach HEAD at `sha` and force the working tree to match
pub fn checkout_commit(repo: &Repository, sha: &str) -> Result<()> {
    let oid = Oid::from_str(sha).map_err(|e| checkout_error(sha, &e))?;
    let commit = repo.find_commit(oid).map_err(|e| checkout_error(sha, &e))?;

    repo.set_head_detached(commit.id())
        .map_err(|e| checkout_error(sha, &e))?;

    let mut builder = CheckoutBuilder::new();
    builder.force();
    repo.checkout_head(Some(&mut builder))
        .map_err(|e| checkout_error(sha, &e))
}
