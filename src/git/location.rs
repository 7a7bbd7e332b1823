//! Checkout location parsing
//!
//! A location is a git URL, an SCP-style SSH address or a local directory,
//! optionally followed by `#<ref>`.

use std::path::Path;

/// A parsed checkout location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// URL handed to libgit2
    pub url: String,

    /// Branch, tag or commit to check out after cloning
    pub git_ref: Option<String>,
}

impl SourceLocation {
    pub fn parse(location: &str) -> Self {
        let (base, git_ref) = match location.rsplit_once('#') {
            Some((base, git_ref)) if !git_ref.is_empty() => (base, Some(git_ref.to_string())),
            Some((base, _)) => (base, None),
            None => (location, None),
        };

        Self {
            url: normalize_url(base),
            git_ref,
        }
    }
}

fn normalize_url(base: &str) -> String {
    let path = Path::new(base);
    if path.is_dir() {
        let absolute = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        return format!("file://{}", absolute.display());
    }

    if let Some(rest) = base.strip_prefix("file://") {
        return if rest.starts_with('/') {
            base.to_string()
        } else {
            format!("file:///{rest}")
        };
    }

    scp_to_ssh(base)
}

/// Convert `git@host:path` to `ssh://git@host/path`, which libgit2 parses reliably
fn scp_to_ssh(url: &str) -> String {
    if !url.starts_with("git@") {
        return url.to_string();
    }

    match url.split_once(':') {
        Some((host, path)) if path.starts_with('/') => format!("ssh://{host}{path}"),
        Some((host, path)) => format!("ssh://{host}/{path}"),
        None => url.to_string(),
    }
}

/// Directory-safe repository name taken from the last URL segment
pub fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed
        .rsplit(['/', ':', '\\'])
        .next()
        .unwrap_or(trimmed);
    let segment = segment.strip_suffix(".git").unwrap_or(segment);

    let name: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();

    match name.trim_matches('.') {
        "" => "checkout".to_string(),
        name => name.to_string(),
    }
}
