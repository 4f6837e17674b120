//! Repository snapshots and the git queries run against them.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{DossierError, Result};

const REMOTE_PREFIXES: &[&str] = &["http://", "https://", "git@", "ssh://", "file://"];

/// Where a repository comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoLocation {
    /// Cloned into a temporary directory.
    Remote(String),
    /// Used in place.
    Local(PathBuf),
}

impl RepoLocation {
    pub fn parse(target: &str) -> Self {
        if REMOTE_PREFIXES.iter().any(|p| target.starts_with(p)) {
            RepoLocation::Remote(target.to_string())
        } else {
            RepoLocation::Local(PathBuf::from(target))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, RepoLocation::Remote(_))
    }
}

/// Read-only local view of a repository for one pipeline run.
///
/// A snapshot of a remote repository owns its temporary clone; dropping the
/// snapshot deletes it.
#[derive(Debug)]
pub struct RepoSnapshot {
    root: PathBuf,
    name: String,
    location: RepoLocation,
    _clone: Option<TempDir>,
}

impl RepoSnapshot {
    /// Wrap an existing local directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(DossierError::InvalidTarget(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        let root = path.canonicalize()?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        Ok(Self {
            root,
            name,
            location: RepoLocation::Local(path.to_path_buf()),
            _clone: None,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory name of the snapshot; for clones, the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &RepoLocation {
        &self.location
    }

    /// Best-known URL for the repository: the fetched URL verbatim for
    /// clones, else the checkout's normalized `origin` remote, else a
    /// `github.com/unknown/<name>` placeholder.
    pub fn source_url(&self) -> String {
        match &self.location {
            RepoLocation::Remote(url) => url.clone(),
            RepoLocation::Local(_) => origin_url(&self.root)
                .unwrap_or_else(|| format!("https://github.com/unknown/{}", self.name)),
        }
    }
}

/// Materialize `target` as a snapshot, shallow-cloning remote locations.
pub fn fetch_snapshot(target: &str) -> Result<RepoSnapshot> {
    match RepoLocation::parse(target) {
        RepoLocation::Local(path) => RepoSnapshot::open(path),
        RepoLocation::Remote(url) => shallow_clone(&url),
    }
}

fn shallow_clone(url: &str) -> Result<RepoSnapshot> {
    let name = repo_name_from_url(url);
    let tmp = tempfile::Builder::new().prefix("repo-dossier-").tempdir()?;
    let root = tmp.path().join(&name);

    debug!(url = %url, dest = %root.display(), "cloning repository");
    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--quiet", url])
        .arg(&root)
        .output()
        .map_err(|e| DossierError::Fetch {
            location: url.to_string(),
            reason: format!("failed to run git: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DossierError::Fetch {
            location: url.to_string(),
            reason: stderr.trim().to_string(),
        });
    }

    Ok(RepoSnapshot {
        root,
        name,
        location: RepoLocation::Remote(url.to_string()),
        _clone: Some(tmp),
    })
}

/// Last path segment of a repository URL, without a `.git` suffix.
pub fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        "repository".to_string()
    } else {
        name.to_string()
    }
}

/// Author timestamp of the most recent commit, in strict ISO-8601.
///
/// `None` when `repo_dir` is not a git checkout, has no commits, or git is
/// unavailable. Never an error.
pub fn last_commit_timestamp(repo_dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["log", "-1", "--format=%aI"])
        .current_dir(repo_dir)
        .output()
        .map_err(|e| warn!(error = %e, "failed to run git log"))
        .ok()?;

    if !output.status.success() {
        debug!(
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "no commit timestamp available"
        );
        return None;
    }

    let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
    match chrono::DateTime::parse_from_rfc3339(&raw) {
        Ok(ts) => Some(ts.to_rfc3339()),
        Err(e) => {
            warn!(value = %raw, error = %e, "unparseable commit timestamp");
            None
        }
    }
}

/// URL of the `origin` remote, normalized to an https form.
pub fn origin_url(repo_dir: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(repo_dir)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let remote = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if remote.is_empty() {
        None
    } else {
        Some(normalize_remote_url(&remote))
    }
}

/// Rewrite GitHub SSH remotes to https and drop a trailing `.git`.
pub fn normalize_remote_url(remote: &str) -> String {
    let url = match remote.strip_prefix("git@github.com:") {
        Some(path) => format!("https://github.com/{path}"),
        None => remote.to_string(),
    };
    url.strip_suffix(".git").map(str::to_string).unwrap_or(url)
}
