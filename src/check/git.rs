//! Git repository checker.
//!
//! A directory is a repository root if it contains a `.git` directory. The
//! repository is an atomic backup unit: the scanner never looks inside one.
//! Status comes from two porcelain commands, run with the repository as the
//! working directory:
//!
//! - `git status --porcelain` — any output means uncommitted changes.
//! - `git for-each-ref --format=%(upstream:trackshort) refs/heads` — any
//!   branch that is ahead of, diverged from, or missing an upstream means
//!   local commits are not guaranteed to exist anywhere else.

use crate::check::DirChecker;
use crate::status::{BackupEntry, BackupKind, SyncStatus};
use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Checker recognizing git repository roots.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitChecker;

impl GitChecker {
    /// Create a git checker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Determine the sync status of the repository rooted at `path`.
    fn repo_status(path: &Path) -> Result<SyncStatus> {
        let output = Command::new("git")
            .args(["status", "--porcelain"])
            .current_dir(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .context("Failed to run git status")?;

        if !output.status.success() {
            anyhow::bail!("git status exited with {}", output.status);
        }

        if !output.stdout.is_empty() {
            return Ok(SyncStatus::Dirty);
        }

        if Self::has_unpushed_branch(path)? {
            return Ok(SyncStatus::Ahead);
        }

        Ok(SyncStatus::Clean)
    }

    /// Whether any local branch has commits not present upstream.
    fn has_unpushed_branch(path: &Path) -> Result<bool> {
        let output = Command::new("git")
            .args([
                "for-each-ref",
                "--format=%(upstream:trackshort)",
                "refs/heads",
            ])
            .current_dir(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .context("Failed to run git for-each-ref")?;

        if !output.status.success() {
            anyhow::bail!("git for-each-ref exited with {}", output.status);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Self::any_ref_unpushed(&stdout))
    }

    /// `>` is ahead, `<>` has diverged. An empty track field means the
    /// branch has no upstream at all, so nothing guarantees its commits
    /// exist elsewhere; it counts as unpushed too.
    fn any_ref_unpushed(track_fields: &str) -> bool {
        track_fields
            .lines()
            .any(|line| matches!(line.trim(), "" | ">" | "<>"))
    }
}

impl DirChecker for GitChecker {
    fn kind(&self) -> BackupKind {
        BackupKind::Git
    }

    fn check_dir(&self, path: &Path) -> Option<BackupEntry> {
        if !path.join(".git").is_dir() {
            return None;
        }

        debug!(path = %path.display(), "Checking git repository");

        match Self::repo_status(path) {
            Ok(status) => Some(BackupEntry::git(path.to_path_buf(), status)),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Git check failed, treating directory as untracked"
                );
                None
            }
        }
    }
}
