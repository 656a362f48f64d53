//! Shared vocabulary for backup classification.
//!
//! Every checker produces [`BackupEntry`] values and the crawl aggregator
//! groups them by [`BackupKind`]. A checker that does not recognize a path
//! returns `None` from its check method; `None` means "try the next checker"
//! and is never an error.

use std::fmt;
use std::path::PathBuf;

/// Locally observable sync state of a backed-up path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyncStatus {
    /// Tracked, no local changes, fully propagated.
    Clean,
    /// Tracked, but local modifications are not recorded by the mechanism.
    Dirty,
    /// Recorded locally but not pushed anywhere else.
    Ahead,
}

impl SyncStatus {
    /// State name used by both report formats.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::Dirty => "Dirty",
            Self::Ahead => "Unsynced",
        }
    }

    /// Whether this state means something is not yet backed up.
    ///
    /// `Clean` is informational only; `Dirty` and `Ahead` need operator
    /// attention before a backup can be trusted.
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::Dirty | Self::Ahead)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which backup mechanism produced an entry.
///
/// Used as the grouping key in crawl results; the ordering gives the report
/// a stable section order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BackupKind {
    /// Version control: a git repository root.
    Git,
    /// Package manager: a file owned by an installed pacman package.
    Pacman,
}

impl BackupKind {
    /// Short machine-readable name, used as the JSON key.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Pacman => "pacman",
        }
    }

    /// Section title for the human-readable report.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Git => "Git repositories",
            Self::Pacman => "Pacman files",
        }
    }
}

impl fmt::Display for BackupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mechanism-specific metadata attached to a backup entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupSource {
    /// Entry produced by the git checker.
    Git,
    /// Entry produced by the pacman checker, with the owning package.
    Pacman {
        /// Name of the installed package that owns the file.
        package: String,
    },
}

impl BackupSource {
    /// The checker kind this metadata belongs to.
    #[must_use]
    pub const fn kind(&self) -> BackupKind {
        match self {
            Self::Git => BackupKind::Git,
            Self::Pacman { .. } => BackupKind::Pacman,
        }
    }
}

/// A single path resolved to a backup mechanism.
///
/// Created by a checker at check time, never mutated, owned by the crawl
/// result that collects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    /// The path this entry classifies.
    pub path: PathBuf,
    /// Sync state the checker observed.
    pub status: SyncStatus,
    /// Mechanism-specific metadata.
    pub source: BackupSource,
}

impl BackupEntry {
    /// Entry for a git repository root.
    #[must_use]
    pub const fn git(path: PathBuf, status: SyncStatus) -> Self {
        Self {
            path,
            status,
            source: BackupSource::Git,
        }
    }

    /// Entry for a pacman-owned file.
    #[must_use]
    pub const fn pacman(path: PathBuf, status: SyncStatus, package: String) -> Self {
        Self {
            path,
            status,
            source: BackupSource::Pacman { package },
        }
    }

    /// The checker kind that produced this entry.
    #[must_use]
    pub const fn kind(&self) -> BackupKind {
        self.source.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(SyncStatus::Clean.label(), "Clean");
        assert_eq!(SyncStatus::Dirty.label(), "Dirty");
        assert_eq!(SyncStatus::Ahead.label(), "Unsynced");
    }

    #[test]
    fn test_actionable_states() {
        assert!(SyncStatus::Dirty.is_actionable());
        assert!(SyncStatus::Ahead.is_actionable());
        assert!(!SyncStatus::Clean.is_actionable());
    }

    #[test]
    fn test_entry_kind_follows_source() {
        let repo = BackupEntry::git(PathBuf::from("/r/repo"), SyncStatus::Clean);
        assert_eq!(repo.kind(), BackupKind::Git);

        let file = BackupEntry::pacman(
            PathBuf::from("/etc/pacman.conf"),
            SyncStatus::Dirty,
            "pacman".to_string(),
        );
        assert_eq!(file.kind(), BackupKind::Pacman);
        assert_eq!(
            file.source,
            BackupSource::Pacman {
                package: "pacman".to_string()
            }
        );
    }

    #[test]
    fn test_kind_ordering_is_stable() {
        assert!(BackupKind::Git < BackupKind::Pacman);
    }
}
