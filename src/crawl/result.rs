//! Per-directory crawl aggregate and the collapsing merge rule.

use crate::status::{BackupEntry, BackupKind};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Aggregate outcome for one directory's subtree.
///
/// Created when the scanner enters a directory, populated by checks on its
/// direct children and by merging child results, and finally merged into the
/// parent's result (the root result is returned to the caller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    /// The directory this result represents.
    pub path: PathBuf,
    /// Paths not covered by any backup mechanism.
    pub loose_paths: Vec<PathBuf>,
    /// Paths that could not be read due to permission errors.
    pub denied_paths: Vec<PathBuf>,
    /// Backup entries grouped by the checker kind that produced them.
    pub backups: BTreeMap<BackupKind, Vec<BackupEntry>>,
}

impl CrawlResult {
    /// Empty result for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loose_paths: Vec::new(),
            denied_paths: Vec::new(),
            backups: BTreeMap::new(),
        }
    }

    /// Record a backup entry under its checker kind.
    pub fn add_backup(&mut self, entry: BackupEntry) {
        self.backups.entry(entry.kind()).or_default().push(entry);
    }

    /// Whether any backup mechanism covers anything in this subtree.
    #[must_use]
    pub fn has_backups(&self) -> bool {
        self.backups.values().any(|entries| !entries.is_empty())
    }

    /// All backup entries of one kind, empty slice if none.
    #[must_use]
    pub fn backups_of(&self, kind: BackupKind) -> &[BackupEntry] {
        self.backups.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Merge a child directory's result into this one.
    ///
    /// Backup entries and denied paths always propagate. Loose paths follow
    /// the collapsing rule: a child subtree containing no backup entries at
    /// all is represented by the single path of the child directory instead
    /// of every leaf file inside it. The decision depends only on the child,
    /// so merging children in any order yields the same aggregate.
    pub fn extend(&mut self, child: Self) {
        let child_has_backups = child.has_backups();

        for (kind, entries) in child.backups {
            if entries.is_empty() {
                continue;
            }
            self.backups.entry(kind).or_default().extend(entries);
        }

        self.denied_paths.extend(child.denied_paths);

        if child_has_backups {
            self.loose_paths.extend(child.loose_paths);
        } else if !child.loose_paths.is_empty() {
            self.loose_paths.push(child.path);
        }
    }
}
