//! Crawl engine: recursive post-order traversal of a directory tree.
//!
//! The scanner walks top-down to decide what to filter and where to recurse,
//! but aggregates bottom-up: a directory's [`CrawlResult`] is only known
//! after all of its children are resolved. Sibling subtrees are independent
//! and fan out on the shared rayon pool; children merge in sorted name
//! order, so scheduling never changes the aggregate.

pub mod ignore;
pub mod result;

pub use ignore::IgnoreList;
pub use result::CrawlResult;

use crate::check::CheckerSet;
use crate::progress::Tracker;
use crate::status::BackupEntry;
use crate::utils::thread_pool;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Recursive scanner partitioning a tree into backed-up and loose paths.
pub struct Scanner {
    /// Ordered checkers consulted for every directory and file.
    checkers: CheckerSet,
    /// Paths matching these patterns are skipped before any other work.
    ignore: IgnoreList,
    /// When set, the scan stops descending and unwinds with a partial
    /// aggregate that the caller must discard.
    cancel: Arc<AtomicBool>,
}

/// Notifies the tracker of scan completion on every exit path.
struct TrackerGuard<'a>(&'a dyn Tracker);

impl Drop for TrackerGuard<'_> {
    fn drop(&mut self) {
        self.0.finish();
    }
}

impl Scanner {
    /// Scanner over the given checkers and ignore patterns.
    #[must_use]
    pub fn new(checkers: CheckerSet, ignore: IgnoreList) -> Self {
        Self {
            checkers,
            ignore,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that aborts the scan at directory granularity when set.
    #[must_use]
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Scan the tree rooted at `root`.
    ///
    /// The tracker receives open/close/current events as side effects and a
    /// final completion event even if the traversal unwinds; it never
    /// influences the result.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist, is not a directory, or is
    /// not readable. Everything below the root is best-effort: unreadable
    /// subdirectories land in `denied_paths` instead of failing the scan.
    pub fn scan(&self, root: &Path, tracker: &dyn Tracker) -> Result<CrawlResult> {
        let meta = fs::symlink_metadata(root)
            .with_context(|| format!("Cannot read scan root {}", root.display()))?;
        if !meta.is_dir() {
            anyhow::bail!("Scan root {} is not a directory", root.display());
        }
        fs::read_dir(root).with_context(|| format!("Cannot list scan root {}", root.display()))?;

        let _guard = TrackerGuard(tracker);
        let mut result = thread_pool::run_in_pool(|| self.crawl_dir(root, tracker));

        // The collapse rule applies to the scan root as well: a tree with
        // no backup entries anywhere reports as a single loose path
        if !result.has_backups() && !result.loose_paths.is_empty() {
            result.loose_paths = vec![root.to_path_buf()];
        }

        Ok(result)
    }

    /// Post-order walk of one directory.
    fn crawl_dir(&self, dir: &Path, tracker: &dyn Tracker) -> CrawlResult {
        let mut result = CrawlResult::new(dir);

        if self.cancel.load(Ordering::Relaxed) {
            return result;
        }

        tracker.current_path(dir);
        debug!(path = %dir.display(), "Entering directory");

        // A directory owned in its entirety by one mechanism is atomic:
        // never look inside, even for nested repositories
        if let Some(entry) = self.checkers.check_dir(dir) {
            result.add_backup(entry);
            return result;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                result.denied_paths.push(dir.to_path_buf());
                return result;
            }
            // The directory vanished between listing and descent
            Err(_) => return result,
        };

        let (files, dirs) = self.partition_children(entries);

        let mut batch = files.clone();
        batch.extend_from_slice(&dirs);
        tracker.open_paths(&batch);

        // Each file check may spawn an external tool, so fan out
        let file_outcomes: Vec<(PathBuf, Option<BackupEntry>)> = files
            .into_par_iter()
            .map(|path| {
                let outcome = self.checkers.check_file(&path);
                tracker.close_path(&path);
                (path, outcome)
            })
            .collect();

        for (path, outcome) in file_outcomes {
            match outcome {
                Some(entry) => result.add_backup(entry),
                None => result.loose_paths.push(path),
            }
        }

        let child_results: Vec<CrawlResult> = dirs
            .into_par_iter()
            .map(|path| self.crawl_dir(&path, tracker))
            .collect();

        for child in child_results {
            let child_path = child.path.clone();
            result.extend(child);
            tracker.close_path(&child_path);
        }

        result
    }

    /// Split readable directory entries into file and directory candidates,
    /// in sorted order. Ignored paths are dropped before any metadata
    /// lookup; symlinks, sockets, pipes, device nodes and entries that
    /// vanish mid-listing are dropped silently.
    fn partition_children(&self, entries: fs::ReadDir) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut files = Vec::new();
        let mut dirs = Vec::new();

        for entry in entries.flatten() {
            let path = entry.path();
            if self.ignore.matches(&path) {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_file() {
                files.push(path);
            } else if file_type.is_dir() {
                dirs.push(path);
            }
        }

        files.sort();
        dirs.sort();
        (files, dirs)
    }
}
