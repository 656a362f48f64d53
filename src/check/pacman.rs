//! Pacman package checker.
//!
//! A file is backed up by pacman if the local package database lists it
//! under an installed package. Querying the database per file would spawn
//! thousands of subprocesses on a system scan, so the checker builds two
//! lookup tables lazily, each at most once per scan:
//!
//! - a file → owning-package map from a single `pacman -Ql` run, and
//! - the set of files whose content no longer matches the package database,
//!   from a single `pacman -Qkk` verification pass.
//!
//! Both tables are owned by the checker instance and read-only once built.
//! If pacman is missing or either pass fails, the tables stay empty and
//! every check degrades to "not owned".

use crate::check::FileChecker;
use crate::status::{BackupEntry, BackupKind, SyncStatus};
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Mismatch reasons meaning the file content differs from the package.
const CONTENT_MISMATCHES: &[&str] = &[
    "Size mismatch",
    "MD5 checksum mismatch",
    "SHA256 checksum mismatch",
    "Symlink path mismatch",
    "File type mismatch",
    "Missing file",
    "No such file or directory",
];

/// Mismatch reasons about file properties, not content; reinstalling the
/// package still restores the bytes, so these do not count as dirty.
const PROPERTY_MISMATCHES: &[&str] = &[
    "Modification time mismatch",
    "Permissions mismatch",
    "UID mismatch",
    "GID mismatch",
];

/// Checker recognizing files owned by installed pacman packages.
pub struct PacmanChecker {
    /// File → owning package, built from one `pacman -Ql` pass.
    file_map: OnceCell<HashMap<PathBuf, String>>,
    /// Files failing content verification, built from one `pacman -Qkk` pass.
    modified: OnceCell<HashSet<PathBuf>>,
    /// Verification mismatch reasons already warned about.
    seen_reasons: Mutex<HashSet<String>>,
}

impl PacmanChecker {
    /// Create a pacman checker; the lookup tables are built on first use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            file_map: OnceCell::new(),
            modified: OnceCell::new(),
            seen_reasons: Mutex::new(HashSet::new()),
        }
    }

    fn file_map(&self) -> &HashMap<PathBuf, String> {
        self.file_map.get_or_init(|| match Self::load_file_map() {
            Ok(map) => {
                debug!(files = map.len(), "Built pacman file table");
                map
            }
            Err(e) => {
                warn!(error = %e, "Could not build pacman file table, package checks disabled");
                HashMap::new()
            }
        })
    }

    fn load_file_map() -> Result<HashMap<PathBuf, String>> {
        which::which("pacman").context("pacman is not installed")?;

        let output = Command::new("pacman")
            .arg("-Ql")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .context("Failed to run pacman -Ql")?;

        if !output.status.success() {
            anyhow::bail!("pacman -Ql exited with {}", output.status);
        }

        Ok(Self::parse_file_listing(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    /// Parse `pacman -Ql` output: one `package path` pair per line.
    fn parse_file_listing(listing: &str) -> HashMap<PathBuf, String> {
        let mut map = HashMap::new();
        for line in listing.lines() {
            let Some((package, path)) = line.split_once(' ') else {
                continue;
            };
            // Directory entries end in '/' and can never match a regular file
            if path.ends_with('/') {
                continue;
            }
            map.insert(PathBuf::from(path), package.to_string());
        }
        map
    }

    fn modified_files(&self) -> &HashSet<PathBuf> {
        self.modified.get_or_init(|| match self.load_modified() {
            Ok(set) => {
                debug!(files = set.len(), "Built pacman modified-file table");
                set
            }
            Err(e) => {
                warn!(error = %e, "Could not verify pacman packages, owned files assumed clean");
                HashSet::new()
            }
        })
    }

    fn load_modified(&self) -> Result<HashSet<PathBuf>> {
        // pacman exits non-zero when any package fails verification, which
        // is exactly the interesting case; only spawn failure is an error
        let output = Command::new("pacman")
            .arg("-Qkk")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .context("Failed to run pacman -Qkk")?;

        Ok(self.parse_verification(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Collect paths with content-affecting mismatches from a `pacman -Qkk`
    /// report. Unknown mismatch reasons are logged once each and skipped.
    fn parse_verification(&self, report: &str) -> HashSet<PathBuf> {
        let mut modified = HashSet::new();
        for line in report.lines() {
            let Some((path, reason)) = Self::split_verify_line(line) else {
                continue;
            };
            if CONTENT_MISMATCHES.contains(&reason) {
                modified.insert(PathBuf::from(path));
            } else if !PROPERTY_MISMATCHES.contains(&reason) {
                self.warn_unknown_reason(reason);
            }
        }
        modified
    }

    /// Split a verification line like
    /// `backup file: pacman: /etc/pacman.conf (Modification time mismatch)`
    /// into the absolute path and the parenthesized reason. Summary lines
    /// have no parenthesized suffix and yield `None`.
    fn split_verify_line(line: &str) -> Option<(&str, &str)> {
        let open = line.rfind(" (")?;
        let reason = line[open + 2..].trim_end().strip_suffix(')')?;
        let path_start = line[..open].find(" /")? + 1;
        Some((&line[path_start..open], reason))
    }

    fn warn_unknown_reason(&self, reason: &str) {
        let Ok(mut seen) = self.seen_reasons.lock() else {
            return;
        };
        if seen.insert(reason.to_string()) {
            warn!(
                reason,
                "Unknown pacman verification mismatch, not treated as a modification"
            );
        }
    }

    /// Build a checker with pre-populated tables, bypassing pacman.
    #[cfg(test)]
    fn from_tables(file_map: HashMap<PathBuf, String>, modified: HashSet<PathBuf>) -> Self {
        let checker = Self::new();
        checker.file_map.set(file_map).expect("fresh cell");
        checker.modified.set(modified).expect("fresh cell");
        checker
    }
}

impl Default for PacmanChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl FileChecker for PacmanChecker {
    fn kind(&self) -> BackupKind {
        BackupKind::Pacman
    }

    fn check_file(&self, path: &Path) -> Option<BackupEntry> {
        let package = self.file_map().get(path)?.clone();

        debug!(path = %path.display(), package, "File is pacman-owned");

        let status = if self.modified_files().contains(path) {
            SyncStatus::Dirty
        } else {
            SyncStatus::Clean
        };

        Some(BackupEntry::pacman(path.to_path_buf(), status, package))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
bash /usr/bin/bash
bash /usr/share/
bash /usr/share/man/man1/bash.1.gz
pacman /etc/pacman.conf
";

    #[test]
    fn test_parse_file_listing_skips_directories() {
        let map = PacmanChecker::parse_file_listing(LISTING);
        assert_eq!(map.len(), 3);
        assert_eq!(map[Path::new("/usr/bin/bash")], "bash");
        assert_eq!(map[Path::new("/etc/pacman.conf")], "pacman");
        assert!(!map.contains_key(Path::new("/usr/share/")));
    }

    #[test]
    fn test_split_verify_line() {
        let line = "backup file: pacman: /etc/pacman.conf (Modification time mismatch)";
        let (path, reason) = PacmanChecker::split_verify_line(line).unwrap();
        assert_eq!(path, "/etc/pacman.conf");
        assert_eq!(reason, "Modification time mismatch");

        let summary = "bash: 123 total files, 0 altered files";
        assert!(PacmanChecker::split_verify_line(summary).is_none());
    }

    #[test]
    fn test_verification_classifies_reasons() {
        let checker = PacmanChecker::new();
        let report = "\
bash: /usr/bin/bash (SHA256 checksum mismatch)
pacman: /etc/pacman.conf (Modification time mismatch)
grub: /boot/grub/grub.cfg (Size mismatch)
weird: /opt/weird (Quantum flux mismatch)
weird: /opt/weird2 (Quantum flux mismatch)
";
        let modified = checker.parse_verification(report);

        assert!(modified.contains(Path::new("/usr/bin/bash")));
        assert!(modified.contains(Path::new("/boot/grub/grub.cfg")));
        assert!(!modified.contains(Path::new("/etc/pacman.conf")));
        assert!(!modified.contains(Path::new("/opt/weird")));

        // the unknown reason is recorded once, not per occurrence
        let seen = checker.seen_reasons.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen.contains("Quantum flux mismatch"));
    }

    #[test]
    fn test_check_file_with_tables() {
        let mut file_map = HashMap::new();
        file_map.insert(PathBuf::from("/usr/bin/bash"), "bash".to_string());
        file_map.insert(PathBuf::from("/etc/pacman.conf"), "pacman".to_string());
        let mut modified = HashSet::new();
        modified.insert(PathBuf::from("/etc/pacman.conf"));

        let checker = PacmanChecker::from_tables(file_map, modified);

        let clean = checker.check_file(Path::new("/usr/bin/bash")).unwrap();
        assert_eq!(clean.status, SyncStatus::Clean);
        assert_eq!(clean.kind(), BackupKind::Pacman);

        let dirty = checker.check_file(Path::new("/etc/pacman.conf")).unwrap();
        assert_eq!(dirty.status, SyncStatus::Dirty);

        assert!(
            checker
                .check_file(Path::new("/home/user/notes.txt"))
                .is_none()
        );
    }
}
