#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # Backsweep - Backup Coverage Auditor
//!
//! Backsweep recursively scans a directory tree and classifies every leaf
//! path as backed up (owned by a git repository or an installed pacman
//! package) or loose (nothing would restore it after a disk loss). It is a
//! reporting tool for a single operator auditing a home directory or system
//! tree before taking a backup; it never modifies the filesystem.
//!
//! ## Architecture
//!
//! - [`status`]: the shared vocabulary (sync states, backup entries)
//! - [`check`]: pluggable per-mechanism checkers (git, pacman)
//! - [`crawl`]: the recursive engine, result aggregation, ignore patterns
//! - [`progress`]: scan liveness tracking
//! - [`report`]: human and JSON rendering of a finished result
//! - [`config`]: user configuration
//!
//! ## Example
//!
//! ```no_run
//! use backsweep::check::CheckerSet;
//! use backsweep::crawl::{IgnoreList, Scanner};
//! use backsweep::progress::NoopTracker;
//!
//! # fn main() -> anyhow::Result<()> {
//! let scanner = Scanner::new(CheckerSet::default_set(), IgnoreList::default());
//! let result = scanner.scan(std::path::Path::new("/home/user"), &NoopTracker)?;
//! for path in &result.loose_paths {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Pluggable backup-mechanism checkers.
pub mod check;

/// Configuration parsing and defaults.
pub mod config;

/// Crawl engine, result aggregation and ignore patterns.
pub mod crawl;

/// Scan progress tracking.
pub mod progress;

/// Result presentation in human and JSON form.
pub mod report;

/// Shared status vocabulary.
pub mod status;

/// Utility functions and helpers.
pub mod utils;

/// Application version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
