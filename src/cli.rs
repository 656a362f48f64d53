//! Command-line interface definitions for backsweep.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{Parser, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for backsweep.
#[derive(Parser)]
#[command(
    name = "backsweep",
    version = crate::VERSION,
    about = "Find files not covered by any backup mechanism",
    long_about = "Recursively scans a directory tree and reports which paths are \
                  protected by git or pacman and which are loose, so you know what \
                  a backup would miss"
)]
pub struct Cli {
    /// Root directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Glob pattern to exclude, matched against absolute paths (repeatable)
    #[arg(short, long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Print scan progress to stderr
    #[arg(short, long)]
    pub progress: bool,

    /// Include clean entries in the report
    #[arg(short, long)]
    pub verbose: bool,

    /// Raise log verbosity (-d info, -dd debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Alternate config file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Panel-style report for a terminal
    Human,
    /// JSON mapping for scripts
    Json,
}
