//! Utility helpers shared across the crate.

/// Thread pool configuration for parallel crawling
pub mod thread_pool;

use anyhow::Result;
use std::path::PathBuf;

/// Expands a path starting with `~` to the user's home directory.
///
/// # Errors
///
/// Returns an error if the path is empty.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        anyhow::bail!("Path cannot be empty");
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Ok(home);
    }
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return Ok(home.join(&path[2..]));
    }
    Ok(PathBuf::from(path))
}
