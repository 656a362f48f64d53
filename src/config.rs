//! Configuration parsing and defaults.
//!
//! The config file lives at the conventional user-config location
//! (`~/.config/backsweep/config.toml`) and currently holds the standing
//! ignore list plus scan tuning. A missing file is not an error: scans of a
//! fresh machine should work with no setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// User configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Glob patterns excluded from every scan, `~` allowed.
    #[serde(default)]
    pub ignore_paths: Vec<String>,

    /// Scan tuning.
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Scan tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Worker threads for checker and subtree fan-out; 0 picks a default
    /// from the CPU count.
    #[serde(default)]
    pub parallel_threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel_threads: 0,
        }
    }
}

impl Config {
    /// Conventional config file location, if a config directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("backsweep").join("config.toml"))
    }

    /// Load configuration from `path`.
    ///
    /// A missing file yields defaults with a logged warning; an unreadable
    /// or invalid file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(&temp.path().join("nope.toml")).unwrap();
        assert!(config.ignore_paths.is_empty());
        assert_eq!(config.scan.parallel_threads, 0);
    }

    #[test]
    fn test_full_config_parses() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
ignore_paths = ["~/.cache/*", "*.sock"]

[scan]
parallel_threads = 4
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.ignore_paths, vec!["~/.cache/*", "*.sock"]);
        assert_eq!(config.scan.parallel_threads, 4);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "ignore_paths = [\"/proc\"]\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.ignore_paths, vec!["/proc"]);
        assert_eq!(config.scan.parallel_threads, 0);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "ignore_paths = 42\n").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
