//! Ignore-pattern matching for the crawl engine.
//!
//! Patterns are shell globs matched against the absolute path string. A `~`
//! prefix expands to the home directory before compilation, so config
//! entries like `~/.cache/*` work as expected. Matching happens before any
//! filesystem access beyond listing, so ignored paths never reach a checker.

use crate::utils::expand_tilde;
use anyhow::{Context, Result};
use glob::Pattern;
use std::path::Path;

/// Compiled set of ignore patterns.
#[derive(Debug, Default)]
pub struct IgnoreList {
    /// Compiled patterns in configuration order.
    patterns: Vec<Pattern>,
}

impl IgnoreList {
    /// Compile raw pattern strings.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is empty or not a valid shell glob.
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for raw in patterns {
            let expanded = expand_tilde(raw)?;
            let pattern = Pattern::new(&expanded.to_string_lossy())
                .with_context(|| format!("Invalid ignore pattern: {raw}"))?;
            compiled.push(pattern);
        }
        Ok(Self { patterns: compiled })
    }

    /// Whether `path` matches any configured pattern.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        self.patterns.iter().any(|pattern| pattern.matches(&text))
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn compile(patterns: &[&str]) -> IgnoreList {
        let owned: Vec<String> = patterns.iter().map(ToString::to_string).collect();
        IgnoreList::compile(&owned).unwrap()
    }

    #[test]
    fn test_literal_match() {
        let ignore = compile(&["/home/user/.cache"]);
        assert!(ignore.matches(Path::new("/home/user/.cache")));
        assert!(!ignore.matches(Path::new("/home/user/.config")));
    }

    #[test]
    fn test_wildcard_match() {
        let ignore = compile(&["*.sock", "/var/tmp/*"]);
        assert!(ignore.matches(Path::new("/run/user/1000/agent.sock")));
        assert!(ignore.matches(Path::new("/var/tmp/scratch")));
        assert!(!ignore.matches(Path::new("/var/log/pacman.log")));
    }

    #[test]
    fn test_tilde_expansion() {
        let home = dirs::home_dir().unwrap();
        let ignore = compile(&["~/Downloads/*"]);
        let inside: PathBuf = home.join("Downloads/movie.mkv");
        assert!(ignore.matches(&inside));
        assert!(!ignore.matches(Path::new("/srv/Downloads/movie.mkv")));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let patterns = vec!["[".to_string()];
        assert!(IgnoreList::compile(&patterns).is_err());
    }

    #[test]
    fn test_empty_list_matches_nothing() {
        let ignore = IgnoreList::default();
        assert!(ignore.is_empty());
        assert!(!ignore.matches(Path::new("/anything")));
    }
}
