//! Result presentation: human-readable panels and machine-readable JSON.
//!
//! Rendering consumes a finished [`CrawlResult`]; it never touches the
//! filesystem. The human format groups actionable states first and hides
//! clean entries unless asked, the JSON format always carries all states.

use crate::crawl::CrawlResult;
use crate::status::{BackupEntry, BackupSource, SyncStatus};
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Render the human-readable report.
#[must_use]
pub fn render_human(result: &CrawlResult, show_clean: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Not backed up".bold()));
    push_paths(&mut out, &result.loose_paths);

    if !result.denied_paths.is_empty() {
        out.push_str(&format!("\n{}\n", "Permission denied".bold()));
        push_paths(&mut out, &result.denied_paths);
    }

    let mut states: Vec<(SyncStatus, colored::ColoredString)> = vec![
        (SyncStatus::Dirty, "Dirty".red()),
        (SyncStatus::Ahead, "Unsynced".magenta()),
    ];
    if show_clean {
        states.push((SyncStatus::Clean, "Clean".green()));
    }

    for (kind, entries) in &result.backups {
        out.push_str(&format!("\n{}\n", kind.title().bold()));
        for (status, heading) in &states {
            out.push_str(&format!("  {heading}\n"));
            for entry in entries.iter().filter(|entry| entry.status == *status) {
                out.push_str(&format!("\t{}\n", describe(entry)));
            }
        }
    }

    out
}

/// Render the machine-readable report.
///
/// The mapping has `loose_paths` and `denied_paths` keys plus one key per
/// checker kind present, each mapping state names to path lists.
#[must_use]
pub fn render_json(result: &CrawlResult) -> Value {
    let mut root = Map::new();
    root.insert("loose_paths".to_string(), path_array(&result.loose_paths));
    root.insert("denied_paths".to_string(), path_array(&result.denied_paths));

    for (kind, entries) in &result.backups {
        let mut states = Map::new();
        for status in [SyncStatus::Dirty, SyncStatus::Ahead, SyncStatus::Clean] {
            let paths: Vec<Value> = entries
                .iter()
                .filter(|entry| entry.status == status)
                .map(|entry| Value::String(entry.path.display().to_string()))
                .collect();
            states.insert(status.label().to_string(), Value::Array(paths));
        }
        root.insert(kind.label().to_string(), Value::Object(states));
    }

    Value::Object(root)
}

/// One line per entry; pacman entries name the owning package.
fn describe(entry: &BackupEntry) -> String {
    match &entry.source {
        BackupSource::Git => entry.path.display().to_string(),
        BackupSource::Pacman { package } => {
            format!("{} ({package})", entry.path.display())
        }
    }
}

fn push_paths(out: &mut String, paths: &[PathBuf]) {
    for path in paths {
        out.push_str(&format!("\t{}\n", path.display()));
    }
}

fn path_array(paths: &[PathBuf]) -> Value {
    Value::Array(
        paths
            .iter()
            .map(|path| Value::String(path.display().to_string()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::BackupEntry;
    use std::path::PathBuf;

    fn sample() -> CrawlResult {
        let mut result = CrawlResult::new("/r");
        result.loose_paths.push(PathBuf::from("/r/notes.txt"));
        result.denied_paths.push(PathBuf::from("/r/locked"));
        result.add_backup(BackupEntry::git(
            PathBuf::from("/r/dotfiles"),
            SyncStatus::Dirty,
        ));
        result.add_backup(BackupEntry::git(
            PathBuf::from("/r/projects/site"),
            SyncStatus::Clean,
        ));
        result.add_backup(BackupEntry::pacman(
            PathBuf::from("/etc/pacman.conf"),
            SyncStatus::Clean,
            "pacman".to_string(),
        ));
        result
    }

    #[test]
    fn test_human_report_hides_clean_by_default() {
        let text = render_human(&sample(), false);

        assert!(text.contains("Not backed up"));
        assert!(text.contains("/r/notes.txt"));
        assert!(text.contains("Permission denied"));
        assert!(text.contains("/r/dotfiles"));
        assert!(!text.contains("/r/projects/site"));
        assert!(!text.contains("/etc/pacman.conf"));
    }

    #[test]
    fn test_human_report_shows_clean_when_verbose() {
        let text = render_human(&sample(), true);

        assert!(text.contains("/r/projects/site"));
        assert!(text.contains("/etc/pacman.conf (pacman)"));
    }

    #[test]
    fn test_human_report_omits_denied_section_when_empty() {
        let mut result = sample();
        result.denied_paths.clear();
        let text = render_human(&result, false);

        assert!(!text.contains("Permission denied"));
    }

    #[test]
    fn test_json_report_shape() {
        let value = render_json(&sample());

        assert_eq!(value["loose_paths"][0], "/r/notes.txt");
        assert_eq!(value["denied_paths"][0], "/r/locked");
        assert_eq!(value["git"]["Dirty"][0], "/r/dotfiles");
        assert_eq!(value["git"]["Clean"][0], "/r/projects/site");
        assert_eq!(value["pacman"]["Clean"][0], "/etc/pacman.conf");
        assert_eq!(value["git"]["Unsynced"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_json_report_omits_absent_kinds() {
        let result = CrawlResult::new("/r");
        let value = render_json(&result);

        assert!(value.get("git").is_none());
        assert!(value.get("pacman").is_none());
        assert_eq!(value["loose_paths"].as_array().unwrap().len(), 0);
    }
}
