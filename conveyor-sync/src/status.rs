//! Read-only sync status classification.
//!
//! Per-source precedence:
//! 1. `New` (no ledger entry)
//! 2. `Modified` (content hash differs from the ledger)
//! 3. `ArtifactMissing` (hash matches but the artifact is gone from dist;
//!    the hash gate means a plain `sync` will NOT repair this)
//! 4. `Current`
//!
//! Ledger entries whose source file vanished and dist entries the ledger
//! does not name are reported separately.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use conveyor_core::Profile;

use crate::error::{io_err, SyncError};
use crate::hasher;
use crate::ledger;

/// Classification for one existing source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceState {
    New,
    Modified,
    ArtifactMissing,
    Current,
}

/// One classified source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    /// Ledger key, e.g. `src/app.js`.
    pub key: String,
    pub state: SourceState,
}

/// Full status of a root, computed without any writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub sources: Vec<SourceStatus>,
    /// Ledger keys whose source file no longer exists.
    pub missing: Vec<String>,
    /// Dist entries not named by any ledger entry.
    pub orphans: Vec<PathBuf>,
    /// `None` until a mutating sync has persisted the ledger.
    pub last_synced: Option<DateTime<Utc>>,
}

impl StatusReport {
    /// True when a `sync` run would change nothing.
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty()
            && self
                .sources
                .iter()
                .all(|s| matches!(s.state, SourceState::Current | SourceState::ArtifactMissing))
    }
}

/// Classify every source file, vanished ledger entry, and dist orphan.
pub fn check(root: &Path, profile: &Profile) -> Result<StatusReport, SyncError> {
    let source_dir = profile.source_dir_at(root);
    let dist_dir = profile.dist_dir_at(root);
    let ledger_path = profile.ledger_path_at(root);

    let ledger_exists = ledger_path.exists();
    let ledger = ledger::load_at(&ledger_path);
    let last_synced = if ledger_exists && !ledger.files.is_empty() {
        Some(ledger.synced_at)
    } else {
        None
    };

    let entries = std::fs::read_dir(&source_dir).map_err(|e| io_err(&source_dir, e))?;
    let mut source_entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    source_entries.sort_by_key(|e| e.file_name());

    let mut sources = Vec::new();
    for entry in source_entries {
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = profile.source_dir.join(&name).to_string_lossy().into_owned();

        let state = match ledger.files.get(&key) {
            None => SourceState::New,
            Some(recorded) => {
                let current = hasher::hash_file(&entry.path())?;
                if current != recorded.hash {
                    SourceState::Modified
                } else if dist_dir.join(recorded.artifact.as_ref()).exists() {
                    SourceState::Current
                } else {
                    SourceState::ArtifactMissing
                }
            }
        };
        sources.push(SourceStatus { key, state });
    }

    let missing: Vec<String> = ledger
        .files
        .keys()
        .filter(|key| !root.join(key.as_str()).exists())
        .cloned()
        .collect();

    let mut orphans = Vec::new();
    if !ledger.files.is_empty() {
        let keep = ledger.current_artifacts();
        if let Ok(entries) = std::fs::read_dir(&dist_dir) {
            for entry in entries.filter_map(|e| e.ok()) {
                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                if !keep.contains(name.as_str()) {
                    orphans.push(entry.path());
                }
            }
        }
        orphans.sort();
    }

    Ok(StatusReport {
        sources,
        missing,
        orphans,
        last_synced,
    })
}

/// Compact age rendering for status output.
pub fn format_age(timestamp: DateTime<Utc>) -> String {
    let seconds = Utc::now()
        .signed_duration_since(timestamp)
        .num_seconds()
        .max(0) as u64;
    format_seconds(seconds)
}

fn format_seconds(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 60 * 60 {
        return format!("{}m", seconds / 60);
    }
    if seconds < 60 * 60 * 24 {
        return format!("{}h", seconds / (60 * 60));
    }
    format!("{}d", seconds / (60 * 60 * 24))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::TempDir;

    use crate::pipeline::{self, SyncOptions};

    fn setup_root() -> TempDir {
        let root = TempDir::new().expect("root");
        fs::create_dir_all(root.path().join("src")).expect("mkdir src");
        root
    }

    fn state_of<'a>(report: &'a StatusReport, key: &str) -> &'a SourceState {
        &report
            .sources
            .iter()
            .find(|s| s.key == key)
            .unwrap_or_else(|| panic!("no status row for {key}"))
            .state
    }

    #[test]
    fn fresh_root_reports_everything_new() {
        let root = setup_root();
        fs::write(root.path().join("src/a.txt"), "hello").unwrap();

        let report = check(root.path(), &Profile::default()).expect("check");
        assert_eq!(*state_of(&report, "src/a.txt"), SourceState::New);
        assert!(report.last_synced.is_none());
        assert!(!report.is_clean());
    }

    #[test]
    fn synced_root_is_current_and_clean() {
        let root = setup_root();
        fs::write(root.path().join("src/a.txt"), "hello").unwrap();
        pipeline::run(root.path(), SyncOptions::default()).expect("sync");

        let report = check(root.path(), &Profile::default()).expect("check");
        assert_eq!(*state_of(&report, "src/a.txt"), SourceState::Current);
        assert!(report.last_synced.is_some());
        assert!(report.is_clean());
    }

    #[test]
    fn edited_source_is_modified() {
        let root = setup_root();
        fs::write(root.path().join("src/a.txt"), "hello").unwrap();
        pipeline::run(root.path(), SyncOptions::default()).expect("sync");
        fs::write(root.path().join("src/a.txt"), "hello!").unwrap();

        let report = check(root.path(), &Profile::default()).expect("check");
        assert_eq!(*state_of(&report, "src/a.txt"), SourceState::Modified);
    }

    #[test]
    fn deleted_artifact_is_reported_distinctly() {
        let root = setup_root();
        fs::write(root.path().join("src/a.txt"), "hello").unwrap();
        pipeline::run(root.path(), SyncOptions::default()).expect("sync");

        let artifact = fs::read_dir(root.path().join("dist"))
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        fs::remove_file(artifact).unwrap();

        let report = check(root.path(), &Profile::default()).expect("check");
        assert_eq!(*state_of(&report, "src/a.txt"), SourceState::ArtifactMissing);
    }

    #[test]
    fn vanished_source_and_stray_artifact_are_listed() {
        let root = setup_root();
        fs::write(root.path().join("src/a.txt"), "hello").unwrap();
        fs::write(root.path().join("src/b.txt"), "world").unwrap();
        pipeline::run(root.path(), SyncOptions::default()).expect("sync");

        fs::remove_file(root.path().join("src/b.txt")).unwrap();
        let stray = root.path().join("dist/stray.txt");
        fs::write(&stray, "x").unwrap();

        let report = check(root.path(), &Profile::default()).expect("check");
        assert_eq!(report.missing, vec!["src/b.txt".to_string()]);
        assert_eq!(report.orphans, vec![stray]);
        assert!(!report.is_clean());
    }

    #[test]
    fn age_buckets_are_compact() {
        assert_eq!(format_seconds(12), "12s");
        assert_eq!(format_seconds(65), "1m");
        assert_eq!(format_seconds(3 * 60 * 60 + 5), "3h");
        assert_eq!(format_seconds(49 * 60 * 60), "2d");
        assert_eq!(format_age(Utc::now()), "0s");
    }
}
