//! Unified diff support for `conveyor diff`.
//!
//! Compares each changed source file (new side) against the content of its
//! last-synced artifact (old side). No files are written.

use std::io::ErrorKind;
use std::path::Path;

use similar::TextDiff;

use conveyor_core::Profile;

use crate::error::{io_err, SyncError};
use crate::hasher;
use crate::ledger;

/// A single pending-change diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Ledger key, e.g. `src/app.js`.
    pub key: String,
    pub unified_diff: String,
}

/// Diff every source file whose content no longer matches the ledger.
///
/// New files diff against empty. Non-UTF-8 content on either side yields a
/// binary placeholder instead of a text diff.
pub fn diff_root(root: &Path, profile: &Profile) -> Result<Vec<FileDiff>, SyncError> {
    let source_dir = profile.source_dir_at(root);
    let dist_dir = profile.dist_dir_at(root);
    let ledger = ledger::load_at(&profile.ledger_path_at(root));

    let entries = std::fs::read_dir(&source_dir).map_err(|e| io_err(&source_dir, e))?;
    let mut source_entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    source_entries.sort_by_key(|e| e.file_name());

    let mut diffs = Vec::new();
    for entry in source_entries {
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = profile.source_dir.join(&name).to_string_lossy().into_owned();
        let path = entry.path();

        let recorded = ledger.files.get(&key);
        let current = hasher::hash_file(&path)?;
        if recorded.map(|e| e.hash.as_str()) == Some(current.as_str()) {
            continue;
        }

        let old_bytes = match recorded {
            Some(entry) => read_or_empty(&dist_dir.join(entry.artifact.as_ref()))?,
            None => Vec::new(),
        };
        let new_bytes = std::fs::read(&path).map_err(|e| io_err(&path, e))?;

        let old_header = format!("a/{key}");
        let new_header = format!("b/{key}");
        let unified = match (String::from_utf8(old_bytes), String::from_utf8(new_bytes)) {
            (Ok(old), Ok(new)) => TextDiff::from_lines(&old, &new)
                .unified_diff()
                .header(&old_header, &new_header)
                .context_radius(3)
                .to_string(),
            _ => format!("Binary files {old_header} and {new_header} differ\n"),
        };

        diffs.push(FileDiff {
            key,
            unified_diff: unified,
        });
    }

    Ok(diffs)
}

fn read_or_empty(path: &Path) -> Result<Vec<u8>, SyncError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(io_err(path, err)),
    }
}
