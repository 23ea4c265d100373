//! Stale-artifact sweep over the distribution directory.
//!
//! Deletion is decided by set membership against the ledger's recorded
//! artifact names, never by parsing hashes back out of file names. A
//! malformed name is simply an orphan and cannot abort the pass.
//! [`ArtifactName::parse`] is used for log diagnostics only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use conveyor_core::ArtifactName;

use crate::error::{io_err, SyncError};
use crate::ledger::Ledger;

/// Delete every entry of `dist_dir` not named by a current ledger entry.
///
/// Skipped entirely when the ledger is empty, so a freshly initialized but
/// not-yet-populated destination is never emptied out. Subdirectories are
/// skipped. Per-entry deletion failures are logged and the sweep continues.
///
/// Returns the paths that were removed (or, in dry-run, would be removed).
pub fn sweep_at(dist_dir: &Path, ledger: &Ledger, dry_run: bool) -> Result<Vec<PathBuf>, SyncError> {
    if ledger.files.is_empty() {
        tracing::debug!("ledger is empty; skipping sweep");
        return Ok(Vec::new());
    }

    let entries = match std::fs::read_dir(dist_dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(io_err(dist_dir, err)),
    };

    let keep = ledger.current_artifacts();
    let mut candidates: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    candidates.sort_by_key(|e| e.file_name());

    let mut removed = Vec::new();
    for entry in candidates {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            tracing::debug!("skipping directory in dist: {}", entry.path().display());
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if keep.contains(name.as_str()) {
            continue;
        }

        let path = entry.path();
        match ArtifactName::parse(&name) {
            Some(parsed) => tracing::info!(
                "orphaned artifact (hash {} no longer current): {}",
                parsed.hash,
                path.display()
            ),
            None => tracing::info!("untracked file in dist: {}", path.display()),
        }

        if dry_run {
            removed.push(path);
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(err) => tracing::warn!("cannot delete {}: {err}", path.display()),
        }
    }
    Ok(removed)
}
