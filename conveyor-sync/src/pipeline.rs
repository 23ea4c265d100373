//! Shared sync pipeline entrypoint used by the CLI.
//!
//! Run order: ensure dist dir → load ledger → scan source dir → per-file
//! change detection and copy (ledger persisted after every mutation) →
//! optional prune of vanished sources → stale-artifact sweep.
//!
//! Only source-directory enumeration and ledger persistence can fail the
//! run. Every per-file failure is isolated, logged, recorded in the report,
//! and the batch continues.

use std::path::{Path, PathBuf};

use chrono::Utc;

use conveyor_core::{profile, Profile};

use crate::copier::{self, CopyOutcome};
use crate::error::{io_err, SyncError};
use crate::ledger;
use crate::sweep;

/// Behavior switches for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
    /// Drop ledger entries whose source file no longer exists, letting the
    /// sweep reclaim their artifacts.
    pub prune: bool,
}

/// A per-file failure that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub source: PathBuf,
    pub reason: String,
}

/// Outcome of one pipeline run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<CopyOutcome>,
    pub failures: Vec<SyncFailure>,
    pub swept: Vec<PathBuf>,
    pub pruned: Vec<String>,
}

/// Load the profile at `root` and run the pipeline.
pub fn run(root: &Path, opts: SyncOptions) -> Result<SyncReport, SyncError> {
    let profile = profile::load_at(root)?;
    run_with_profile(root, &profile, opts)
}

/// Run the pipeline with an already-loaded profile.
pub fn run_with_profile(
    root: &Path,
    profile: &Profile,
    opts: SyncOptions,
) -> Result<SyncReport, SyncError> {
    let run_started_at = Utc::now();
    let source_dir = profile.source_dir_at(root);
    let dist_dir = profile.dist_dir_at(root);
    let ledger_path = profile.ledger_path_at(root);

    if !opts.dry_run {
        std::fs::create_dir_all(&dist_dir).map_err(|e| io_err(&dist_dir, e))?;
    }

    let mut ledger = ledger::load_at(&ledger_path);
    ledger.synced_at = run_started_at;

    // Source enumeration failure is fatal to the run.
    let entries = std::fs::read_dir(&source_dir).map_err(|e| io_err(&source_dir, e))?;
    let mut sources: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    sources.sort_by_key(|e| e.file_name());

    let mut report = SyncReport::default();
    for entry in sources {
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            // Direct children only; never attempt to hash a directory.
            tracing::debug!("skipping directory in source: {}", path.display());
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let key = profile.source_dir.join(&name).to_string_lossy().into_owned();
        match copier::sync_file(&path, &key, &dist_dir, &mut ledger.files, opts.dry_run) {
            Ok(outcome) => {
                let mutated = matches!(outcome, CopyOutcome::Copied { .. });
                report.outcomes.push(outcome);
                if mutated {
                    ledger::save_at(&ledger_path, &ledger)?;
                }
            }
            Err(err) => {
                tracing::error!("skipping {}: {err}", path.display());
                report.failures.push(SyncFailure {
                    source: path,
                    reason: err.to_string(),
                });
            }
        }
    }

    let vanished: Vec<String> = ledger
        .files
        .keys()
        .filter(|key| !root.join(key.as_str()).exists())
        .cloned()
        .collect();
    if opts.prune && !vanished.is_empty() {
        for key in &vanished {
            ledger.files.remove(key);
            tracing::info!("pruned vanished source: {key}");
        }
        if !opts.dry_run {
            ledger::save_at(&ledger_path, &ledger)?;
        }
        report.pruned = vanished;
    }

    report.swept = sweep::sweep_at(&dist_dir, &ledger, opts.dry_run)?;
    Ok(report)
}
