//! Ledger — persistent map from source path to last-synced content hash.
//!
//! Persists a `Ledger` JSON document at the profile's `ledger_path`
//! (default `<root>/.conveyor/ledger.json`). Writes use an atomic `.tmp` +
//! rename pattern. Loads are best-effort: a missing or unparsable ledger
//! yields an empty one, so a corrupt state file costs a full re-copy but
//! never blocks the run.

use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use conveyor_core::ArtifactName;

use crate::error::{io_err, SyncError};

/// One tracked source file: last-synced content hash and the artifact name
/// it produced. Recording the artifact name explicitly means the sweep never
/// has to re-derive hashes from file names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub hash: String,
    pub artifact: ArtifactName,
}

/// In-memory ledger: maps source path strings (relative to the root, e.g.
/// `src/app.js`) to their entries. `BTreeMap` keeps the serialized file
/// deterministically ordered and human-diffable.
pub type LedgerMap = BTreeMap<String, LedgerEntry>;

/// On-disk ledger payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    pub synced_at: DateTime<Utc>,
    pub files: LedgerMap,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LedgerCompat {
    Structured(LedgerStructuredCompat),
    Legacy(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize)]
struct LedgerStructuredCompat {
    pub synced_at: Option<DateTime<Utc>>,
    pub files: LedgerMap,
}

impl Ledger {
    /// A fresh, empty ledger stamped with the current time.
    pub fn empty() -> Self {
        Self {
            synced_at: Utc::now(),
            files: BTreeMap::new(),
        }
    }

    /// The set of artifact names currently recorded — the sweep's keep-set.
    pub fn current_artifacts(&self) -> BTreeSet<&str> {
        self.files.values().map(|e| e.artifact.as_ref()).collect()
    }
}

/// Load the ledger at `path`.
///
/// Returns an empty ledger when the file does not exist. Unreadable or
/// unparsable ledgers log a warning and also yield an empty ledger; every
/// source file then looks changed and gets re-copied, which is safe.
///
/// The legacy flat shape `{ "src/a.txt": "<hash>" }` still loads; artifact
/// names are recomposed from the source name and hash.
pub fn load_at(path: &Path) -> Ledger {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ledger::empty(),
        Err(err) => {
            tracing::warn!("cannot read ledger at {}: {err}; starting empty", path.display());
            return Ledger::empty();
        }
    };
    match serde_json::from_str::<LedgerCompat>(&contents) {
        Ok(LedgerCompat::Structured(ledger)) => Ledger {
            synced_at: ledger.synced_at.unwrap_or_else(Utc::now),
            files: ledger.files,
        },
        Ok(LedgerCompat::Legacy(flat)) => Ledger {
            synced_at: Utc::now(),
            files: flat
                .into_iter()
                .map(|(source, hash)| {
                    let artifact = ArtifactName::compose(source_file_name(&source), &hash);
                    (source, LedgerEntry { hash, artifact })
                })
                .collect(),
        },
        Err(err) => {
            tracing::warn!(
                "cannot parse ledger at {}: {err}; starting empty",
                path.display()
            );
            Ledger::empty()
        }
    }
}

/// Save the ledger to `path` atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`, creating the parent
/// directory first. Unlike loads, save failures are fatal to the run.
pub fn save_at(path: &Path, ledger: &Ledger) -> Result<(), SyncError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }

    let json = serde_json::to_string_pretty(ledger)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

fn source_file_name(source: &str) -> &str {
    Path::new(source)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(source)
}
