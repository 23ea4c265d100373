//! Change detection and artifact copy for a single source file.
//!
//! ## Per-file protocol
//!
//! 1. SHA-256 hash the source file's bytes.
//! 2. Compare with the ledger entry → skip if identical.
//! 3. Delete the previously recorded artifact, if any.
//! 4. Copy the bytes to `<dist>/<stem>-<hash><ext>`.
//! 5. Update the ledger entry (the caller persists the ledger).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use conveyor_core::ArtifactName;

use crate::error::{io_err, SyncError};
use crate::hasher;
use crate::ledger::{LedgerEntry, LedgerMap};

/// Outcome of processing an individual source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// A new artifact was written (content changed or file is new).
    Copied {
        source: PathBuf,
        artifact: ArtifactName,
    },
    /// File was skipped — content hash matches the ledger.
    Unchanged { source: PathBuf },
    /// `--dry-run` mode: the artifact *would* have been written.
    WouldCopy {
        source: PathBuf,
        artifact: ArtifactName,
    },
}

/// Hash `source`, and copy it into `dist_dir` if its content no longer
/// matches the ledger entry under `key`.
///
/// The ledger map is updated in memory only after a successful copy; a copy
/// failure leaves the entry untouched so the file is retried next run. The
/// caller is responsible for persisting the ledger after a mutation.
pub(crate) fn sync_file(
    source: &Path,
    key: &str,
    dist_dir: &Path,
    ledger: &mut LedgerMap,
    dry_run: bool,
) -> Result<CopyOutcome, SyncError> {
    let digest = hasher::hash_file(source)?;

    if let Some(entry) = ledger.get(key) {
        if entry.hash == digest {
            tracing::debug!("unchanged: {}", source.display());
            return Ok(CopyOutcome::Unchanged {
                source: source.to_path_buf(),
            });
        }
    }

    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| key.to_owned());
    let artifact = ArtifactName::compose(&file_name, &digest);

    if dry_run {
        tracing::info!("[dry-run] would copy: {} -> {}", source.display(), artifact);
        return Ok(CopyOutcome::WouldCopy {
            source: source.to_path_buf(),
            artifact,
        });
    }

    // Delete-before-copy: at most one artifact per source may exist.
    if let Some(previous) = ledger.get(key) {
        let stale = dist_dir.join(previous.artifact.as_ref());
        match std::fs::remove_file(&stale) {
            Ok(()) => tracing::info!("removed stale artifact: {}", stale.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!("cannot remove stale artifact {}: {err}", stale.display());
            }
        }
    }

    let target = dist_dir.join(artifact.as_ref());
    std::fs::copy(source, &target).map_err(|e| io_err(&target, e))?;

    ledger.insert(
        key.to_owned(),
        LedgerEntry {
            hash: digest,
            artifact: artifact.clone(),
        },
    );

    tracing::info!("copied: {} -> {}", source.display(), target.display());
    Ok(CopyOutcome::Copied {
        source: source.to_path_buf(),
        artifact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dist = tmp.path().join("dist");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dist).unwrap();
        (tmp, src, dist)
    }

    #[test]
    fn first_copy_writes_hash_suffixed_artifact() {
        let (_tmp, src, dist) = setup();
        let source = src.join("app.js");
        std::fs::write(&source, b"console.log(1)").unwrap();
        let mut ledger = BTreeMap::new();

        let outcome = sync_file(&source, "src/app.js", &dist, &mut ledger, false).unwrap();
        let CopyOutcome::Copied { artifact, .. } = outcome else {
            panic!("expected Copied");
        };
        assert!(dist.join(artifact.as_ref()).exists());
        assert_eq!(ledger.get("src/app.js").unwrap().artifact, artifact);
        assert!(artifact.as_ref().starts_with("app-"));
        assert!(artifact.as_ref().ends_with(".js"));
    }

    #[test]
    fn same_content_is_unchanged_and_touches_nothing() {
        let (_tmp, src, dist) = setup();
        let source = src.join("app.js");
        std::fs::write(&source, b"v1").unwrap();
        let mut ledger = BTreeMap::new();

        sync_file(&source, "src/app.js", &dist, &mut ledger, false).unwrap();
        let before = ledger.clone();
        let outcome = sync_file(&source, "src/app.js", &dist, &mut ledger, false).unwrap();
        assert!(matches!(outcome, CopyOutcome::Unchanged { .. }));
        assert_eq!(ledger, before);
        assert_eq!(std::fs::read_dir(&dist).unwrap().count(), 1);
    }

    #[test]
    fn changed_content_replaces_previous_artifact() {
        let (_tmp, src, dist) = setup();
        let source = src.join("app.js");
        std::fs::write(&source, b"v1").unwrap();
        let mut ledger = BTreeMap::new();

        let first = sync_file(&source, "src/app.js", &dist, &mut ledger, false).unwrap();
        let CopyOutcome::Copied { artifact: old, .. } = first else {
            panic!("expected Copied");
        };

        std::fs::write(&source, b"v2").unwrap();
        let second = sync_file(&source, "src/app.js", &dist, &mut ledger, false).unwrap();
        let CopyOutcome::Copied { artifact: new, .. } = second else {
            panic!("expected Copied");
        };

        assert_ne!(old, new);
        assert!(!dist.join(old.as_ref()).exists(), "old artifact must be deleted");
        assert!(dist.join(new.as_ref()).exists());
        assert_eq!(std::fs::read_dir(&dist).unwrap().count(), 1);
    }

    #[test]
    fn dry_run_writes_nothing_and_keeps_ledger() {
        let (_tmp, src, dist) = setup();
        let source = src.join("app.js");
        std::fs::write(&source, b"v1").unwrap();
        let mut ledger = BTreeMap::new();

        let outcome = sync_file(&source, "src/app.js", &dist, &mut ledger, true).unwrap();
        assert!(matches!(outcome, CopyOutcome::WouldCopy { .. }));
        assert!(ledger.is_empty(), "dry-run must not record entries");
        assert_eq!(std::fs::read_dir(&dist).unwrap().count(), 0);
    }

    #[test]
    fn copy_failure_leaves_ledger_untouched() {
        let (_tmp, src, dist) = setup();
        std::fs::remove_dir(&dist).unwrap();
        let source = src.join("app.js");
        std::fs::write(&source, b"v1").unwrap();
        let mut ledger = BTreeMap::new();

        let err = sync_file(&source, "src/app.js", &dist, &mut ledger, false)
            .expect_err("copy into missing dist dir must fail");
        assert!(matches!(err, SyncError::Io { .. }));
        assert!(ledger.is_empty(), "failed copy must not update the ledger");
    }

    #[test]
    fn hyphenated_source_names_stay_parseable() {
        let (_tmp, src, dist) = setup();
        let source = src.join("my-lib-v2.min.js");
        std::fs::write(&source, b"lib").unwrap();
        let mut ledger = BTreeMap::new();

        let outcome = sync_file(&source, "src/my-lib-v2.min.js", &dist, &mut ledger, false).unwrap();
        let CopyOutcome::Copied { artifact, .. } = outcome else {
            panic!("expected Copied");
        };
        let parsed = ArtifactName::parse(artifact.as_ref()).expect("well-formed artifact");
        assert_eq!(parsed.stem, "my-lib-v2.min");
    }
}
