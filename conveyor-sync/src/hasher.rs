//! Content hashing for change detection.
//!
//! SHA-256 over the file's raw bytes, with no text normalization. The
//! digest is used purely for change detection, not security.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

/// Hash the full byte content of the regular file at `path`.
///
/// Identical bytes always produce identical digests. Non-regular files
/// (directories, sockets, dangling symlinks) are refused with
/// [`SyncError::NotRegularFile`] rather than read.
pub fn hash_file(path: &Path) -> Result<String, SyncError> {
    let meta = std::fs::metadata(path).map_err(|e| io_err(path, e))?;
    if !meta.is_file() {
        return Err(SyncError::NotRegularFile {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
