//! Error types for conveyor-sync.

use std::path::PathBuf;

use thiserror::Error;

use conveyor_core::error::ProfileError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from profile loading.
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (ledger save path).
    #[error("ledger JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A source directory entry that is not a regular file was handed to the
    /// hasher.
    #[error("not a regular file: {path}")]
    NotRegularFile { path: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
