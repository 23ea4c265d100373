//! Error types for conveyor-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse profile at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `init` found an existing profile and `--force` was not given.
    #[error("profile already exists at {path}; pass --force to overwrite")]
    AlreadyInitialized { path: PathBuf },
}
