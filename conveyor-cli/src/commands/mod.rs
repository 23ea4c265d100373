//! Subcommand implementations.

pub mod diff;
pub mod init;
pub mod status;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolve the synchronizer root: `--root` when given, else the current
/// working directory.
pub(crate) fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(path) => path
            .canonicalize()
            .with_context(|| format!("cannot resolve root '{}'", path.display())),
        None => std::env::current_dir().context("could not determine current directory"),
    }
}
