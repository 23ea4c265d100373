//! `conveyor init [--root <dir>] [--force]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use conveyor_core::profile;

use super::resolve_root;

/// Write a default conveyor.yaml profile.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Root directory for the profile (defaults to the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Overwrite an existing profile.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let root = resolve_root(self.root)?;
        let written = profile::init_at(&root, self.force)
            .with_context(|| format!("failed to init profile at '{}'", root.display()))?;

        println!("✓ Wrote {}", profile::profile_path_at(&root).display());
        println!(
            "  source: {}  dist: {}  ledger: {}",
            written.source_dir.display(),
            written.dist_dir.display(),
            written.ledger_path.display()
        );
        Ok(())
    }
}
