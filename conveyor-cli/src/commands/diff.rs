//! `conveyor diff` — show unified diffs of pending source changes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use conveyor_core::profile;
use conveyor_sync::diff::diff_root;

use super::resolve_root;

/// Arguments for `conveyor diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Root directory containing conveyor.yaml (defaults to the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let root = resolve_root(self.root)?;
        let prof = profile::load_at(&root)
            .with_context(|| format!("failed to load profile at '{}'", root.display()))?;

        let diffs = diff_root(&root, &prof)
            .with_context(|| format!("diff failed at '{}'", root.display()))?;

        if diffs.is_empty() {
            println!("No pending changes.");
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
