//! `conveyor sync` — copy changed files to dist and sweep stale artifacts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use conveyor_sync::{pipeline, CopyOutcome, SyncOptions, SyncReport};

use super::resolve_root;

/// Arguments for `conveyor sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Root directory containing conveyor.yaml (defaults to the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Show what would be copied or deleted without touching the filesystem.
    #[arg(long)]
    pub dry_run: bool,

    /// Drop ledger entries for deleted source files and sweep their artifacts.
    #[arg(long)]
    pub prune: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let root = resolve_root(self.root)?;
        let report = pipeline::run(
            &root,
            SyncOptions {
                dry_run: self.dry_run,
                prune: self.prune,
            },
        )
        .with_context(|| format!("sync failed at '{}'", root.display()))?;

        print_report(&report, self.dry_run);
        Ok(())
    }
}

fn print_report(report: &SyncReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let copied = report
        .outcomes
        .iter()
        .filter(|o| matches!(o, CopyOutcome::Copied { .. } | CopyOutcome::WouldCopy { .. }))
        .count();
    let unchanged = report
        .outcomes
        .iter()
        .filter(|o| matches!(o, CopyOutcome::Unchanged { .. }))
        .count();

    if copied == 0
        && report.swept.is_empty()
        && report.failures.is_empty()
        && report.pruned.is_empty()
    {
        println!("{prefix}✓ nothing to do ({unchanged} unchanged)");
        return;
    }

    println!(
        "{prefix}✓ synced ({copied} copied, {unchanged} unchanged, {} swept, {} failed)",
        report.swept.len(),
        report.failures.len(),
    );

    for outcome in &report.outcomes {
        match outcome {
            CopyOutcome::Copied { source, artifact } => {
                println!("  ✎  {} -> {artifact}", source.display())
            }
            CopyOutcome::WouldCopy { source, artifact } => {
                println!("  ~  {} -> {artifact}", source.display())
            }
            CopyOutcome::Unchanged { source } => println!("  ·  {}", source.display()),
        }
    }
    for key in &report.pruned {
        println!("  ✂  {key} (source gone; ledger entry dropped)");
    }
    for path in &report.swept {
        println!("  −  {}", path.display());
    }
    for failure in &report.failures {
        eprintln!("  ✗  {}: {}", failure.source.display(), failure.reason);
    }
}
