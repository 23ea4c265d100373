//! Conveyor — hash-gated build-output synchronizer CLI.
//!
//! # Usage
//!
//! ```text
//! conveyor init [--root <dir>] [--force]
//! conveyor sync [--root <dir>] [--dry-run] [--prune]
//! conveyor status [--root <dir>] [--json]
//! conveyor diff [--root <dir>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, init::InitArgs, status::StatusArgs, sync::SyncArgs};

#[derive(Parser, Debug)]
#[command(
    name = "conveyor",
    version,
    about = "Copy changed build outputs into a hash-addressed dist directory",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default conveyor.yaml profile.
    Init(InitArgs),

    /// Copy changed source files to dist and sweep stale artifacts.
    Sync(SyncArgs),

    /// Show what sync would copy, prune, or sweep.
    Status(StatusArgs),

    /// Show unified diffs of pending source changes.
    Diff(DiffArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Sync(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
