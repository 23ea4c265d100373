//! `conveyor status` — pending-change visibility without writes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use conveyor_core::profile;
use conveyor_sync::status::{check, format_age, SourceState, StatusReport};

use super::resolve_root;

/// Arguments for `conveyor status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Root directory containing conveyor.yaml (defaults to the current directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let root = resolve_root(self.root)?;
        let prof = profile::load_at(&root)
            .with_context(|| format!("failed to load profile at '{}'", root.display()))?;
        let report = check(&root, &prof)
            .with_context(|| format!("status check failed at '{}'", root.display()))?;

        let rows = build_rows(&report);
        if self.json {
            print_json(&report, &rows)?;
            return Ok(());
        }
        print_table(&report, rows);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct StatusRow {
    path: String,
    state: &'static str,
    note: String,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "path")]
    path: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "note")]
    note: String,
}

#[derive(Serialize)]
struct StatusJson {
    summary: StatusSummaryJson,
    entries: Vec<StatusEntryJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    sources: usize,
    pending: usize,
    last_synced: Option<String>,
}

#[derive(Serialize)]
struct StatusEntryJson {
    path: String,
    state: String,
    note: String,
}

fn build_rows(report: &StatusReport) -> Vec<StatusRow> {
    let mut rows = Vec::new();
    for source in &report.sources {
        let (state, note) = match source.state {
            SourceState::New => ("NEW", "will copy on next sync"),
            SourceState::Modified => ("MODIFIED", "will re-copy on next sync"),
            SourceState::ArtifactMissing => ("NO ARTIFACT", "artifact deleted from dist"),
            SourceState::Current => ("CURRENT", "up to date"),
        };
        rows.push(StatusRow {
            path: source.key.clone(),
            state,
            note: note.to_string(),
        });
    }
    for key in &report.missing {
        rows.push(StatusRow {
            path: key.clone(),
            state: "MISSING",
            note: "source deleted; artifact kept (sync --prune reclaims it)".to_string(),
        });
    }
    for path in &report.orphans {
        rows.push(StatusRow {
            path: path.display().to_string(),
            state: "ORPHAN",
            note: "untracked file in dist; next sync deletes it".to_string(),
        });
    }
    rows
}

fn pending_count(rows: &[StatusRow]) -> usize {
    rows.iter().filter(|r| r.state != "CURRENT").count()
}

fn print_json(report: &StatusReport, rows: &[StatusRow]) -> Result<()> {
    let payload = StatusJson {
        summary: StatusSummaryJson {
            sources: report.sources.len(),
            pending: pending_count(rows),
            last_synced: report.last_synced.map(|t| t.to_rfc3339()),
        },
        entries: rows
            .iter()
            .map(|row| StatusEntryJson {
                path: row.path.clone(),
                state: row.state.to_lowercase().replace(' ', "_"),
                note: row.note.clone(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(report: &StatusReport, rows: Vec<StatusRow>) {
    let last_sync = report
        .last_synced
        .map(format_age)
        .unwrap_or_else(|| "never".to_string());
    println!(
        "Conveyor v{} | {} sources | {} pending | last sync {}",
        env!("CARGO_PKG_VERSION"),
        report.sources.len(),
        pending_count(&rows),
        last_sync,
    );

    if rows.is_empty() {
        println!("No source files found.");
        return;
    }

    println!(
        "Indicators: {} CURRENT  {} NEW  {} MODIFIED  {} NO ARTIFACT  {} MISSING  {} ORPHAN",
        indicator("CURRENT"),
        indicator("NEW"),
        indicator("MODIFIED"),
        indicator("NO ARTIFACT"),
        indicator("MISSING"),
        indicator("ORPHAN"),
    );

    let table_rows: Vec<StatusTableRow> = rows
        .into_iter()
        .map(|row| StatusTableRow {
            path: row.path,
            state: format!("{} {}", indicator(row.state), row.state),
            note: row.note,
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if !report.is_clean() {
        println!("Run 'conveyor sync' to bring dist up to date.");
    }
}

fn indicator(state: &str) -> String {
    match state {
        "CURRENT" => "■".green().bold().to_string(),
        "NEW" => "■".cyan().bold().to_string(),
        "MODIFIED" => "■".red().bold().to_string(),
        "NO ARTIFACT" => "■".yellow().bold().to_string(),
        "MISSING" => "■".bright_black().bold().to_string(),
        "ORPHAN" => "■".magenta().bold().to_string(),
        _ => "■".normal().to_string(),
    }
}
