//! # Screengen Generate Command
//!
//! File: cli/src/commands/generate/mod.rs
//!
//! ## Overview
//!
//! `screengen generate <family>` reads the family's screen list CSV and writes
//! one set of source files per row that has not been generated yet, followed
//! by the family's aggregate files and route registry. Each generated row is
//! then marked `created = y` in the CSV so that re-running the command only
//! picks up new rows.
//!
//! ## Architecture
//!
//! - `loader`: CSV in, CSV (with markers) out
//! - `normalize`: raw row to `ScreenDescriptor`
//! - `family`: which files a row produces for each target family
//! - `registry`: JSON route registry merge
//! - `orchestrator`: the per-run state machine tying them together
//!
//! ## Examples
//!
//! ```bash
//! screengen generate vue
//! screengen -v generate mock --csv MOCK_ENDPOINTS.csv
//! screengen generate vb --write-mode overwrite --dry-run
//! ```
//!
//! Rows that fail are reported and skipped; the command still exits
//! successfully. Configuration, CSV and registry problems fail the command.
//!
use crate::common::fs::io::WriteMode;
use crate::core::{config, error::Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod family;
pub mod loader;
pub mod normalize;
pub mod orchestrator;
pub mod registry;

use family::{FamilyPlan, TargetFamily};
use orchestrator::{Orchestrator, RowFailure, RunOptions, RunSummary};

/// Arguments for `screengen generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Target family to generate (vb, vue, mock).
    #[arg(value_enum)]
    family: TargetFamily,

    /// Configuration file. Disables the project/user file lookup.
    #[arg(short, long, env = "SCREENGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Screen list to read instead of the configured `csv_file`.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// How existing per-row files are treated.
    #[arg(long, value_enum, default_value_t = WriteMode::FailIfExists)]
    write_mode: WriteMode,

    /// Render everything and report what would be written, without writing.
    #[arg(long)]
    dry_run: bool,
}

/// Runs one generation pass for the requested family.
pub async fn handle_generate(args: GenerateArgs) -> Result<()> {
    let cfg = config::load_config(args.config.as_deref())?;
    let mut plan = FamilyPlan::from_config(args.family, &cfg)?;
    if let Some(csv) = args.csv {
        debug!("Overriding configured CSV file with {}", csv.display());
        plan.csv_file = csv;
    }
    info!(
        "Generating {} files from {} using templates in {}",
        plan.family,
        plan.csv_file.display(),
        plan.template_dir.display()
    );

    let options = RunOptions {
        write_mode: args.write_mode,
        dry_run: args.dry_run,
    };
    let summary = Orchestrator::new(&plan, options).run().await?;

    let cwd = std::env::current_dir().unwrap_or_default();
    print_summary(&plan, &summary, &cwd);
    Ok(())
}

fn display_path(path: &Path, cwd: &Path) -> String {
    pathdiff::diff_paths(path, cwd)
        .filter(|rel| !rel.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

fn print_row_table(title: &str, rows: &[RowFailure]) {
    if rows.is_empty() {
        return;
    }
    println!("\n{}", title);
    let width = rows
        .iter()
        .map(|f| f.name.as_deref().unwrap_or("<unnamed>").len())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    println!("{:>5} | {:<width$} | Reason", "Row", "Name", width = width);
    println!("{:->5}-+-{:-<width$}-+-{:-<40}", "", "", "", width = width);
    for failure in rows {
        println!(
            "{:>5} | {:<width$} | {}",
            failure.row,
            failure.name.as_deref().unwrap_or("<unnamed>"),
            failure.reason,
            width = width
        );
    }
}

fn print_summary(plan: &FamilyPlan, summary: &RunSummary, cwd: &Path) {
    let verb = if summary.dry_run { "Would write" } else { "Wrote" };

    if !summary.written.is_empty() || !summary.bulk_written.is_empty() {
        println!("\n{} ({}):", verb, plan.family);
        for path in summary.written.iter().chain(&summary.bulk_written) {
            println!("  {}", display_path(path, cwd));
        }
    }

    print_row_table("Skipped rows (existing files):", &summary.conflicts);
    print_row_table("Failed rows:", &summary.failed);

    if let Some(err) = &summary.bulk_error {
        println!("\nAggregate files not updated: {}", err);
    }
    if let Some(registry) = plan.registry_file() {
        if summary.routes_registered > 0 {
            println!(
                "\n{} route(s) {} {}",
                summary.routes_registered,
                if summary.dry_run { "would be added to" } else { "added to" },
                display_path(registry, cwd)
            );
        }
    }

    println!(
        "\n{}: {} created, {} already created, {} conflict(s) skipped, {} failed, {} aggregate file(s) unchanged.",
        plan.family,
        summary.created.len(),
        summary.skipped.len(),
        summary.conflicts.len(),
        summary.failed.len(),
        summary.bulk_unchanged.len()
    );
    if summary.dry_run {
        println!("Dry run: no files were changed.");
    }
}
