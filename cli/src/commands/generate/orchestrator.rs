//! # Generation Orchestrator
//!
//! File: cli/src/commands/generate/orchestrator.rs
//!
//! ## Overview
//!
//! Drives one generation run for a [`FamilyPlan`]:
//!
//! ```text
//! Loading -> Normalizing -> Generating -> Registering -> Done
//!    \___________\______________\______________\_______-> Failed
//! ```
//!
//! - **Loading**: read the CSV. Any error fails the run.
//! - **Normalizing**: build a `ScreenDescriptor` per row. Bad rows are
//!   recorded as failed and the batch continues.
//! - **Generating**: for every row not yet `created`, render all of its files
//!   into memory, then write them. A row whose templates fail to render writes
//!   nothing. Bulk files are rendered once over every row, and are left
//!   alone when any row could not be normalized.
//! - **Registering**: merge the routes of the rows generated in this run into
//!   the family's registry in a single call.
//! - **Done**: write `created = y` back to the CSV for the generated rows.
//!
//! Row-level failures never abort the run; they are logged with the row's
//! name and reported in the [`RunSummary`].
//!
use super::family::FamilyPlan;
use super::loader::{self, CsvTable};
use super::normalize::{normalize, Created, ScreenDescriptor};
use super::registry;
use crate::common::fs::io::{self, WriteMode};
use crate::core::error::{ErrorScope, GenError, Result};
use crate::core::templating::{RenderContext, Renderer};
use anyhow::{anyhow, Context};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Caller-controlled behaviour of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// How per-row files treat existing targets. Bulk files always overwrite.
    pub write_mode: WriteMode,
    /// Render everything but touch nothing on disk.
    pub dry_run: bool,
}

/// The state machine position of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Pending,
    Loading,
    Normalizing,
    Generating,
    Registering,
    Done,
    Failed,
}

/// A row that produced no files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub row: usize,
    /// `None` when the row failed before a name could be read.
    pub name: Option<String>,
    pub reason: String,
}

/// What a run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub dry_run: bool,
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<RowFailure>,
    /// Rows skipped because a target file already exists (`FailIfExists`).
    pub conflicts: Vec<RowFailure>,
    /// Per-row files written (or, in a dry run, that would be written).
    pub written: Vec<PathBuf>,
    pub bulk_written: Vec<PathBuf>,
    pub bulk_unchanged: Vec<PathBuf>,
    pub bulk_error: Option<String>,
    pub routes_registered: usize,
}

pub struct Orchestrator<'a> {
    plan: &'a FamilyPlan,
    options: RunOptions,
    renderer: Renderer,
    stage: RunStage,
}

impl<'a> Orchestrator<'a> {
    pub fn new(plan: &'a FamilyPlan, options: RunOptions) -> Self {
        Orchestrator {
            plan,
            options,
            renderer: Renderer::new(&plan.template_dir),
            stage: RunStage::Pending,
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    fn enter(&mut self, stage: RunStage) {
        debug!("{} run: {:?} -> {:?}", self.plan.family, self.stage, stage);
        self.stage = stage;
    }

    /// Executes the run. Only stage-level failures surface as `Err`.
    pub async fn run(&mut self) -> Result<RunSummary> {
        match self.run_stages().await {
            Ok(summary) => {
                self.enter(RunStage::Done);
                info!(
                    "{} run finished: {} created, {} skipped, {} conflict(s), {} failed",
                    self.plan.family,
                    summary.created.len(),
                    summary.skipped.len(),
                    summary.conflicts.len(),
                    summary.failed.len()
                );
                Ok(summary)
            }
            Err(e) => {
                self.enter(RunStage::Failed);
                error!("{} run failed: {:#}", self.plan.family, e);
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary {
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        self.enter(RunStage::Loading);
        let csv_file = self.plan.csv_file.clone();
        let table = loader::load(&csv_file)
            .await
            .with_context(|| format!("Failed to load screen list {}", csv_file.display()))?;

        self.enter(RunStage::Normalizing);
        let rows = self.normalize_rows(&table, &mut summary);
        let unreadable = table.rows.len() - rows.len();

        self.enter(RunStage::Generating);
        let mut generated: Vec<&ScreenDescriptor> = Vec::new();
        for row in &rows {
            if row.created == Created::Yes {
                info!("Screen already created, skipping: {}", row.name);
                summary.skipped.push(row.name.clone());
                continue;
            }
            info!("Creating: {} ({})", row.name, self.plan.family);
            match self.generate_row(row) {
                Ok(files) => {
                    summary.written.extend(files);
                    summary.created.push(row.name.clone());
                    generated.push(row);
                }
                Err(e) => {
                    if GenError::find(&e).map(GenError::scope) == Some(ErrorScope::Run) {
                        return Err(e);
                    }
                    record_row_failure(row, &e, &mut summary);
                }
            }
        }
        self.generate_bulk(&rows, unreadable, &mut summary);

        self.enter(RunStage::Registering);
        self.register(&generated, &mut summary)?;

        if !self.options.dry_run && !generated.is_empty() {
            let numbers: Vec<usize> = generated.iter().map(|row| row.row).collect();
            loader::mark_created(&csv_file, &table, &numbers).await?;
        }
        Ok(summary)
    }

    fn normalize_rows(&self, table: &CsvTable, summary: &mut RunSummary) -> Vec<ScreenDescriptor> {
        let mut rows = Vec::with_capacity(table.rows.len());
        for raw in &table.rows {
            match normalize(raw, self.plan.family) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    let name = raw.get("name").or_else(|| raw.get("screen"));
                    error!(
                        "Skipping row {} ({}): {:#}",
                        raw.number,
                        name.unwrap_or("<unnamed>"),
                        e
                    );
                    summary.failed.push(RowFailure {
                        row: raw.number,
                        name: name.map(str::to_string),
                        reason: format!("{:#}", e),
                    });
                }
            }
        }
        debug!("{} of {} row(s) normalized", rows.len(), table.rows.len());
        rows
    }

    /// Renders every file of `row`, then writes them. Returns the written paths.
    fn generate_row(&mut self, row: &ScreenDescriptor) -> Result<Vec<PathBuf>> {
        let context = RenderContext::Row(row.to_context());
        let mut staged = Vec::new();
        for artifact in self.plan.row_artifacts(row) {
            let content = self
                .renderer
                .render(&artifact.template_id, &context, &self.plan.delimiters)
                .with_context(|| format!("Failed to render {} for '{}'", artifact.label, row.name))?;
            staged.push((artifact.target, content));
        }

        if self.options.write_mode == WriteMode::FailIfExists {
            if let Some((path, _)) = staged.iter().find(|(path, _)| path.exists()) {
                return Err(anyhow!(GenError::Conflict { path: path.clone() }));
            }
        }

        if self.options.dry_run {
            for (path, _) in &staged {
                info!("[dry run] would write {}", path.display());
            }
        } else {
            // Files already written stay on disk if a later write fails.
            for (path, content) in &staged {
                if let Some(parent) = path.parent() {
                    io::ensure_dir(parent)?;
                }
                io::write_file(path, content, self.options.write_mode)?;
            }
        }
        Ok(staged.into_iter().map(|(path, _)| path).collect())
    }

    /// Renders the aggregate files over every row. They are left untouched when
    /// any row could not be normalized, since that row would drop out of them.
    fn generate_bulk(
        &mut self,
        rows: &[ScreenDescriptor],
        unreadable: usize,
        summary: &mut RunSummary,
    ) {
        let artifacts = self.plan.bulk_artifacts();
        if artifacts.is_empty() {
            return;
        }
        if unreadable > 0 {
            let message = format!(
                "{} row(s) could not be read; fix them before the aggregate files are regenerated",
                unreadable
            );
            error!("Aggregate files left unchanged: {}", message);
            summary.bulk_error = Some(message);
            return;
        }
        let context = RenderContext::Bulk(rows.iter().map(ScreenDescriptor::to_context).collect());

        let mut staged = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            match self
                .renderer
                .render(&artifact.template_id, &context, &self.plan.delimiters)
            {
                Ok(content) => staged.push((artifact.target, content)),
                Err(e) => {
                    error!("Failed to render bulk file {}: {:#}", artifact.label, e);
                    summary.bulk_error = Some(format!("{}: {:#}", artifact.label, e));
                    return;
                }
            }
        }

        for (path, content) in staged {
            if io::read_file_to_string(&path).ok().as_deref() == Some(content.as_str()) {
                debug!("Bulk file unchanged: {}", path.display());
                summary.bulk_unchanged.push(path);
                continue;
            }
            if self.options.dry_run {
                info!("[dry run] would write {}", path.display());
                summary.bulk_written.push(path);
                continue;
            }
            let written = path
                .parent()
                .map_or(Ok(false), io::ensure_dir)
                .and_then(|_| io::write_file(&path, &content, WriteMode::Overwrite));
            match written {
                Ok(()) => summary.bulk_written.push(path),
                Err(e) => {
                    error!("Failed to write bulk file {}: {:#}", path.display(), e);
                    summary.bulk_error = Some(format!("{}: {:#}", path.display(), e));
                }
            }
        }
    }

    fn register(&self, generated: &[&ScreenDescriptor], summary: &mut RunSummary) -> Result<()> {
        let Some(registry_file) = self.plan.registry_file() else {
            return Ok(());
        };
        let entries: BTreeMap<String, String> = generated
            .iter()
            .filter(|row| !row.route.is_empty())
            .map(|row| (row.name.clone(), row.route.clone()))
            .collect();
        if entries.is_empty() {
            info!("No new routes added to {}", registry_file.display());
            return Ok(());
        }
        if self.options.dry_run {
            info!(
                "[dry run] would merge {} route(s) into {}",
                entries.len(),
                registry_file.display()
            );
        } else {
            registry::merge_routes(registry_file, &entries)?;
        }
        summary.routes_registered = entries.len();
        Ok(())
    }
}

/// Files a row error under conflicts (warn) or failures (error).
fn record_row_failure(row: &ScreenDescriptor, err: &anyhow::Error, summary: &mut RunSummary) {
    let failure = RowFailure {
        row: row.row,
        name: Some(row.name.clone()),
        reason: format!("{:#}", err),
    };
    if matches!(GenError::find(err), Some(GenError::Conflict { .. })) {
        warn!("{}: skipped, {:#}", row.name, err);
        summary.conflicts.push(failure);
    } else {
        error!("{}: generation failed: {:#}", row.name, err);
        summary.failed.push(failure);
    }
}
