//! # CSV Loader
//!
//! File: cli/src/commands/generate/loader.rs
//!
//! ## Overview
//!
//! Reads the screen list CSV into a [`CsvTable`]: the header row plus one
//! [`RawRow`] per record, in file order. Also rewrites the file at the end of a
//! run with the `created` column set for the rows that were generated. The
//! rewrite is atomic and keeps every other cell, including duplicate columns.
//!
//! The `csv` reader is synchronous, so loading runs on tokio's blocking pool
//! and streams record by record.
//!
use crate::common::fs::io;
use crate::core::error::{GenError, Result};
use anyhow::{anyhow, Context};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the idempotency marker column.
pub const CREATED_COLUMN: &str = "created";

/// One CSV record: `(header, value)` pairs in column order.
///
/// Columns stay positional so a header that appears twice keeps both values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based position among the data rows (the header is not counted).
    pub number: usize,
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(number: usize, fields: Vec<(String, String)>) -> Self {
        RawRow { number, fields }
    }

    /// The trimmed value of the first column named `column`, or `None` when
    /// the column is absent or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(header, _)| header == column)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The untouched value at column `index`, used when writing the file back.
    fn raw_at(&self, index: usize) -> &str {
        self.fields.get(index).map(|(_, v)| v.as_str()).unwrap_or("")
    }
}

/// A loaded CSV file.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Loads `path` without blocking the async runtime.
pub async fn load(path: &Path) -> Result<CsvTable> {
    let owned: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || load_blocking(&owned))
        .await
        .context("CSV loader task panicked")?
}

/// Reads every record of `path`. Column counts are enforced by the parser.
pub fn load_blocking(path: &Path) -> Result<CsvTable> {
    let file = File::open(path)
        .map_err(|e| GenError::io(path, e))
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| anyhow!(GenError::Parse { source: e }))
        .with_context(|| format!("Failed to read CSV header of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| anyhow!(GenError::Parse { source: e }))
            .with_context(|| format!("Malformed record {} in {}", idx + 1, path.display()))?;
        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(RawRow::new(idx + 1, fields));
    }
    info!("Loaded {} row(s) from {}", rows.len(), path.display());
    Ok(CsvTable { headers, rows })
}

/// Rewrites `path` from `table`, setting `created = y` on the rows whose
/// numbers are listed. Every other value is written back unchanged; the
/// column is appended when the file does not have one.
pub async fn mark_created(path: &Path, table: &CsvTable, created_rows: &[usize]) -> Result<()> {
    let content = render_with_created(table, created_rows)?;
    io::replace_file(path, &content)
        .with_context(|| format!("Failed to update created markers in {}", path.display()))?;
    info!(
        "Marked {} row(s) as created in {}",
        created_rows.len(),
        path.display()
    );
    Ok(())
}

fn render_with_created(table: &CsvTable, created_rows: &[usize]) -> Result<String> {
    let mut headers = table.headers.clone();
    // The first `created` column is the marker; any later duplicate is data.
    let created_index = match headers.iter().position(|h| h == CREATED_COLUMN) {
        Some(index) => index,
        None => {
            debug!("Adding missing '{}' column", CREATED_COLUMN);
            headers.push(CREATED_COLUMN.to_string());
            headers.len() - 1
        }
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&headers)
        .map_err(|e| anyhow!(GenError::Parse { source: e }))?;
    for row in &table.rows {
        let marked = created_rows.contains(&row.number);
        let record: Vec<&str> = (0..headers.len())
            .map(|index| {
                if index != created_index {
                    row.raw_at(index)
                } else if marked {
                    "y"
                } else if row.get(CREATED_COLUMN).is_some() {
                    row.raw_at(index)
                } else {
                    "n"
                }
            })
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| anyhow!(GenError::Parse { source: e }))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV buffer: {}", e))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}
