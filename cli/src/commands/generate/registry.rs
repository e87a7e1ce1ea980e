//! # Route Registry
//!
//! File: cli/src/commands/generate/registry.rs
//!
//! ## Overview
//!
//! The route registry is a JSON object mapping screen names to routes, read
//! by the frontend router. [`merge_routes`] adds new entries to it in one
//! read-modify-write pass: existing keys are kept in their original order,
//! incoming entries win on collision, and the result is written back with
//! 2-space indentation. The file is replaced atomically, so a failed write
//! leaves the previous registry intact.
//!
//! There is no file lock. Two runs merging into the same registry at the same
//! time can lose each other's entries; the orchestrator therefore merges once
//! per run, after every row has been generated.
//!
use crate::common::fs::io;
use crate::core::error::{GenError, Result};
use anyhow::{anyhow, Context};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Merges `new_entries` into the registry at `registry_path`, creating the
/// file (and its directory) when it does not exist yet. Existing keys keep
/// their position; new keys are appended.
pub fn merge_routes(registry_path: &Path, new_entries: &BTreeMap<String, String>) -> Result<()> {
    let mut merged = if registry_path.exists() {
        let content = io::read_file_to_string(registry_path)?;
        parse_registry(registry_path, &content)?
    } else {
        if let Some(parent) = registry_path.parent() {
            io::ensure_dir(parent)?;
        }
        debug!("Starting new route registry {}", registry_path.display());
        Map::new()
    };
    let before = merged.len();
    for (name, route) in new_entries {
        merged.insert(name.clone(), Value::String(route.clone()));
    }

    let after = merged.len();
    let pretty = serde_json::to_string_pretty(&Value::Object(merged))
        .context("Failed to serialize route registry")?;
    io::replace_file(registry_path, &pretty)
        .with_context(|| format!("Failed to write route registry {}", registry_path.display()))?;
    info!(
        "Route registry {} updated: {} entr(ies) merged, {} -> {} key(s)",
        registry_path.display(),
        new_entries.len(),
        before,
        after
    );
    Ok(())
}

fn parse_registry(registry_path: &Path, content: &str) -> Result<Map<String, Value>> {
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(anyhow!(GenError::Registry(format!(
            "'{}' does not contain a JSON object",
            registry_path.display()
        )))),
        Err(e) => Err(anyhow!(GenError::Registry(format!(
            "'{}' is not valid JSON: {}",
            registry_path.display(),
            e
        )))),
    }
}
