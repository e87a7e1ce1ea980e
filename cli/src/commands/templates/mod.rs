//! # Screengen Templates Command
//!
//! File: cli/src/commands/templates/mod.rs
//!
//! ## Overview
//!
//! `screengen templates [family]` lists the templates found under the
//! configured template directory, grouped by family sub-directory. The listed
//! id is what the configuration's `*_template` options refer to.
//!
//! ```bash
//! screengen templates
//! screengen templates vue --config screengen.toml
//! ```
//!
use crate::commands::generate::family::TargetFamily;
use crate::core::config;
use crate::core::error::{GenError, Result};
use crate::core::templating::TEMPLATE_EXTENSION;
use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Arguments for `screengen templates`.
#[derive(Parser, Debug)]
pub struct TemplatesArgs {
    /// Only list this family's templates.
    #[arg(value_enum)]
    family: Option<TargetFamily>,

    /// Configuration file. Disables the project/user file lookup.
    #[arg(short, long, env = "SCREENGEN_CONFIG")]
    config: Option<PathBuf>,
}

/// One template file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TemplateEntry {
    family: TargetFamily,
    id: String,
    lines: usize,
}

pub async fn handle_templates(args: TemplatesArgs) -> Result<()> {
    let cfg = config::load_config(args.config.as_deref())?;
    let template_dir = PathBuf::from(config::require(&cfg.template_dir, "template_dir")?);
    if !template_dir.is_dir() {
        return Err(anyhow!(GenError::Config(format!(
            "template directory '{}' does not exist",
            template_dir.display()
        ))));
    }

    let families = match args.family {
        Some(family) => vec![family],
        None => vec![TargetFamily::Vb, TargetFamily::Vue, TargetFamily::MockApi],
    };
    let mut entries = Vec::new();
    for family in families {
        entries.extend(find_templates(&template_dir, family)?);
    }
    print_template_table(&entries, &template_dir);
    Ok(())
}

/// Collects the `.tmpl` files below `<template_dir>/<family subdir>`, sorted by id.
fn find_templates(template_dir: &Path, family: TargetFamily) -> Result<Vec<TemplateEntry>> {
    let family_dir = template_dir.join(family.template_subdir());
    if !family_dir.is_dir() {
        debug!("No template directory for {}: {}", family, family_dir.display());
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(&family_dir).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to walk template directory {}", family_dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
        {
            continue;
        }
        let Ok(relative) = path.strip_prefix(template_dir) else {
            continue;
        };
        let id = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let lines = std::fs::read_to_string(path)
            .map_err(|e| GenError::io(path, e))?
            .lines()
            .count();
        entries.push(TemplateEntry { family, id, lines });
    }
    Ok(entries)
}

fn print_template_table(entries: &[TemplateEntry], template_dir: &Path) {
    if entries.is_empty() {
        println!("\nNo templates found in '{}'.", template_dir.display());
        println!("Templates live in vb/, vue/ and psx/ sub-directories and end in .{}.", TEMPLATE_EXTENSION);
        return;
    }

    println!("\nTemplates in '{}':\n", template_dir.display());
    let id_width = entries
        .iter()
        .map(|e| e.id.len())
        .max()
        .unwrap_or(0)
        .max("Template".len());
    println!("{:<6} | {:<width$} | Lines", "Family", "Template", width = id_width);
    println!("{:-<6}-+-{:-<width$}-+-{:-<5}", "", "", "", width = id_width);
    for entry in entries {
        println!(
            "{:<6} | {:<width$} | {}",
            entry.family.to_string(),
            entry.id,
            entry.lines,
            width = id_width
        );
    }
    println!("\nFound {} template(s).", entries.len());
}
