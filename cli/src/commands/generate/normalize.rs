//! # Row Normalizer
//!
//! File: cli/src/commands/generate/normalize.rs
//!
//! ## Overview
//!
//! Turns a [`RawRow`] of strings into a typed [`ScreenDescriptor`]:
//! - `y`/`n` flags (any case, `yes`/`no` also accepted) become booleans
//! - the comma-delimited `args` column becomes a list
//! - `response_sample` / `request_sample` are validated as JSON; templates get
//!   the text exactly as written in the CSV plus the parsed value
//! - missing optional columns get their defaults
//!
//! A row that cannot be normalized yields `GenError::Data`; the caller skips
//! that row and keeps going.
//!
use super::family::TargetFamily;
use super::loader::RawRow;
use crate::core::error::{GenError, Result};
use anyhow::anyhow;
use serde_json::{json, Map, Value};
use std::path::{Component, Path};

/// Value of `controller` meaning "use the family's default view template".
pub const NO_CONTROLLER: &str = "none";

/// Idempotency marker of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    Yes,
    No,
}

impl Created {
    pub fn as_flag(self) -> &'static str {
        match self {
            Created::Yes => "y",
            Created::No => "n",
        }
    }
}

/// A JSON column: the trimmed source text and its parsed value.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSample {
    /// Rendered verbatim so key order and number spelling survive.
    pub text: String,
    pub value: Value,
}

impl JsonSample {
    fn empty_object() -> Self {
        JsonSample {
            text: "{}".to_string(),
            value: Value::Object(Map::new()),
        }
    }
}

/// One normalized CSV row: a screen (or mock endpoint) to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenDescriptor {
    pub row: usize,
    pub name: String,
    pub directory: String,
    pub route: String,
    pub route_mock_sample: String,
    pub is_get: bool,
    pub has_req_body: bool,
    pub request_args: Vec<String>,
    pub response_sample: JsonSample,
    /// Only parsed when `has_req_body` is set.
    pub request_sample: Option<JsonSample>,
    pub created: Created,
    pub controller: String,
    pub chunk: String,
    pub method: String,
    pub description: String,
    pub parent: String,
}

impl ScreenDescriptor {
    /// Builds the mapping a per-row template renders against. JSON samples
    /// appear twice: the CSV text under `*_sample`, structured under
    /// `response` / `request`.
    pub fn to_context(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".into(), json!(self.name));
        map.insert("screen".into(), json!(self.name));
        map.insert("directory".into(), json!(self.directory));
        map.insert("route".into(), json!(self.route));
        map.insert("route_mock_sample".into(), json!(self.route_mock_sample));
        map.insert("is_get".into(), json!(self.is_get));
        map.insert("has_req_body".into(), json!(self.has_req_body));
        map.insert("request_args".into(), json!(self.request_args));
        map.insert("args".into(), json!(self.request_args.join(",")));
        map.insert("response_sample".into(), json!(self.response_sample.text));
        map.insert("response".into(), self.response_sample.value.clone());
        match &self.request_sample {
            Some(sample) => {
                map.insert("request_sample".into(), json!(sample.text));
                map.insert("request".into(), sample.value.clone());
            }
            None => {
                map.insert("request_sample".into(), json!(""));
            }
        }
        map.insert("created".into(), json!(self.created.as_flag()));
        map.insert("controller".into(), json!(self.controller));
        map.insert("chunk".into(), json!(self.chunk));
        map.insert("method".into(), json!(self.method));
        map.insert("description".into(), json!(self.description));
        map.insert("parent".into(), json!(self.parent));
        Value::Object(map)
    }
}

fn data_error(row: &RawRow, message: String) -> anyhow::Error {
    anyhow!(GenError::Data {
        row: row.number,
        message,
    })
}

/// Normalizes one raw row for `family`.
pub fn normalize(row: &RawRow, family: TargetFamily) -> Result<ScreenDescriptor> {
    let name = row
        .get("name")
        .or_else(|| row.get("screen"))
        .ok_or_else(|| data_error(row, "missing required column 'name' (or 'screen')".into()))?;
    check_file_name(row, name)?;

    let directory = match row.get("directory") {
        Some(dir) => {
            check_relative_dir(row, dir)?;
            dir.to_string()
        }
        None if family.requires_directory() => {
            return Err(data_error(
                row,
                format!("missing required column 'directory' for screen '{}'", name),
            ));
        }
        None => String::new(),
    };

    let is_get = flag(row, "isGet", true)?;
    let has_req_body = flag(row, "hasReqBody", false)?;
    let created = if flag(row, "created", false)? {
        Created::Yes
    } else {
        Created::No
    };

    let request_args = row
        .get("args")
        .map(|args| {
            args.split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let response_sample = json_column(row, "response_sample")?;
    let request_sample = if has_req_body {
        Some(json_column(row, "request_sample")?)
    } else {
        None
    };

    let controller = row.get("controller").unwrap_or(NO_CONTROLLER);
    check_controller(row, controller)?;

    let method = row
        .get("type")
        .map(str::to_uppercase)
        .unwrap_or_else(|| if is_get { "GET" } else { "POST" }.to_string());

    Ok(ScreenDescriptor {
        row: row.number,
        name: name.to_string(),
        directory,
        route: text(row, "route"),
        route_mock_sample: text(row, "route_mock_sample"),
        is_get,
        has_req_body,
        request_args,
        response_sample,
        request_sample,
        created,
        controller: controller.to_string(),
        chunk: text(row, "chunk"),
        method,
        description: text(row, "description"),
        parent: text(row, "parent"),
    })
}

fn text(row: &RawRow, column: &str) -> String {
    row.get(column).unwrap_or_default().to_string()
}

/// Parses a `y`/`n` column; blank means `default`.
fn flag(row: &RawRow, column: &str, default: bool) -> Result<bool> {
    match row.get(column).map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("y" | "yes") => Ok(true),
        Some("n" | "no") => Ok(false),
        Some(other) => Err(data_error(
            row,
            format!("column '{}' must be 'y' or 'n', got '{}'", column, other),
        )),
    }
}

/// Parses a JSON column; blank means `{}`.
fn json_column(row: &RawRow, column: &str) -> Result<JsonSample> {
    match row.get(column) {
        None => Ok(JsonSample::empty_object()),
        Some(raw) => {
            let value = serde_json::from_str(raw).map_err(|e| {
                data_error(row, format!("column '{}' is not valid JSON: {}", column, e))
            })?;
            Ok(JsonSample {
                text: raw.to_string(),
                value,
            })
        }
    }
}

/// The controller names a view template (`View<controller>Template`).
fn check_controller(row: &RawRow, controller: &str) -> Result<()> {
    if !controller
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(data_error(
            row,
            format!(
                "controller '{}' may only contain letters, digits, '_' and '-'",
                controller
            ),
        ));
    }
    Ok(())
}

/// Names are used verbatim in file names.
fn check_file_name(row: &RawRow, name: &str) -> Result<()> {
    let bad = name == "."
        || name == ".."
        || name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '\0') || c.is_control());
    if bad {
        return Err(data_error(
            row,
            format!("name '{}' is not usable as a file name", name),
        ));
    }
    Ok(())
}

/// Directories must stay below the family's base directory.
fn check_relative_dir(row: &RawRow, dir: &str) -> Result<()> {
    let escapes = Path::new(dir)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || dir.contains('\0') {
        return Err(data_error(
            row,
            format!("directory '{}' must be a relative path without '..'", dir),
        ));
    }
    Ok(())
}
