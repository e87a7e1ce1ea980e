//! # Screengen Template Renderer
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! This module renders generator templates. A template is identified by a
//! family-relative id such as `vue/BaseView`; it is read from the configured
//! template directory once per run and rendered with the Tera engine against a
//! JSON render context (one row, or `{ "bulk": [...] }`).
//!
//! ## Architecture
//!
//! Templates are Tera templates with two additions handled before Tera sees
//! the source:
//! - Placeholders are written with a delimiter pair passed on every render
//!   call ([`Delimiters`]). The default pair is `{{` `}}`. Targets whose own
//!   syntax uses double curly braces (Vue) are rendered with an alternate pair
//!   such as `<%` `%>`; literal `{{ }}`, `{% %}` and `{# #}` text then passes
//!   through unchanged.
//! - A placeholder holding a plain field path (`name`, `response.id`) renders
//!   as an empty string when the field is missing.
//!
//! Under an alternate pair, statements are written inside the pair and start
//! with a keyword: `<% for row in bulk %>` ... `<% endfor %>`.
//!
//! Autoescaping is disabled: generated files are source code, not HTML.
//!
//! ## Examples
//!
//! ```rust
//! let mut renderer = Renderer::new("templates");
//! let context = RenderContext::Row(row.to_context());
//! let code = renderer.render("vue/BaseDto", &context, &Delimiters::new("<%", "%>"))?;
//! ```
//!
use crate::core::error::{GenError, Result};
use anyhow::{anyhow, Context};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tera::Tera;
use tracing::{debug, trace};

/// Extension appended to template ids that do not carry one.
pub const TEMPLATE_EXTENSION: &str = "tmpl";

/// Statement keywords recognised inside an alternate delimiter pair.
const STATEMENT_KEYWORDS: &[&str] = &[
    "for", "endfor", "if", "elif", "else", "endif", "set", "set_global", "filter", "endfilter",
];

/// The placeholder delimiter pair for one render call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters::new("{{", "}}")
    }
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Delimiters {
            open: open.into(),
            close: close.into(),
        }
    }

    fn is_native(&self) -> bool {
        self.open == "{{" && self.close == "}}"
    }

    /// Rewrites a template written with these delimiters into plain Tera source.
    pub fn translate(&self, id: &str, source: &str) -> Result<String> {
        if self.open.is_empty() || self.close.is_empty() {
            return Err(anyhow!(GenError::TemplateSyntax {
                id: id.to_string(),
                message: "delimiters must not be empty".into(),
            }));
        }
        let native = self.is_native();
        let mut out = String::with_capacity(source.len() + source.len() / 4);
        let mut rest = source;

        while let Some(start) = rest.find(&self.open) {
            push_literal(&mut out, &rest[..start], native);
            let after_open = &rest[start + self.open.len()..];
            let end = after_open.find(&self.close).ok_or_else(|| {
                let line = source[..source.len() - rest.len() + start].lines().count().max(1);
                anyhow!(GenError::TemplateSyntax {
                    id: id.to_string(),
                    message: format!("unterminated '{}' on line {}", self.open, line),
                })
            })?;
            push_tag(&mut out, &after_open[..end], native);
            rest = &after_open[end + self.close.len()..];
        }
        push_literal(&mut out, rest, native);
        Ok(out)
    }
}

fn push_literal(out: &mut String, text: &str, native: bool) {
    if text.is_empty() {
        return;
    }
    if !native && (text.contains("{{") || text.contains("{%") || text.contains("{#")) {
        out.push_str("{% raw %}");
        out.push_str(text);
        out.push_str("{% endraw %}");
    } else {
        out.push_str(text);
    }
}

fn push_tag(out: &mut String, body: &str, native: bool) {
    let expr = body.trim().trim_matches('-').trim();
    let first_word = expr.split_whitespace().next().unwrap_or("");
    if !native && STATEMENT_KEYWORDS.contains(&first_word) {
        out.push_str("{% ");
        out.push_str(expr);
        out.push_str(" %}");
    } else if is_field_path(expr) {
        out.push_str("{{ ");
        out.push_str(expr);
        out.push_str(" | default(value=\"\") }}");
    } else {
        out.push_str("{{ ");
        out.push_str(expr);
        out.push_str(" }}");
    }
}

/// `name`, `row.route`, `bulk.0.name`: identifiers joined by dots.
fn is_field_path(expr: &str) -> bool {
    !expr.is_empty()
        && expr.split('.').all(|segment| {
            !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
        && !expr.starts_with(|c: char| c.is_ascii_digit())
}

/// Data handed to a template.
#[derive(Debug, Clone)]
pub enum RenderContext {
    /// A single row's mapping.
    Row(Value),
    /// Every row, exposed to the template as `bulk`.
    Bulk(Vec<Value>),
}

impl RenderContext {
    fn to_tera(&self) -> Result<tera::Context> {
        let value = match self {
            RenderContext::Row(row) => row.clone(),
            RenderContext::Bulk(rows) => json!({ "bulk": rows }),
        };
        tera::Context::from_value(value).map_err(|e| {
            anyhow!(GenError::Template { source: e })
                .context("Failed to create Tera context from render data")
        })
    }
}

/// Loads, caches and renders templates from one template directory.
pub struct Renderer {
    template_dir: PathBuf,
    tera: Tera,
    sources: HashMap<String, String>,
    compiled: HashSet<(String, Delimiters)>,
}

impl Renderer {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        Renderer {
            template_dir: template_dir.into(),
            tera,
            sources: HashMap::new(),
            compiled: HashSet::new(),
        }
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// Maps a template id to its file: ids without an extension get `.tmpl`.
    pub fn resolve(&self, id: &str) -> PathBuf {
        let path = self.template_dir.join(id);
        if path.extension().is_some() {
            path
        } else {
            path.with_extension(TEMPLATE_EXTENSION)
        }
    }

    /// Renders `id` against `context`, reading and compiling it on first use.
    pub fn render(
        &mut self,
        id: &str,
        context: &RenderContext,
        delimiters: &Delimiters,
    ) -> Result<String> {
        let name = self.compile(id, delimiters)?;
        let tera_context = context.to_tera()?;
        let rendered = self.tera.render(&name, &tera_context).map_err(|e| {
            anyhow!(GenError::Template { source: e })
                .context(format!("Tera rendering failed for template '{}'", id))
        })?;
        trace!("Rendered '{}' ({} bytes)", id, rendered.len());
        Ok(rendered)
    }

    fn compile(&mut self, id: &str, delimiters: &Delimiters) -> Result<String> {
        let name = format!("{}#{}{}", id, delimiters.open, delimiters.close);
        let key = (id.to_string(), delimiters.clone());
        if self.compiled.contains(&key) {
            return Ok(name);
        }
        let source = self.load_source(id)?;
        let translated = delimiters.translate(id, &source)?;
        self.tera
            .add_raw_template(&name, &translated)
            .map_err(|e| {
                anyhow!(GenError::Template { source: e })
                    .context(format!("Tera could not parse template '{}'", id))
            })?;
        debug!("Compiled template '{}' with delimiters {:?}", id, delimiters);
        self.compiled.insert(key);
        Ok(name)
    }

    fn load_source(&mut self, id: &str) -> Result<String> {
        if let Some(source) = self.sources.get(id) {
            return Ok(source.clone());
        }
        let path = self.resolve(id);
        if !path.is_file() {
            return Err(anyhow!(GenError::TemplateNotFound {
                id: id.to_string(),
                path,
            }));
        }
        let source = fs::read_to_string(&path)
            .map_err(|e| GenError::io(&path, e))
            .with_context(|| format!("Failed to read template file '{}'", path.display()))?;
        debug!("Loaded template '{}' from {}", id, path.display());
        self.sources.insert(id.to_string(), source.clone());
        Ok(source)
    }
}
