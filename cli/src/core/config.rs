//! # Screengen Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the generator configuration: the template directory, and
//! for each target family its CSV file, output base directories and template
//! names. The configuration is loaded once per command and passed down by
//! reference; nothing below the command handlers reads the environment.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit file (`--config` or `SCREENGEN_CONFIG`), used alone
//! 2. Project-specific `.screengen.toml` in the current directory or ancestors
//! 3. User-specific `<config dir>/screengen/config.toml`
//!
//! Project values override user values field by field. Relative paths are
//! resolved against the directory of the file that declared them, and `~` is
//! expanded. Every option is optional at parse time; the generate command asks
//! for the options its family needs through [`require`], which fails with
//! `GenError::Config` naming the missing option.
//!
//! ## Examples
//!
//! ```toml
//! template_dir = "templates"
//!
//! [vue]
//! csv_file = "VUE_SCREENS.csv"
//! base_dir = "../frontend/src"
//! dto_template = "BaseDto"
//! data_template = "BaseData"
//! view_template = "BaseView"
//! router_config_dir = "../frontend/src/router"
//! router_config_name = "routes"
//! ```
//!
use crate::core::error::{GenError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory of the template resources (`vb/`, `vue/`, `psx/`).
    pub template_dir: Option<String>,
    #[serde(default)]
    pub vb: VbConfig,
    #[serde(default)]
    pub vue: VueConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

/// Options for the VB.NET backend family.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct VbConfig {
    pub csv_file: Option<String>,
    /// Root of the VB project; rows add their `directory` below it.
    pub base_dir: Option<String>,
    pub helper_template: Option<String>,
    pub interface_template: Option<String>,
    pub controller_template: Option<String>,
    pub model_template: Option<String>,
    /// Placeholder pair for the per-row templates. Defaults to `<%` `%>`.
    pub delimiters: Option<(String, String)>,
}

/// Options for the Vue frontend family.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct VueConfig {
    pub csv_file: Option<String>,
    /// Root of the Vue sources; `dto/`, `data/` and `views/` live below it.
    pub base_dir: Option<String>,
    pub dto_template: Option<String>,
    pub data_template: Option<String>,
    pub view_template: Option<String>,
    /// Directory holding the JSON route registry.
    pub router_config_dir: Option<String>,
    /// Registry file name without the `.json` extension.
    pub router_config_name: Option<String>,
    /// Placeholder pair for the per-row templates. Defaults to `<%` `%>`.
    pub delimiters: Option<(String, String)>,
}

/// Options for the Mirage-style API mock family.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct MockConfig {
    pub csv_file: Option<String>,
    /// Root of the mirage tree (`fixtures/`, `routes/`, ...).
    pub mirage_dir: Option<String>,
    /// Root of the mock test app; receives `screens/TestScreen.js`.
    pub test_mock_dir: Option<String>,
    pub all_fixtures_template: Option<String>,
    pub all_models_template: Option<String>,
    pub all_requests_template: Option<String>,
    pub master_routes_template: Option<String>,
    pub mock_test_card_template: Option<String>,
    pub single_fixture_template: Option<String>,
    pub single_request_template: Option<String>,
    /// Placeholder pair for every mock template. Defaults to `{{` `}}`.
    pub delimiters: Option<(String, String)>,
}

const PROJECT_CONFIG_FILENAME: &str = ".screengen.toml";

/// Returns the value of a required option or a `GenError::Config` naming it.
pub fn require<'a>(value: &'a Option<String>, option: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(anyhow!(GenError::Config(format!(
            "missing required option '{}'",
            option
        )))),
    }
}

/// Loads the configuration, either from `explicit` alone or by merging the
/// user and project files.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(anyhow!(GenError::Config(format!(
                "configuration file '{}' does not exist",
                path.display()
            ))));
        }
        info!("Loading configuration from: {}", path.display());
        let config = load_config_from_path(path)?;
        debug!("Final loaded configuration: {:?}", config);
        return Ok(config);
    }

    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    if user_config.is_none() && project_config.is_none() {
        return Err(anyhow!(GenError::Config(format!(
            "no configuration found; create {} or pass --config",
            PROJECT_CONFIG_FILENAME
        ))));
    }
    let merged = merge_configs(user_config.unwrap_or_default(), project_config);
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(proj_dirs) = ProjectDirs::from("dev", "screengen", "screengen") else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        None => {
            debug!("No {} found in current directory or ancestors.", PROJECT_CONFIG_FILENAME);
            Ok(None)
        }
    }
}

/// Walks up from `start` looking for the project config, stopping at a `.git` root.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| GenError::io(path, e))
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let mut config: Config = toml::from_str(&content).map_err(|e| {
        anyhow!(GenError::Config(format!(
            "failed to parse '{}': {}",
            path.display(),
            e
        )))
    })?;
    let base = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    resolve_config_paths(&mut config, &base);
    Ok(config)
}

/// Expands `~` and anchors relative paths at `base` for every path-valued option.
fn resolve_config_paths(config: &mut Config, base: &Path) {
    debug!("Resolving configuration paths against {}", base.display());
    let fields = [
        &mut config.template_dir,
        &mut config.vb.csv_file,
        &mut config.vb.base_dir,
        &mut config.vue.csv_file,
        &mut config.vue.base_dir,
        &mut config.vue.router_config_dir,
        &mut config.mock.csv_file,
        &mut config.mock.mirage_dir,
        &mut config.mock.test_mock_dir,
    ];
    for field in fields {
        if let Some(value) = field.as_mut() {
            *value = resolve_path(value, base);
        }
    }
}

fn resolve_path(raw: &str, base: &Path) -> String {
    let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
    if expanded.is_absolute() {
        expanded.to_string_lossy().into_owned()
    } else {
        base.join(expanded).to_string_lossy().into_owned()
    }
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project) = project else {
        return user;
    };
    Config {
        template_dir: project.template_dir.or(user.template_dir),
        vb: VbConfig {
            csv_file: project.vb.csv_file.or(user.vb.csv_file),
            base_dir: project.vb.base_dir.or(user.vb.base_dir),
            helper_template: project.vb.helper_template.or(user.vb.helper_template),
            interface_template: project.vb.interface_template.or(user.vb.interface_template),
            controller_template: project.vb.controller_template.or(user.vb.controller_template),
            model_template: project.vb.model_template.or(user.vb.model_template),
            delimiters: project.vb.delimiters.or(user.vb.delimiters),
        },
        vue: VueConfig {
            csv_file: project.vue.csv_file.or(user.vue.csv_file),
            base_dir: project.vue.base_dir.or(user.vue.base_dir),
            dto_template: project.vue.dto_template.or(user.vue.dto_template),
            data_template: project.vue.data_template.or(user.vue.data_template),
            view_template: project.vue.view_template.or(user.vue.view_template),
            router_config_dir: project.vue.router_config_dir.or(user.vue.router_config_dir),
            router_config_name: project.vue.router_config_name.or(user.vue.router_config_name),
            delimiters: project.vue.delimiters.or(user.vue.delimiters),
        },
        mock: MockConfig {
            csv_file: project.mock.csv_file.or(user.mock.csv_file),
            mirage_dir: project.mock.mirage_dir.or(user.mock.mirage_dir),
            test_mock_dir: project.mock.test_mock_dir.or(user.mock.test_mock_dir),
            all_fixtures_template: project
                .mock
                .all_fixtures_template
                .or(user.mock.all_fixtures_template),
            all_models_template: project.mock.all_models_template.or(user.mock.all_models_template),
            all_requests_template: project
                .mock
                .all_requests_template
                .or(user.mock.all_requests_template),
            master_routes_template: project
                .mock
                .master_routes_template
                .or(user.mock.master_routes_template),
            mock_test_card_template: project
                .mock
                .mock_test_card_template
                .or(user.mock.mock_test_card_template),
            single_fixture_template: project
                .mock
                .single_fixture_template
                .or(user.mock.single_fixture_template),
            single_request_template: project
                .mock
                .single_request_template
                .or(user.mock.single_request_template),
            delimiters: project.mock.delimiters.or(user.mock.delimiters),
        },
    }
}
