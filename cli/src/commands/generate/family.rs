//! # Target Families
//!
//! File: cli/src/commands/generate/family.rs
//!
//! ## Overview
//!
//! A target family is one output ecosystem the generator writes files for.
//! [`FamilyPlan`] binds a family to its configuration and answers the two
//! questions the orchestrator asks: which files does a row produce, and which
//! files are rendered once over every row.
//!
//! | family | per row | bulk | registry |
//! |--------|---------|------|----------|
//! | `vb`   | Helper, Interface, Controller, Model | none | no |
//! | `vue`  | DTO, Data, View | none | yes |
//! | `mock` | Fixture, Request (when the row has a body) | requests, models, routes, fixtures, test card | no |
//!
use super::normalize::{ScreenDescriptor, NO_CONTROLLER};
use crate::core::config::{self, Config};
use crate::core::error::Result;
use crate::core::templating::Delimiters;
use std::fmt;
use std::path::{Path, PathBuf};

/// The output ecosystems the generator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TargetFamily {
    /// VB.NET backend: helpers, interfaces, controllers and models.
    Vb,
    /// Vue frontend: DTO, data and view files plus the route registry.
    Vue,
    /// Mirage-style API mocks: fixtures, request samples and aggregate files.
    #[value(name = "mock", alias = "psx")]
    MockApi,
}

impl TargetFamily {
    /// Sub-directory of the template directory holding this family's templates.
    pub fn template_subdir(self) -> &'static str {
        match self {
            TargetFamily::Vb => "vb",
            TargetFamily::Vue => "vue",
            TargetFamily::MockApi => "psx",
        }
    }

    /// Screen families place output below the row's `directory`.
    pub fn requires_directory(self) -> bool {
        !matches!(self, TargetFamily::MockApi)
    }

    /// Placeholder pair used when the configuration does not name one.
    fn default_delimiters(self) -> Delimiters {
        match self {
            TargetFamily::Vb | TargetFamily::Vue => Delimiters::new("<%", "%>"),
            TargetFamily::MockApi => Delimiters::default(),
        }
    }
}

impl fmt::Display for TargetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFamily::Vb => "vb",
            TargetFamily::Vue => "vue",
            TargetFamily::MockApi => "mock",
        };
        f.write_str(name)
    }
}

/// One file to render: which template, and where the result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub label: &'static str,
    pub template_id: String,
    pub target: PathBuf,
}

#[derive(Debug, Clone)]
enum Layout {
    Vb {
        base_dir: PathBuf,
        helper: String,
        interface: String,
        controller: String,
        model: String,
    },
    Vue {
        base_dir: PathBuf,
        dto: String,
        data: String,
        view: String,
        registry_file: PathBuf,
    },
    MockApi {
        mirage_dir: PathBuf,
        test_mock_dir: PathBuf,
        all_fixtures: String,
        all_models: String,
        all_requests: String,
        master_routes: String,
        mock_test_card: String,
        single_fixture: String,
        single_request: String,
    },
}

/// A family together with every configured path and template it needs.
#[derive(Debug, Clone)]
pub struct FamilyPlan {
    pub family: TargetFamily,
    pub csv_file: PathBuf,
    pub template_dir: PathBuf,
    pub delimiters: Delimiters,
    layout: Layout,
}

impl FamilyPlan {
    /// Resolves the options `family` needs, failing on the first missing one.
    pub fn from_config(family: TargetFamily, cfg: &Config) -> Result<Self> {
        let template_dir = PathBuf::from(config::require(&cfg.template_dir, "template_dir")?);
        let (csv_file, delimiters, layout) = match family {
            TargetFamily::Vb => {
                let vb = &cfg.vb;
                let layout = Layout::Vb {
                    base_dir: config::require(&vb.base_dir, "vb.base_dir")?.into(),
                    helper: config::require(&vb.helper_template, "vb.helper_template")?.into(),
                    interface: config::require(&vb.interface_template, "vb.interface_template")?
                        .into(),
                    controller: config::require(&vb.controller_template, "vb.controller_template")?
                        .into(),
                    model: config::require(&vb.model_template, "vb.model_template")?.into(),
                };
                (
                    config::require(&vb.csv_file, "vb.csv_file")?,
                    vb.delimiters.clone(),
                    layout,
                )
            }
            TargetFamily::Vue => {
                let vue = &cfg.vue;
                let router_dir = config::require(&vue.router_config_dir, "vue.router_config_dir")?;
                let router_name =
                    config::require(&vue.router_config_name, "vue.router_config_name")?;
                let layout = Layout::Vue {
                    base_dir: config::require(&vue.base_dir, "vue.base_dir")?.into(),
                    dto: config::require(&vue.dto_template, "vue.dto_template")?.into(),
                    data: config::require(&vue.data_template, "vue.data_template")?.into(),
                    view: config::require(&vue.view_template, "vue.view_template")?.into(),
                    registry_file: Path::new(router_dir).join(format!("{}.json", router_name)),
                };
                (
                    config::require(&vue.csv_file, "vue.csv_file")?,
                    vue.delimiters.clone(),
                    layout,
                )
            }
            TargetFamily::MockApi => {
                let mock = &cfg.mock;
                let layout = Layout::MockApi {
                    mirage_dir: config::require(&mock.mirage_dir, "mock.mirage_dir")?.into(),
                    test_mock_dir: config::require(&mock.test_mock_dir, "mock.test_mock_dir")?
                        .into(),
                    all_fixtures: config::require(
                        &mock.all_fixtures_template,
                        "mock.all_fixtures_template",
                    )?
                    .into(),
                    all_models: config::require(
                        &mock.all_models_template,
                        "mock.all_models_template",
                    )?
                    .into(),
                    all_requests: config::require(
                        &mock.all_requests_template,
                        "mock.all_requests_template",
                    )?
                    .into(),
                    master_routes: config::require(
                        &mock.master_routes_template,
                        "mock.master_routes_template",
                    )?
                    .into(),
                    mock_test_card: config::require(
                        &mock.mock_test_card_template,
                        "mock.mock_test_card_template",
                    )?
                    .into(),
                    single_fixture: config::require(
                        &mock.single_fixture_template,
                        "mock.single_fixture_template",
                    )?
                    .into(),
                    single_request: config::require(
                        &mock.single_request_template,
                        "mock.single_request_template",
                    )?
                    .into(),
                };
                (
                    config::require(&mock.csv_file, "mock.csv_file")?,
                    mock.delimiters.clone(),
                    layout,
                )
            }
        };
        let delimiters = delimiters
            .map(|(open, close)| Delimiters::new(open, close))
            .unwrap_or_else(|| family.default_delimiters());
        Ok(FamilyPlan {
            family,
            csv_file: PathBuf::from(csv_file),
            template_dir,
            delimiters,
            layout,
        })
    }

    fn template_id(&self, name: &str) -> String {
        format!("{}/{}", self.family.template_subdir(), name)
    }

    fn artifact(&self, label: &'static str, template: &str, target: PathBuf) -> Artifact {
        Artifact {
            label,
            template_id: self.template_id(template),
            target,
        }
    }

    /// Files generated for one row.
    pub fn row_artifacts(&self, row: &ScreenDescriptor) -> Vec<Artifact> {
        let name = &row.name;
        match &self.layout {
            Layout::Vb {
                base_dir,
                helper,
                interface,
                controller,
                model,
            } => {
                let root = base_dir.join(&row.directory);
                vec![
                    self.artifact(
                        "helper",
                        helper,
                        root.join("Helpers").join(format!("{}Helper.vb", name)),
                    ),
                    self.artifact(
                        "interface",
                        interface,
                        root.join("HelperInterfaces")
                            .join(format!("I{}Helper.vb", name)),
                    ),
                    self.artifact(
                        "controller",
                        controller,
                        root.join("Controllers")
                            .join(format!("{}Controller.vb", name)),
                    ),
                    self.artifact(
                        "model",
                        model,
                        root.join("Model").join(format!("{}Model.vb", name)),
                    ),
                ]
            }
            Layout::Vue {
                base_dir,
                dto,
                data,
                view,
                ..
            } => {
                let view_template = if row.controller == NO_CONTROLLER {
                    view.clone()
                } else {
                    format!("View{}Template", row.controller)
                };
                vec![
                    self.artifact(
                        "dto",
                        dto,
                        base_dir
                            .join("dto")
                            .join(&row.directory)
                            .join(format!("{}DTO.ts", name)),
                    ),
                    self.artifact(
                        "data",
                        data,
                        base_dir
                            .join("data")
                            .join(&row.directory)
                            .join(format!("{}Data.ts", name)),
                    ),
                    self.artifact(
                        "view",
                        &view_template,
                        base_dir
                            .join("views")
                            .join(&row.directory)
                            .join(format!("{}.ts", name)),
                    ),
                ]
            }
            Layout::MockApi {
                mirage_dir,
                single_fixture,
                single_request,
                ..
            } => {
                let mut artifacts = vec![self.artifact(
                    "fixture",
                    single_fixture,
                    mirage_dir
                        .join("fixtures")
                        .join(format!("{}Fixture.json", name)),
                )];
                if row.has_req_body {
                    artifacts.push(self.artifact(
                        "request",
                        single_request,
                        mirage_dir
                            .join("request_placeholders")
                            .join(format!("{}SampleRequest.json", name)),
                    ));
                }
                artifacts
            }
        }
    }

    /// Files rendered once over every row.
    pub fn bulk_artifacts(&self) -> Vec<Artifact> {
        match &self.layout {
            Layout::MockApi {
                mirage_dir,
                test_mock_dir,
                all_fixtures,
                all_models,
                all_requests,
                master_routes,
                mock_test_card,
                ..
            } => vec![
                self.artifact(
                    "all requests",
                    all_requests,
                    mirage_dir.join("request_placeholders").join("index.js"),
                ),
                self.artifact("all models", all_models, mirage_dir.join("models").join("index.js")),
                self.artifact(
                    "master routes",
                    master_routes,
                    mirage_dir.join("routes").join("index.js"),
                ),
                self.artifact(
                    "all fixtures",
                    all_fixtures,
                    mirage_dir.join("fixtures").join("index.js"),
                ),
                self.artifact(
                    "mock test card",
                    mock_test_card,
                    test_mock_dir.join("screens").join("TestScreen.js"),
                ),
            ],
            Layout::Vb { .. } | Layout::Vue { .. } => Vec::new(),
        }
    }

    /// The JSON route registry this family maintains, if any.
    pub fn registry_file(&self) -> Option<&Path> {
        match &self.layout {
            Layout::Vue { registry_file, .. } => Some(registry_file),
            Layout::Vb { .. } | Layout::MockApi { .. } => None,
        }
    }
}
