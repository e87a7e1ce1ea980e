//! # Screengen CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Each test
//! builds a throwaway project in a temporary directory: a configuration file,
//! a screen list CSV, and a template directory (the repository's sample
//! templates, or hand-written ones).
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a command for the compiled `screengen` binary.
pub fn screengen_cmd() -> Command {
    let mut cmd = Command::cargo_bin("screengen").expect("Failed to find screengen binary for testing");
    cmd.env_remove("SCREENGEN_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// The sample templates shipped at the repository root.
pub fn sample_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../templates")
}

/// A temporary project directory with a `screengen.toml`.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Project {
            dir: tempfile::tempdir().expect("Failed to create temp project dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    pub fn config_path(&self) -> PathBuf {
        self.path("screengen.toml")
    }

    /// Writes a configuration covering all three families, using the sample
    /// templates and output directories inside the project.
    pub fn with_sample_config(self) -> Self {
        let config = format!(
            r#"template_dir = "{templates}"

[vb]
csv_file = "VB_SCREENS.csv"
base_dir = "out/vb"
helper_template = "BaseHelper"
interface_template = "BaseInterface"
controller_template = "BaseController"
model_template = "BaseModel"

[vue]
csv_file = "VUE_SCREENS.csv"
base_dir = "out/vue/src"
dto_template = "BaseDto"
data_template = "BaseData"
view_template = "BaseView"
router_config_dir = "out/vue/src/router"
router_config_name = "routes"

[mock]
csv_file = "MOCK_ENDPOINTS.csv"
mirage_dir = "out/mirage"
test_mock_dir = "out/app"
all_fixtures_template = "BaseAllFixtures"
all_models_template = "BaseAllModels"
all_requests_template = "BaseAllRequestPlaceholders"
master_routes_template = "BaseMasterRoutes"
mock_test_card_template = "BaseMockTestCard"
single_fixture_template = "BaseSingleFixture"
single_request_template = "BaseSingleRequestPlaceholders"
"#,
            templates = sample_templates().display().to_string().replace('\\', "/")
        );
        self.write("screengen.toml", &config);
        self
    }

    /// `screengen <args> --config <project config>`, run inside the project.
    pub fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = screengen_cmd();
        cmd.current_dir(self.root())
            .args(args)
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}
