//! # Screengen Templates Integration Tests
//!
//! File: cli/tests/templates.rs
//!
//! ## Overview
//!
//! Integration tests for `screengen templates`.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_lists_sample_templates() {
    let project = Project::new().with_sample_config();

    project
        .cmd(&["templates"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("vb/BaseHelper")
                .and(predicate::str::contains("vue/BaseView"))
                .and(predicate::str::contains("psx/BaseMasterRoutes"))
                .and(predicate::str::contains("Found 15 template(s).")),
        );
}

#[test]
fn test_family_filter() {
    let project = Project::new().with_sample_config();

    project
        .cmd(&["templates", "vue"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("vue/BaseDto")
                .and(predicate::str::contains("vb/").not())
                .and(predicate::str::contains("Found 4 template(s).")),
        );
}

#[test]
fn test_empty_template_directory() {
    let project = Project::new();
    std::fs::create_dir_all(project.path("tpl")).unwrap();
    project.write("screengen.toml", "template_dir = \"tpl\"\n");

    project
        .cmd(&["templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates found"));
}

#[test]
fn test_missing_template_directory_fails() {
    let project = Project::new();
    project.write("screengen.toml", "template_dir = \"nowhere\"\n");

    project
        .cmd(&["templates"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
