//! # Screengen CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behaviour of the `screengen` binary: standard flags, help
//! output and argument errors.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    screengen_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_commands() {
    screengen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("generate")
                .and(predicate::str::contains("templates"))
                .and(predicate::str::contains("--verbose")),
        );
}

#[test]
fn test_generate_help_lists_families() {
    screengen_cmd()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("vb")
                .and(predicate::str::contains("vue"))
                .and(predicate::str::contains("mock"))
                .and(predicate::str::contains("--dry-run")),
        );
}

#[test]
fn test_unknown_family_is_usage_error() {
    screengen_cmd()
        .args(["generate", "react"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'react'"));
}

#[test]
fn test_missing_subcommand_fails() {
    screengen_cmd().assert().failure();
}
