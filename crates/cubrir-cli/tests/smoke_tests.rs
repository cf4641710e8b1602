//! Smoke tests for the cubridor CLI
//!
//! These tests verify basic CLI functionality works correctly without
//! touching the network or spawning external tools.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the cubridor binary
fn cubridor() -> Command {
    Command::cargo_bin("cubridor").expect("cubridor binary should exist")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    cubridor()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_help_flag() {
    cubridor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("coverage"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn test_no_args_shows_help() {
    // Running with no args should error gracefully - a subcommand is required
    cubridor().assert().failure();
}

// ============================================================================
// Subcommand Help Tests
// ============================================================================

#[test]
fn test_coverage_subcommand_help() {
    cubridor()
        .args(["coverage", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--command"))
        .stdout(predicate::str::contains("--source-dir"))
        .stdout(predicate::str::contains("--binary-dir"));
}

#[test]
fn test_analyze_subcommand_help() {
    cubridor()
        .args(["analyze", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--binary-dir"))
        .stdout(predicate::str::contains("clang-tidy"));
}

// ============================================================================
// Argument Validation Tests
// ============================================================================

#[test]
fn test_coverage_requires_command() {
    cubridor()
        .args(["coverage", "--source-dir", "s", "--binary-dir", "b"])
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("GITHUB_WORKSPACE")
        .env_remove("GITHUB_SHA")
        .env_remove("CODACY_PROJECT_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--command"));
}

#[test]
fn test_analyze_requires_codacy_token() {
    cubridor()
        .args([
            "analyze",
            "--binary-dir",
            "b",
            "--repository",
            "o/r",
            "--workspace",
            "/ws",
            "--commit",
            "c",
        ])
        .env_remove("CODACY_PROJECT_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--codacy-token"));
}

#[test]
fn test_unknown_subcommand_fails() {
    cubridor()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
