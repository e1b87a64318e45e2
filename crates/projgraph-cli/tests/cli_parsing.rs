//! CLI parsing tests for the projgraph command
//!
//! Tests that verify CLI argument parsing works correctly.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the projgraph binary
#[allow(deprecated)]
fn projgraph() -> Command {
    Command::cargo_bin("projgraph").expect("Failed to find projgraph binary")
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_shows_all_commands() {
    projgraph()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("schemes"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("discover"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_flag() {
    projgraph()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("projgraph"));
}

// ============================================================================
// Global Options Tests
// ============================================================================

#[test]
fn test_global_options_in_help() {
    projgraph()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--quiet"))
        .stdout(predicate::str::contains("--manifest-name"))
        .stdout(predicate::str::contains("--sort"));
}

#[test]
fn test_unknown_sort_strategy_rejected() {
    projgraph()
        .args(["--sort", "random", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort strategy"));
}

#[test]
fn test_global_option_after_subcommand() {
    projgraph()
        .args(["schemes", "--sort", "topological", "--help"])
        .assert()
        .success();
}

// ============================================================================
// Command Tests
// ============================================================================

#[test]
fn test_graph_help() {
    projgraph()
        .args(["graph", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--recursive"))
        .stdout(predicate::str::contains("[PATH]"));
}

#[test]
fn test_graph_format_values() {
    projgraph()
        .args(["graph", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text"))
        .stdout(predicate::str::contains("json"))
        .stdout(predicate::str::contains("dot"));
}

#[test]
fn test_graph_rejects_unknown_format() {
    projgraph()
        .args(["graph", "--format", "svg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_discover_help() {
    projgraph()
        .args(["discover", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-depth"))
        .stdout(predicate::str::contains("--relative"));
}

#[test]
fn test_config_subcommands() {
    projgraph()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("path"));
}

#[test]
fn test_config_get_requires_key() {
    projgraph()
        .args(["config", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_missing_subcommand() {
    projgraph().assert().failure();
}
