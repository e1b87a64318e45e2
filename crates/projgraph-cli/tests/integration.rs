//! Integration tests for the projgraph CLI
//!
//! These tests write manifest workspaces into temp directories and run
//! full CLI workflows against them. `HOME` points into the temp directory
//! so no global configuration leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a Command for the projgraph binary, isolated from the user's home
#[allow(deprecated)]
fn projgraph(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("projgraph").expect("Failed to find projgraph binary");
    cmd.env("HOME", home).env_remove("PROJGRAPH_CONFIG");
    cmd
}

fn write_manifest(dir: &Path, file_name: &str, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(file_name), content).unwrap();
}

const APP: &str = r#"
name = "App"

[[targets]]
name = "App"
product = "app"
dependencies = [
  { target = "Core" },
  { target = "Utils", project = "../Shared" },
]

[[targets]]
name = "Core"
product = "framework"

[[targets]]
name = "AppTests"
product = "unit_tests"
dependencies = [{ target = "App" }]
"#;

const SHARED: &str = r#"
name = "Shared"

[[targets]]
name = "Utils"
product = "static_library"
"#;

/// Create a temporary workspace with `App/` depending on `Shared/`
fn setup_workspace() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write_manifest(&temp.path().join("App"), "Project.toml", APP);
    write_manifest(&temp.path().join("Shared"), "Project.toml", SHARED);
    temp
}

// ============================================================================
// Graph
// ============================================================================

#[test]
fn test_graph_text_output() {
    let temp = setup_workspace();

    projgraph(temp.path())
        .arg("graph")
        .arg(temp.path().join("App"))
        .assert()
        .success()
        .stdout(predicate::str::contains("App ("))
        .stdout(predicate::str::contains("  Core [framework]"))
        .stdout(predicate::str::contains("-> Utils ("))
        .stdout(predicate::str::contains(
            "2 project(s), 4 target(s), 3 dependency edge(s)",
        ));
}

#[test]
fn test_graph_json_output() {
    let temp = setup_workspace();

    let output = projgraph(temp.path())
        .args(["graph", "--format", "json"])
        .arg(temp.path().join("App"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["node_count"], 4);
    assert_eq!(json["projects"][0]["name"], "App");
    assert_eq!(json["projects"][1]["name"], "Shared");
}

#[test]
fn test_graph_dot_output() {
    let temp = setup_workspace();

    projgraph(temp.path())
        .args(["graph", "-f", "dot"])
        .arg(temp.path().join("App"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph projgraph {"))
        .stdout(predicate::str::contains("label = \"Shared\";"));
}

#[test]
fn test_graph_recursive_loads_all_projects() {
    let temp = setup_workspace();
    write_manifest(
        &temp.path().join("Tools"),
        "Project.toml",
        "name = \"Tools\"\n\n[[targets]]\nname = \"Lint\"\nproduct = \"command_line_tool\"\n",
    );

    projgraph(temp.path())
        .args(["graph", "--recursive"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Tools ("))
        .stdout(predicate::str::contains("3 project(s), 5 target(s)"));
}

#[test]
fn test_custom_manifest_name() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        "Module.toml",
        "name = \"Mod\"\n\n[[targets]]\nname = \"Mod\"\nproduct = \"framework\"\n",
    );

    projgraph(temp.path())
        .args(["graph", "--manifest-name", "Module.toml"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Mod [framework]"));

    projgraph(temp.path())
        .arg("graph")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest not found"));
}

// ============================================================================
// Schemes
// ============================================================================

const CHAIN: &str = r#"
name = "Chain"

[[targets]]
name = "A"
product = "app"
dependencies = [{ target = "B" }]

[[targets]]
name = "B"
product = "framework"
dependencies = [{ target = "C" }]

[[targets]]
name = "C"
product = "framework"
"#;

#[test]
fn test_schemes_output() {
    let temp = setup_workspace();

    projgraph(temp.path())
        .arg("schemes")
        .arg(temp.path().join("App"))
        .assert()
        .success()
        .stdout(predicate::str::contains("App-Project (legacy ordering)"))
        .stdout(predicate::str::contains("build: Core, App, AppTests"))
        .stdout(predicate::str::contains("test:  AppTests"))
        .stdout(predicate::str::contains("Shared-Project"));
}

#[test]
fn test_schemes_sort_strategy() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "Project.toml", CHAIN);

    projgraph(temp.path())
        .arg("schemes")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("build: B, A, C"));

    projgraph(temp.path())
        .args(["--sort", "topological", "schemes"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("build: C, B, A"));
}

#[test]
fn test_local_config_selects_strategy() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "Project.toml", CHAIN);
    write_manifest(
        &temp.path().join(".projgraph"),
        "config.toml",
        "[sorting]\nstrategy = \"topological\"\n",
    );

    projgraph(temp.path())
        .args(["schemes", "--json"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Chain-Project\""))
        .stdout(predicate::str::contains("\"C\",\n      \"B\",\n      \"A\""));
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn test_check_ok() {
    let temp = setup_workspace();

    projgraph(temp.path())
        .arg("check")
        .arg(temp.path().join("App"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn test_check_reports_cycle() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        "Project.toml",
        r#"
name = "Loop"

[[targets]]
name = "A"
product = "framework"
dependencies = [{ target = "B" }]

[[targets]]
name = "B"
product = "framework"
dependencies = [{ target = "A" }]
"#,
    );

    projgraph(temp.path())
        .arg("check")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular dependency detected"))
        .stderr(predicate::str::contains(" -> "));
}

#[test]
fn test_check_reports_missing_dependency() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        "Project.toml",
        r#"
name = "P"

[[targets]]
name = "A"
product = "app"
dependencies = [{ target = "Ghost" }]
"#,
    );

    projgraph(temp.path())
        .arg("check")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("'Ghost'"));
}

#[test]
fn test_check_missing_path() {
    let temp = TempDir::new().unwrap();

    projgraph(temp.path())
        .arg("check")
        .arg(temp.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

// ============================================================================
// Discover
// ============================================================================

#[test]
fn test_discover_relative() {
    let temp = setup_workspace();
    fs::create_dir_all(temp.path().join("build/Ignored")).unwrap();
    fs::write(temp.path().join("build/Ignored/Project.toml"), SHARED).unwrap();

    projgraph(temp.path())
        .args(["discover", "--relative"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout("App\nShared\n");
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_init_and_show() {
    let temp = TempDir::new().unwrap();

    projgraph(temp.path())
        .args(["config", "init"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(".projgraph"));
    assert!(temp.path().join(".projgraph/config.toml").exists());

    projgraph(temp.path())
        .args(["config", "show"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[sorting]"))
        .stdout(predicate::str::contains("strategy = \"legacy\""));
}

#[test]
fn test_config_get() {
    let temp = TempDir::new().unwrap();

    projgraph(temp.path())
        .args(["--manifest-name", "Module.toml", "config", "get", "manifest.file_name"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout("Module.toml\n");

    projgraph(temp.path())
        .args(["config", "get", "no.such.key"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        &temp.path().join(".projgraph"),
        "config.toml",
        "[discovery]\nmax_depth = 0\n",
    );

    projgraph(temp.path())
        .args(["config", "show"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("discovery.max_depth"));
}
