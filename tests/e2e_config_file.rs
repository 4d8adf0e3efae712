/// End-to-end tests for config file discovery and the multi-project scan.
///
/// These tests exercise the full flow from config file on disk through CLI
/// invocation to the cache file, using `assert_cmd` and `tempfile` for
/// isolated test environments.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Create a PHP project with no third-party requirements.
fn write_platform_only_project(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("composer.json"),
        r#"{"require": {"php": ">=8.1"}}"#,
    )
    .unwrap();
}

fn write_config(dir: &Path, root: &Path, cache: &Path, extra: &str) {
    let config = format!(
        "scan_roots:\n  - {}\ncache_file: {}\nmax_depth: 2\n{}",
        root.display(),
        cache.display(),
        extra
    );
    fs::write(dir.join("dep-health.config.yml"), config).unwrap();
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_scan_all_uses_discovered_config() {
    let workspace = TempDir::new().unwrap();
    let root = workspace.path().join("projects");
    write_platform_only_project(&root.join("site"));
    write_platform_only_project(&root.join("blog"));
    let cache = workspace.path().join("cache.json");
    write_config(workspace.path(), &root, &cache, "");

    cargo_bin_cmd!("dep-health")
        .current_dir(workspace.path())
        .arg("scan-all")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"scanned\": 2"));

    let cache: serde_json::Value = serde_json::from_str(&fs::read_to_string(&cache).unwrap()).unwrap();
    assert!(cache["runId"].is_string());
    assert!(cache["generatedAt"].is_string());
    // Nothing is outdated, so nothing is cached
    assert_eq!(cache["projects"], serde_json::json!([]));
}

#[test]
fn test_scan_all_explicit_config_and_cache_override() {
    let workspace = TempDir::new().unwrap();
    let root = workspace.path().join("projects");
    write_platform_only_project(&root.join("site"));
    let configured_cache = workspace.path().join("configured.json");
    let override_cache = workspace.path().join("override.json");

    let config_dir = workspace.path().join("conf");
    fs::create_dir_all(&config_dir).unwrap();
    write_config(&config_dir, &root, &configured_cache, "exclude_projects:\n  - site\n");

    cargo_bin_cmd!("dep-health")
        .arg("scan-all")
        .arg("--config")
        .arg(config_dir.join("dep-health.config.yml"))
        .arg("--cache")
        .arg(&override_cache)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"scanned\": 0"));

    assert!(override_cache.exists());
    assert!(!configured_cache.exists());
}

#[test]
fn test_unknown_config_field_warns() {
    let workspace = TempDir::new().unwrap();
    let root = workspace.path().join("projects");
    fs::create_dir_all(&root).unwrap();
    let cache = workspace.path().join("cache.json");
    write_config(workspace.path(), &root, &cache, "format: markdown\n");

    cargo_bin_cmd!("dep-health")
        .current_dir(workspace.path())
        .arg("scan-all")
        .env_remove("RUST_LOG")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("unknown config field will be ignored"));
}

#[test]
fn test_empty_advisory_id_is_application_error() {
    let workspace = TempDir::new().unwrap();
    let root = workspace.path().join("projects");
    fs::create_dir_all(&root).unwrap();
    let cache = workspace.path().join("cache.json");
    write_config(
        workspace.path(),
        &root,
        &cache,
        "ignore_advisories:\n  - id: \"\"\n",
    );

    cargo_bin_cmd!("dep-health")
        .current_dir(workspace.path())
        .arg("scan-all")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_missing_explicit_config_is_application_error() {
    cargo_bin_cmd!("dep-health")
        .args(["scan-all", "--config", "/nonexistent/dep-health.config.yml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to read config file"));
}
