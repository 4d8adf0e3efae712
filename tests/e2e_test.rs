/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A PHP project whose only requirement is the platform itself, so the
/// scan has no packages to look up over the network
fn platform_only_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("composer.json"),
        r#"{"name": "acme/site", "require": {"php": ">=8.1", "ext-json": "*"}}"#,
    )
    .unwrap();
    dir
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("dep-health")
            .arg("--help")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("scan-all"));
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("dep-health")
            .arg("--version")
            .assert()
            .code(0)
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("dep-health")
            .args(["scan", "--invalid-option"])
            .assert()
            .code(2);
    }

    /// Exit code 2: Missing subcommand
    #[test]
    fn test_exit_code_missing_subcommand() {
        cargo_bin_cmd!("dep-health").assert().code(2);
    }

    /// Exit code 2: Invalid language value
    #[test]
    fn test_exit_code_invalid_language() {
        cargo_bin_cmd!("dep-health")
            .args(["scan", "--language", "cobol"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Invalid language"));
    }

    /// Exit code 3: Application error - non-existent project path
    #[test]
    fn test_exit_code_application_error_nonexistent_path() {
        cargo_bin_cmd!("dep-health")
            .args(["scan", "-p", "/nonexistent/path/that/does/not/exist"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Directory does not exist"));
    }

    /// Exit code 3: Application error - path is a file, not a directory
    #[test]
    fn test_exit_code_application_error_file_not_directory() {
        cargo_bin_cmd!("dep-health")
            .args(["scan", "-p", "Cargo.toml"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Not a directory"));
    }

    /// Exit code 3: Application error - no supported manifest
    #[test]
    fn test_exit_code_application_error_no_manifest() {
        let dir = TempDir::new().unwrap();
        cargo_bin_cmd!("dep-health")
            .args(["scan", "-p"])
            .arg(dir.path())
            .assert()
            .code(3)
            .stderr(predicate::str::contains("No supported manifest found"));
    }
}

#[test]
fn test_scan_prints_json_report() {
    let project = platform_only_project();
    cargo_bin_cmd!("dep-health")
        .args(["scan", "-p"])
        .arg(project.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"healthScore\": 100"))
        .stdout(predicate::str::contains("\"language\": \"php\""));
}

#[test]
fn test_scan_writes_output_file() {
    let project = platform_only_project();
    let out_dir = TempDir::new().unwrap();
    let out = out_dir.path().join("report.json");

    cargo_bin_cmd!("dep-health")
        .args(["scan", "--quiet", "-p"])
        .arg(project.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["packageCount"], 0);
    assert_eq!(report["project"]["language"], "php");
}
