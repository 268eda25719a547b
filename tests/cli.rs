//! CLI integration tests for the packager binary.
//!
//! Chocolatey packing needs a Windows host, so on other hosts these runs exercise the
//! emit-and-skip path without touching `choco`.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
[project]
name = "app"
version = "1.2.0"
description = "Sample application"
authors = ["Jane Doe"]
license_url = "https://example.com/LICENSE"

[release]
owner = "acme"
name = "app"

[[distributions]]
name = "app"

[[distributions]]
name = "cli"
executable = "app-cli"
"#;

/// Get the packager binary command with a clean environment.
fn packager() -> Command {
    let mut cmd = Command::cargo_bin("kodegen_bundler_packager").unwrap();
    cmd.env_remove("CHOCOLATEY_API_KEY")
        .env_remove("PACKAGER_DRY_RUN");
    cmd
}

fn project_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("packager.toml"), CONFIG).unwrap();
    tmp
}

fn package_root(basedir: &Path, distribution: &str) -> std::path::PathBuf {
    basedir
        .join("out/packager/package")
        .join(distribution)
        .join("chocolatey")
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();

    packager()
        .args(["--basedir"])
        .arg(tmp.path())
        .arg("package")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_missing_step_is_a_usage_error() {
    packager().assert().failure();
}

#[test]
fn test_unknown_distribution_fails() {
    let tmp = project_dir();

    packager()
        .arg("--basedir")
        .arg(tmp.path())
        .args(["--distribution", "nope", "package"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown distribution: nope"));
}

#[cfg(not(windows))]
#[test]
fn test_package_emits_files_for_every_distribution() {
    let tmp = project_dir();

    packager()
        .arg("--basedir")
        .arg(tmp.path())
        .arg("package")
        .assert()
        .success()
        .stdout(predicate::str::contains("requires a Windows host"));

    let app = package_root(tmp.path(), "app");
    assert!(app.join("app/app.nuspec").is_file());
    assert!(app.join("README.md").is_file());

    let cli = package_root(tmp.path(), "cli");
    let install = fs::read_to_string(cli.join("cli/tools/chocolateyinstall.ps1")).unwrap();
    assert!(install.contains("app-cli"));
}

#[cfg(not(windows))]
#[test]
fn test_distribution_filter_and_output_dir() {
    let tmp = project_dir();

    packager()
        .arg("--basedir")
        .arg(tmp.path())
        .args(["--output-dir", "build", "-d", "cli", "package"])
        .assert()
        .success();

    assert!(tmp.path().join("build/package/cli/chocolatey/cli/cli.nuspec").is_file());
    assert!(!tmp.path().join("build/package/app").exists());
}

#[cfg(not(windows))]
#[test]
fn test_dry_run_full_succeeds_without_api_key() {
    let tmp = project_dir();

    packager()
        .arg("--basedir")
        .arg(tmp.path())
        .args(["--dry-run", "-d", "app", "full"])
        .assert()
        .success()
        .stdout(predicate::str::contains("publish: skipped"));
}

#[cfg(not(windows))]
#[test]
fn test_publish_on_unsupported_host_skips() {
    let tmp = project_dir();

    packager()
        .arg("--basedir")
        .arg(tmp.path())
        .args(["-d", "app", "publish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("publish: skipped, requires a Windows host"));
}
