//! Integration tests for the tatami CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper function to create a test CLI command
fn cli() -> Command {
    Command::cargo_bin("tatami").unwrap()
}

const UNFORMATTED: &str = "<div>\n<p>x</p>\n</div>\n";
const FORMATTED: &str = "<div>\n  <p>x</p>\n</div>\n";

fn project_with_template(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html.erb");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "An opinionated formatter for HTML templates",
        ));
}

#[test]
fn test_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_fmt_stdin_to_stdout() {
    cli()
        .args(["fmt", "-"])
        .write_stdin(UNFORMATTED)
        .assert()
        .success()
        .stdout(predicate::eq(FORMATTED));
}

#[test]
fn test_fmt_prints_to_stdout_without_write() {
    let (_dir, path) = project_with_template(UNFORMATTED);

    cli()
        .args(["fmt", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::eq(FORMATTED));

    // The file itself is untouched.
    assert_eq!(fs::read_to_string(&path).unwrap(), UNFORMATTED);
}

#[test]
fn test_fmt_write_rewrites_file() {
    let (_dir, path) = project_with_template(UNFORMATTED);

    cli()
        .args(["fmt", path.to_str().unwrap(), "--write"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), FORMATTED);
}

#[test]
fn test_fmt_check_flags_unformatted_file() {
    let (_dir, path) = project_with_template(UNFORMATTED);

    cli()
        .args(["fmt", path.to_str().unwrap(), "--check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("needs formatting"));
}

#[test]
fn test_fmt_check_passes_formatted_file() {
    let (_dir, path) = project_with_template(FORMATTED);

    cli()
        .args(["fmt", path.to_str().unwrap(), "--check"])
        .assert()
        .success();
}

#[test]
fn test_fmt_directory_discovery() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.html.erb"), UNFORMATTED).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a template").unwrap();

    cli()
        .args(["fmt", dir.path().to_str().unwrap(), "--write"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("a.html.erb")).unwrap(),
        FORMATTED
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
        "not a template"
    );
}

#[test]
fn test_fmt_respects_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.html.erb");
    fs::write(&path, UNFORMATTED).unwrap();
    fs::write(
        dir.path().join("tatami.json"),
        r#"{ "indentation": { "size": 4 } }"#,
    )
    .unwrap();

    cli()
        .args(["fmt", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::eq("<div>\n    <p>x</p>\n</div>\n"));
}

#[test]
fn test_fmt_rejects_invalid_explicit_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("tatami.json");
    fs::write(&config_path, "{ not json").unwrap();
    let path = dir.path().join("index.html.erb");
    fs::write(&path, UNFORMATTED).unwrap();

    cli()
        .args([
            "fmt",
            path.to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .failure();
}

#[test]
fn test_config_init_and_validate() {
    let dir = TempDir::new().unwrap();

    cli()
        .current_dir(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote tatami.json"));

    assert!(dir.path().join("tatami.json").exists());

    cli()
        .current_dir(dir.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tatami.json"), "{}").unwrap();

    cli()
        .current_dir(dir.path())
        .args(["config", "init"])
        .assert()
        .failure();
}
