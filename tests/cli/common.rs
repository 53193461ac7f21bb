//! Cross-cutting CLI tests (help, version, error handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_help() {
    cargo_bin_cmd!("altfix")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("altfix scans HTML"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("altfix")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("altfix")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("altfix")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_lint_help() {
    cargo_bin_cmd!("altfix")
        .args(["lint", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing-alt"));
}

#[test]
fn test_explicit_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("custom.toml");
    fs::write(&config, "supported-tags = [\"Avatar\"]\n").unwrap();

    cargo_bin_cmd!("altfix")
        .args(["--config", config.to_str().unwrap(), "lint", "--check"])
        .args(["--language", "jsx"])
        .write_stdin("<img src=\"a.png\" />\n<Avatar src=\"b.png\" />\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Missing alt prop for Avatar tag."))
        .stdout(predicate::str::contains("for img tag").not());
}

#[test]
fn test_discovered_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".altfix.toml"),
        "supported-tags = [\"v-img\"]\n",
    )
    .unwrap();
    let page = temp_dir.path().join("index.html");
    fs::write(&page, "<img src=\"a.png\">\n").unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", "--check", page.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn test_missing_config_file_is_an_error() {
    cargo_bin_cmd!("altfix")
        .args(["--config", "/nonexistent/altfix.toml", "lint"])
        .write_stdin("<img alt=\"x\">")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_unknown_language_is_an_error() {
    cargo_bin_cmd!("altfix")
        .args(["lint", "--language", "markdown"])
        .write_stdin("![a](b.png)")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown language 'markdown'"));
}
