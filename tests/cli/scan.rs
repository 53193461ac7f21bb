//! Scan subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_scan_lists_tags() {
    cargo_bin_cmd!("altfix")
        .arg("scan")
        .write_stdin("<p>\n  <img src=\"a.png\" alt=\"A &amp; B\">\n</p>\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1:1 <p>"))
        .stdout(predicate::str::contains(
            "2:3 <img> src=\"a.png\" alt=\"A & B\"",
        ));
}

#[test]
fn test_scan_vue_positions_are_file_relative() {
    cargo_bin_cmd!("altfix")
        .args(["scan", "--language", "vue"])
        .write_stdin("<script>\nconst a = '<img>';\n</script>\n<template>\n  <img src=\"b.png\">\n</template>\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("5:3 <img> src=\"b.png\""))
        .stdout(predicate::str::contains("const").not());
}

#[test]
fn test_scan_reports_fault() {
    cargo_bin_cmd!("altfix")
        .arg("scan")
        .write_stdin("<p>ok</p>\n<img src=\"a.png\"")
        .assert()
        .success()
        .stdout(predicate::str::contains("1:1 <p>"))
        .stderr(predicate::str::contains(
            "scan stopped early: unterminated tag at byte 10",
        ));
}
