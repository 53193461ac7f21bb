//! Lint subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PAGE: &str = "<main>\n  <img src=\"/img/company-logo.png\">\n  <img src=\"/img/chart.svg\" alt=\"Revenue by quarter\">\n</main>\n";

#[test]
fn test_lint_clean_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("index.html");
    fs::write(&test_file, "<img src=\"a.png\" alt=\"A red apple\">\n").unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_lint_with_issues() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("index.html");
    fs::write(&test_file, PAGE).unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("[missing-alt]: Missing alt attribute for img tag."))
        .stdout(predicate::str::contains("index.html:2:3"))
        .stdout(predicate::str::contains("add alt text \"Company logo\""))
        .stdout(predicate::str::contains("Found 1 issue(s)"));
}

#[test]
fn test_lint_check_mode_clean() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.tsx");
    fs::write(&test_file, "export const A = () => <Image src={a} alt=\"Dog\" />;\n").unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", "--check", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_lint_check_mode_issues() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("index.html");
    fs::write(&test_file, PAGE).unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", "--check", test_file.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Found 1 issue(s)"));
}

#[test]
fn test_lint_fix_mode() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("index.html");
    fs::write(&test_file, PAGE).unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", "--fix", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed 1 issue(s)"))
        .stdout(predicate::str::contains("No issues found"));

    let content = fs::read_to_string(&test_file).unwrap();
    assert!(content.contains("<img src=\"/img/company-logo.png\" alt=\"Company logo\">"));
    assert!(content.contains("alt=\"Revenue by quarter\""));
}

#[test]
fn test_lint_fix_diff_does_not_write() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("index.html");
    fs::write(&test_file, PAGE).unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", "--fix", "--diff", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Diff in"))
        .stdout(predicate::str::contains("alt=\"Company logo\""));

    assert_eq!(fs::read_to_string(&test_file).unwrap(), PAGE);
}

#[test]
fn test_lint_fix_stdin() {
    cargo_bin_cmd!("altfix")
        .args(["lint", "--fix", "--language", "typescriptreact"])
        .write_stdin("<Image src=\"/team-photo.jpg\" alt=\"\" />\n")
        .assert()
        .success()
        .stdout("<Image src=\"/team-photo.jpg\" alt=\"Team photo\" />\n")
        .stderr(predicate::str::contains("Fixed 1 issue(s)"));
}

#[test]
fn test_lint_fix_leaves_unfixable_issues() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("page.jsx");
    fs::write(&test_file, "<Image src={hero} />\n").unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", "--fix", "--check", test_file.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[missing-alt]"))
        .stderr(predicate::str::contains("Fixed 0 issue(s)"));
}

#[test]
fn test_lint_multiple_files() {
    let temp_dir = TempDir::new().unwrap();
    let file1 = temp_dir.path().join("a.html");
    let file2 = temp_dir.path().join("b.vue");

    fs::write(&file1, "<img src=\"x.png\">").unwrap();
    fs::write(&file2, "<template>\n  <img src=\"y.png\" alt=\"\">\n</template>\n").unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", file1.to_str().unwrap(), file2.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.html:1:1"))
        .stdout(predicate::str::contains("b.vue:2:3"))
        .stdout(predicate::str::contains("Empty alt prop for img tag."));
}

#[test]
fn test_lint_directory() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let dist = temp_dir.path().join("dist");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dist).unwrap();

    fs::write(src.join("App.svelte"), "<img src=\"logo.svg\" />\n").unwrap();
    fs::write(src.join("notes.md"), "<img src=\"ignored.png\">\n").unwrap();
    fs::write(dist.join("index.html"), "<img src=\"built.png\">\n").unwrap();
    fs::write(
        temp_dir.path().join("altfix.toml"),
        "exclude = [\"dist/**\"]\n",
    )
    .unwrap();

    cargo_bin_cmd!("altfix")
        .args(["lint", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("App.svelte"))
        .stdout(predicate::str::contains("notes.md").not())
        .stdout(predicate::str::contains("dist").not())
        .stdout(predicate::str::contains("Found 1 issue(s)"));
}

#[test]
fn test_lint_stdin() {
    cargo_bin_cmd!("altfix")
        .arg("lint")
        .write_stdin("<p><img src=\"a.png\" alt=\"image\"></p>")
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"))
        .stdout(predicate::str::contains("[poor-alt]"))
        .stdout(predicate::str::contains("<stdin>:1:4"));
}

#[test]
fn test_lint_json_output() {
    let output = cargo_bin_cmd!("altfix")
        .args(["lint", "--message-format", "json", "--language", "vue"])
        .write_stdin("<template>\n<img src=\"/a/hero-banner.png\">\n</template>\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let issue = &json[0];
    assert_eq!(issue["path"], "<stdin>");
    assert_eq!(issue["code"], "missing-alt");
    assert_eq!(issue["severity"], "error");
    assert_eq!(issue["location"]["row"], 2);
    assert_eq!(issue["location"]["column"], 1);
    assert_eq!(issue["suggestion"], "Hero banner");
    assert_eq!(issue["tag_name"], "img");
}

#[test]
fn test_lint_json_output_clean() {
    cargo_bin_cmd!("altfix")
        .args(["lint", "--message-format", "json"])
        .write_stdin("<img alt=\"A cat asleep\">")
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_lint_missing_path() {
    cargo_bin_cmd!("altfix")
        .args(["lint", "does/not/exist"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No such file or directory"));
}
