//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `cddl` binary and verify exit codes,
//! stdout content, and stderr content. Fixture files are written to a
//! temp dir per test.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn cddl() -> Command {
    cargo_bin_cmd!("cddl")
}

/// Helper: write `content` to `name` inside `dir` and return the path.
fn fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    cddl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("CDDL schema language toolchain"));
}

#[test]
fn version_exits_0() {
    cddl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cddl"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    cddl().assert().failure().code(2);
}

// ──────────────────────────────────────────────
// 2. Check subcommand
// ──────────────────────────────────────────────

#[test]
fn check_clean_schema_exits_0() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "person.cddl", "person = {name: tstr, ? age: uint}\n");
    cddl()
        .arg("check")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 1 rule(s)"));
}

#[test]
fn check_reports_line_and_column_per_error() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "broken.cddl", "a = tstr\nb = =\n");
    cddl()
        .arg("check")
        .arg(&schema)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(":2:5:"))
        .stderr(predicate::str::contains("expected a type"));
}

#[test]
fn check_json_output_reports_structured_errors() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "broken.cddl", "a = ");
    cddl()
        .args(["--output", "json", "check"])
        .arg(&schema)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"valid\": false"))
        .stderr(predicate::str::contains("\"line\": 1"));
}

#[test]
fn check_missing_file_exits_1() {
    cddl()
        .args(["check", "no_such_schema.cddl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn quiet_suppresses_success_output() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "s.cddl", "a = tstr\n");
    cddl()
        .arg("--quiet")
        .arg("check")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 3. Validate subcommand
// ──────────────────────────────────────────────

#[test]
fn validate_matching_document_exits_0() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "person.cddl", "person = {name: tstr, ? age: uint}\n");
    let doc = fixture(&dir, "ok.json", r#"{"name": "alice", "age": 30}"#);
    cddl()
        .arg("validate")
        .arg(&schema)
        .arg("--json")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn validate_mismatching_document_exits_1() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "person.cddl", "person = {name: tstr, ? age: uint}\n");
    let doc = fixture(&dir, "bad.json", r#"{"name": 5}"#);
    cddl()
        .arg("validate")
        .arg(&schema)
        .arg("--json")
        .arg(&doc)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid"))
        .stderr(predicate::str::contains("  - "));
}

#[test]
fn validate_broken_schema_is_a_schema_error() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "broken.cddl", "a = \n");
    let doc = fixture(&dir, "doc.json", "null");
    cddl()
        .arg("validate")
        .arg(&schema)
        .arg("--json")
        .arg(&doc)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("schema error"));
}

#[test]
fn validate_malformed_json_document_exits_1() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "s.cddl", "a = tstr\n");
    let doc = fixture(&dir, "bad.json", "{not json");
    cddl()
        .arg("validate")
        .arg(&schema)
        .arg("--json")
        .arg(&doc)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn validate_json_output_lists_errors() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "s.cddl", "count = uint\n");
    let doc = fixture(&dir, "doc.json", "\"ten\"");
    cddl()
        .args(["--output", "json", "validate"])
        .arg(&schema)
        .arg("--json")
        .arg(&doc)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"valid\": false"))
        .stderr(predicate::str::contains("\"errors\""));
}

#[test]
fn validate_missing_json_flag_is_a_usage_error() {
    let dir = TempDir::new().expect("temp dir");
    let schema = fixture(&dir, "s.cddl", "a = tstr\n");
    cddl()
        .arg("validate")
        .arg(&schema)
        .assert()
        .failure()
        .code(2);
}
