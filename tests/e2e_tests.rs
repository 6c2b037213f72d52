//! End-to-end tests for the CLI.
//!
//! Each test:
//! 1. Creates a temp directory
//! 2. Copies fixture files into it
//! 3. Runs docmark commands against it
//! 4. Asserts exit code + expected output

// Allow deprecated cargo_bin usage until assert_cmd updates API
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Manifest directory (project root).
fn manifest_dir() -> &'static str {
    env!("CARGO_MANIFEST_DIR")
}

/// Copy the text fixture into a temp directory.
fn setup_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    let fixture = format!("{}/fixtures/documents/sample.txt", manifest_dir());
    fs::copy(&fixture, dir.path().join("sample.txt")).expect("copy fixture");
    dir
}

/// Build a command pointing at the tempdir.
fn docmark(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docmark").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

/// Convert the fixture and return the new document id.
fn convert_fixture(dir: &TempDir) -> String {
    let output = docmark(dir)
        .arg("convert")
        .arg("sample.txt")
        .arg("--quiet")
        .output()
        .expect("run convert");
    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary json");
    summary["id"].as_str().expect("id field").to_string()
}

#[test]
fn e2e_convert_reports_sections_and_persists_history() {
    let dir = setup_dir();
    docmark(&dir)
        .arg("convert")
        .arg("sample.txt")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\":\"sample.txt\""))
        .stdout(predicate::str::contains("\"sections\":3"));

    assert!(dir.path().join(".docmark/history.json").exists());
}

#[test]
fn e2e_convert_emits_progress_on_stderr() {
    let dir = setup_dir();
    docmark(&dir)
        .arg("convert")
        .arg("sample.txt")
        .assert()
        .success()
        .stderr(predicate::str::contains("[100%] Parsing complete"));
}

#[test]
fn e2e_convert_rejects_unsupported_extension() {
    let dir = setup_dir();
    fs::write(dir.path().join("archive.zip"), b"PK").unwrap();
    docmark(&dir)
        .arg("convert")
        .arg("archive.zip")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type: zip"));
}

#[test]
fn e2e_convert_no_history_skips_store() {
    let dir = setup_dir();
    docmark(&dir)
        .arg("convert")
        .arg("sample.txt")
        .arg("--no-history")
        .arg("--quiet")
        .assert()
        .success();
    assert!(!dir.path().join(".docmark/history.json").exists());
}

#[test]
fn e2e_history_lists_converted_documents() {
    let dir = setup_dir();
    convert_fixture(&dir);
    docmark(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"))
        .stdout(predicate::str::contains("sample.txt"));
}

#[test]
fn e2e_show_prints_markdown_body() {
    let dir = setup_dir();
    let id = convert_fixture(&dir);
    docmark(&dir)
        .arg("show")
        .arg(&id)
        .arg("--markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Quarterly Report"));
}

#[test]
fn e2e_show_rejects_unknown_id() {
    let dir = setup_dir();
    convert_fixture(&dir);
    docmark(&dir)
        .arg("show")
        .arg("00000000-0000-0000-0000-000000000000")
        .assert()
        .failure()
        .stderr(predicate::str::contains("document not found"));
}

#[test]
fn e2e_search_matches_content() {
    let dir = setup_dir();
    convert_fixture(&dir);
    docmark(&dir)
        .arg("search")
        .arg("SUPPLY CHAIN")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"));
    docmark(&dir)
        .arg("search")
        .arg("no such phrase")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":0"));
}

#[test]
fn e2e_export_writes_markdown_file() {
    let dir = setup_dir();
    let id = convert_fixture(&dir);
    docmark(&dir)
        .arg("export")
        .arg(&id)
        .arg("--output")
        .arg("out.md")
        .assert()
        .success()
        .stdout(predicate::str::contains("out.md"));

    let exported = fs::read_to_string(dir.path().join("out.md")).unwrap();
    assert!(exported.starts_with("---\ntitle: sample.txt\n"));
    assert!(exported.contains("# Quarterly Report"));
}

#[test]
fn e2e_remove_and_clear() {
    let dir = setup_dir();
    let id = convert_fixture(&dir);
    docmark(&dir)
        .arg("remove")
        .arg(&id)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\":true"));
    docmark(&dir)
        .arg("remove")
        .arg(&id)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\":false"));

    convert_fixture(&dir);
    docmark(&dir)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cleared\":true"));
    docmark(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":0"));
}

#[test]
fn e2e_sections_prints_outline_without_storing() {
    let dir = setup_dir();
    docmark(&dir)
        .arg("sections")
        .arg("sample.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":3"))
        .stdout(predicate::str::contains("Quarterly Report"))
        .stdout(predicate::str::contains("Highlights"));
    assert!(!dir.path().join(".docmark/history.json").exists());
}

#[test]
fn e2e_supported_lists_formats() {
    let dir = setup_dir();
    docmark(&dir)
        .arg("supported")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"format\":\"pdf\""))
        .stdout(predicate::str::contains("\"jpeg\""));
}
