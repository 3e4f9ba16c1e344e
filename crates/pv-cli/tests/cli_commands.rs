//! Integration tests for the `pv` command-line tool.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SMITHY: &str = r#"-- A short exchange at the forge
conversation "The Blacksmith"
description "Brom works the forge at the edge of town."

entry node greeting {
    speaker "Brom"
    says "Well met. Need something mended?"
    choice "Who are you?" -> about
    choice "Not today."
}

node about {
    speaker "Brom"
    says "Brom, smith of this village."
    choice "Back to business." -> greeting
}

layout {
    greeting -> about
    about at 120 40
}
"#;

/// Create a temp directory holding `smithy.talk`.
fn test_conversation() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("smithy.talk");
    fs::write(&path, SMITHY).unwrap();
    (dir, path)
}

fn pv() -> Command {
    Command::cargo_bin("pv").unwrap()
}

// ---------------------------------------------------------------------------
// new
// ---------------------------------------------------------------------------

#[test]
fn new_creates_talk_file() {
    let dir = TempDir::new().unwrap();
    pv().args(["new", "Gate Guard"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created conversation 'Gate Guard'"));

    let content = fs::read_to_string(dir.path().join("gate_guard.talk")).unwrap();
    assert!(content.contains("conversation \"Gate Guard\""));
    assert!(content.contains("entry node greeting"));
}

#[test]
fn new_output_passes_check() {
    let dir = TempDir::new().unwrap();
    pv().args(["new", "Gate Guard", "-f", "gate.talk"])
        .current_dir(dir.path())
        .assert()
        .success();

    pv().args(["check", "gate.talk"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn new_refuses_to_overwrite() {
    let (dir, _) = test_conversation();
    pv().args(["new", "Smithy", "-f", "smithy.talk"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let content = fs::read_to_string(dir.path().join("smithy.talk")).unwrap();
    assert_eq!(content, SMITHY);
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_passes_valid_conversation() {
    let (_dir, path) = test_conversation();
    pv().args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("All checks passed for 'The Blacksmith'")
                .and(predicate::str::contains("2 nodes, 3 choices")),
        );
}

#[test]
fn check_reports_dangling_reference() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.talk");
    fs::write(
        &path,
        "entry node a {\n    says \"hi\"\n    choice \"go\" -> nowhere\n}\n",
    )
    .unwrap();

    pv().args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere").and(predicate::str::contains("1 error")));
}

#[test]
fn check_reports_syntax_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.talk");
    fs::write(&path, "this is not valid { { {").unwrap();

    pv().args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("check failed"));
}

#[test]
fn check_warns_about_unreachable_nodes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orphan.talk");
    fs::write(
        &path,
        format!("{SMITHY}\nnode orphan {{\n    says \"Nobody hears me.\"\n}}\n"),
    )
    .unwrap();

    pv().args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("never reached"));
}

#[test]
fn check_json_conversation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("two.json");
    fs::write(
        &path,
        r#"{"nodes": [{"id": 1, "entry": true, "text": "Hi.", "choices": [{"text": "Hi.", "target": 2}]},
                      {"id": 2, "text": "Bye."}]}"#,
    )
    .unwrap();

    pv().args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed for 'two'"));
}

#[test]
fn check_json_missing_entry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("none.json");
    fs::write(&path, r#"{"nodes": [{"id": "a", "text": "Hi."}]}"#).unwrap();

    pv().args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry"));
}

#[test]
fn check_accepts_byte_order_mark() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bom.talk");
    fs::write(&path, format!("\u{feff}{SMITHY}")).unwrap();

    pv().args(["check", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn check_rejects_invalid_utf8() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("binary.talk");
    fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

    pv().args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn check_rejects_overflowing_position() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("far.json");
    fs::write(
        &path,
        r#"{"nodes": [{"id": "a", "entry": true, "text": "hi"}],
            "layout": {"positions": {"a": [1e39, 0]}}}"#,
    )
    .unwrap();

    pv().args(["check", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn check_missing_file() {
    pv().args(["check", "does-not-exist.talk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn show_lists_nodes() {
    let (_dir, path) = test_conversation();
    pv().args(["show", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("The Blacksmith")
                .and(predicate::str::contains("greeting (entry)"))
                .and(predicate::str::contains("-> about"))
                .and(predicate::str::contains("2 nodes, 3 choices")),
        );
}

#[test]
fn show_with_layout() {
    let (_dir, path) = test_conversation();
    pv().args(["show", "--layout", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("about at (120, 40)"));
}

// ---------------------------------------------------------------------------
// convert
// ---------------------------------------------------------------------------

#[test]
fn convert_to_json_stdout() {
    let (_dir, path) = test_conversation();
    let output = pv()
        .args(["convert", path.to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["title"], "The Blacksmith");
    assert_eq!(json["nodes"][0]["id"], "greeting");
    assert_eq!(json["nodes"][0]["entry"], true);
    assert_eq!(json["nodes"][1]["choices"][0]["target"], "greeting");
}

#[test]
fn convert_round_trips_through_files() {
    let (dir, path) = test_conversation();
    let json_path = dir.path().join("smithy.json");
    let talk_path = dir.path().join("again.talk");

    pv().args([
        "convert",
        path.to_str().unwrap(),
        "-f",
        "json",
        "-o",
        json_path.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Converted"));

    pv().args([
        "convert",
        json_path.to_str().unwrap(),
        "-f",
        "talk",
        "-o",
        talk_path.to_str().unwrap(),
    ])
    .assert()
    .success();

    let again = fs::read_to_string(&talk_path).unwrap();
    assert!(again.contains("entry node greeting"));
    assert!(again.contains("choice \"Who are you?\" -> about"));
    assert!(again.contains("about at 120 40"));
}

#[test]
fn convert_unsupported_format() {
    let (_dir, path) = test_conversation();
    pv().args(["convert", path.to_str().unwrap(), "-f", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported format"));
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn play_scripted_conversation() {
    let (_dir, path) = test_conversation();
    pv().args(["play", "--script", path.to_str().unwrap()])
        .write_stdin("1\n1\n2\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Brom, smith of this village.")
                .and(predicate::str::contains("Not today."))
                .and(predicate::str::contains("conversation over: listener left")),
        );
}

#[test]
fn play_rejects_unknown_reply() {
    let (_dir, path) = test_conversation();
    pv().args(["play", "--script", path.to_str().unwrap()])
        .write_stdin("7\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No such reply. Pick 1 to 2."));
}

#[test]
fn play_interactive_until_input_ends() {
    let (_dir, path) = test_conversation();
    pv().args(["play", path.to_str().unwrap()])
        .write_stdin("\n1\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Brom, smith of this village.")
                .and(predicate::str::contains("conversation over: aborted")),
        );
}

#[test]
fn play_fails_on_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.talk");
    fs::write(&path, "node a {\n    says \"no entry\"\n}\n").unwrap();

    pv().args(["play", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
