//! Integration tests for the ach-engine CLI.
//!
//! These tests write ACH files to temporary paths, run the actual binary and
//! check the CSV summary it prints.

mod common;

use ach_engine::writer::write_string;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Write `contents` to a fresh temporary file
fn ach_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Run the binary with the given input file and return stdout
fn run_engine(input: &NamedTempFile) -> String {
    let mut cmd = Command::cargo_bin("ach-engine").unwrap();
    let assert = cmd.arg(input.path()).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_summary_for_valid_file() {
    let input = ach_file(&write_string(&common::mock_file()).unwrap());
    let output = run_engine(&input);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "batch,sec,service_class,entries,addenda,debit,credit",
            "1,MTE,225,1,1,100.00,0.00",
            "2,PPD,200,2,0,0.00,200.00",
        ]
    );
}

#[test]
fn test_crlf_input_accepted() {
    let text = write_string(&common::mock_file()).unwrap().replace('\n', "\r\n");
    let output = run_engine(&ach_file(&text));
    assert!(output.contains("1,MTE,225,1,1,100.00,0.00"));
}

#[test]
fn test_invalid_file_reports_line() {
    let text = write_string(&common::mock_file()).unwrap();
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    lines[2].replace_range(29..39, "0000000000");
    let input = ach_file(&lines.join("\n"));

    let mut cmd = Command::cargo_bin("ach-engine").unwrap();
    cmd.arg(input.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("line 5").and(predicate::str::contains("Amount")));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("ach-engine").unwrap();
    cmd.arg("nonexistent.ach")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("ach-engine").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_empty_file_error() {
    let input = ach_file("");
    let mut cmd = Command::cargo_bin("ach-engine").unwrap();
    cmd.arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("FileHeader"));
}

#[test]
fn test_dollar_amounts_have_two_places() {
    let output = run_engine(&ach_file(&write_string(&common::mock_file()).unwrap()));
    for line in output.lines().skip(1) {
        let parts: Vec<&str> = line.split(',').collect();
        for part in &parts[5..7] {
            let dot_pos = part.find('.').unwrap();
            assert_eq!(part.len() - dot_pos - 1, 2, "Expected 2 decimal places in: {}", part);
        }
    }
}
