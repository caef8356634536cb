#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_extracts_from_stdin() {
    let mut cmd = Command::cargo_bin("stringsift").unwrap();
    cmd.write_stdin(&b"\x00\x01\x02hello from the binary\x03\x04tiny\x7f\x7f"[..])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello from the binary"));
}

#[test]
fn test_minimum_length_filter() {
    let mut cmd = Command::cargo_bin("stringsift").unwrap();
    cmd.arg("-l")
        .arg("8")
        .write_stdin(&b"\x00shorty\x00a much longer string\x00"[..])
        .assert()
        .success()
        .stdout(predicate::str::contains("a much longer string"))
        .stdout(predicate::str::contains("shorty").not());
}

#[test]
fn test_offset_column() {
    let mut cmd = Command::cargo_bin("stringsift").unwrap();
    cmd.arg("-o")
        .arg("x")
        .write_stdin(&b"leading junk\x01\x02\x03\x04target words"[..])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"[0-9A-F]{8} ").unwrap());
}

#[test]
fn test_list_encodings() {
    let mut cmd = Command::cargo_bin("stringsift").unwrap();
    cmd.arg("--encoding")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("UTF-8"))
        .stdout(predicate::str::contains("Big5"));
}

#[test]
fn test_unknown_encoding_fails() {
    let mut cmd = Command::cargo_bin("stringsift").unwrap();
    cmd.arg("--encoding")
        .arg("KOI9")
        .write_stdin(&b"data"[..])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown encoding"));
}

#[test]
fn test_json_output() {
    let mut cmd = Command::cargo_bin("stringsift").unwrap();
    cmd.arg("--json")
        .arg("--encoding")
        .arg("ASCII")
        .write_stdin(&b"\x00json payload string\x00"[..])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"encoding\":\"ASCII\""))
        .stdout(predicate::str::contains("json payload string"));
}
