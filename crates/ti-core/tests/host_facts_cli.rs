//! End-to-end runs of the `ti-host-facts` binary.
//!
//! Every run gets its own cache directory and a scrubbed logging and flag
//! environment, so the host's variables cannot leak in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use ti_core::args::DEFAULT_ARGS_ENV;
use ti_core::logging::config::{FILTER_ENV, FORMAT_ENV, LEVEL_ENV};

const CACHE_FILE: &str = "com.example.host-facts.json";

fn host_facts(cache_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ti-host-facts").expect("ti-host-facts binary should exist");
    cmd.env("TI_CACHE_DIR", cache_dir.path());
    for var in [LEVEL_ENV, FILTER_ENV, FORMAT_ENV].into_iter().chain(DEFAULT_ARGS_ENV) {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn publishes_one_compact_document() {
    let dir = TempDir::new().unwrap();
    let output = host_facts(&dir).arg("--inventory").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    let doc: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(doc["name"], "com.example.host-facts");
    assert_eq!(doc["inventory"]["host"]["os"], std::env::consts::OS);
    assert_eq!(doc["metrics"], serde_json::json!([]));
}

#[test]
fn verbose_shows_construction_diagnostics() {
    let dir = TempDir::new().unwrap();
    host_facts(&dir)
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains("integration ready"));
}

#[test]
fn quiet_by_default() {
    let dir = TempDir::new().unwrap();
    host_facts(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("integration ready").not());
}

#[test]
fn verbose_env_var_enables_debug() {
    let dir = TempDir::new().unwrap();
    host_facts(&dir)
        .env("VERBOSE", "true")
        .assert()
        .success()
        .stderr(predicate::str::contains("integration ready"));
}

#[test]
fn pretty_env_var_selects_indented_output() {
    let dir = TempDir::new().unwrap();
    host_facts(&dir)
        .env("PRETTY", "true")
        .arg("--inventory")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n\t\"name\""));
}

#[test]
fn ti_log_sets_level() {
    let dir = TempDir::new().unwrap();
    host_facts(&dir)
        .env("TI_LOG", "debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("integration ready"));
}

#[test]
fn verbose_flag_beats_ti_log() {
    let dir = TempDir::new().unwrap();
    host_facts(&dir)
        .env("TI_LOG", "error")
        .arg("--verbose")
        .assert()
        .success()
        .stderr(predicate::str::contains("integration ready"));
}

#[test]
fn ti_log_format_selects_json_lines() {
    let dir = TempDir::new().unwrap();
    host_facts(&dir)
        .env("TI_LOG_FORMAT", "jsonl")
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains(r#""message":"integration ready""#));
}

#[test]
fn corrupted_cache_is_reported_before_exit() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CACHE_FILE), b"{ not json").unwrap();

    host_facts(&dir)
        .assert()
        .code(11)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cache unusable"));
}

#[test]
fn unknown_flag_fails_without_output() {
    let dir = TempDir::new().unwrap();
    host_facts(&dir)
        .arg("--bogus")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--bogus"));
}
