//! CLI integration tests
//!
//! These tests run the `hookfinder` binary against zip archives built on the fly:
//! - Hook discovery and known-hook filtering
//! - Output formats
//! - Run-level failures and exit codes

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const GREET: &str = "<?php\nfunction greet($name) { return apply_filters('custom_greeting', $name); }\n";

/// Helper to create a plugin zip archive
fn create_archive(dir: &TempDir, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.path().join("plugin.zip");
    let file = File::create(&path).expect("Failed to create archive");
    let mut writer = zip::ZipWriter::new(file);

    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start entry");
        writer
            .write_all(content.as_bytes())
            .expect("Failed to write entry");
    }

    writer.finish().expect("Failed to finish archive");
    path
}

fn hookfinder(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hookfinder").expect("binary should build");
    cmd.current_dir(dir).env_remove("HOOKFINDER_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    hookfinder(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn test_scan_reports_custom_hook() {
    let dir = TempDir::new().unwrap();
    let archive = create_archive(&dir, &[("greet/greet.php", GREET)]);

    hookfinder(dir.path())
        .arg("scan")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom_greeting"))
        .stdout(predicate::str::contains("Function: greet"))
        .stdout(predicate::str::contains("greet/greet.php (line 2)"));
}

#[test]
fn test_known_file_filters_hook() {
    let dir = TempDir::new().unwrap();
    let archive = create_archive(&dir, &[("greet.php", GREET)]);
    let known = dir.path().join("known.txt");
    fs::write(&known, "custom_greeting\n").unwrap();

    hookfinder(dir.path())
        .arg("scan")
        .arg(&archive)
        .arg("--known")
        .arg(&known)
        .assert()
        .success()
        .stdout(predicate::str::contains("No custom hooks found"));
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let archive = create_archive(
        &dir,
        &[
            ("p/main.php", "<?php\n$v = apply_filters('top_level', $v);\n$w = apply_filters($dynamic, $w);\n"),
            ("p/readme.txt", "apply_filters('not_source', 1);"),
        ],
    );

    let output = hookfinder(dir.path())
        .args(["-o", "json", "scan"])
        .arg(&archive)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = value["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["hook_name"], "top_level");
    assert_eq!(records[0]["line_number"], 2);
    assert!(records[0]["function"].is_null());
    assert_eq!(value["stats"]["files_rejected"], 1);
}

#[test]
fn test_output_file() {
    let dir = TempDir::new().unwrap();
    let archive = create_archive(&dir, &[("greet.php", GREET)]);
    let report = dir.path().join("report.md");

    hookfinder(dir.path())
        .args(["-o", "markdown", "scan"])
        .arg(&archive)
        .arg("--output")
        .arg(&report)
        .assert()
        .success();

    let content = fs::read_to_string(&report).unwrap();
    assert!(content.contains("| `custom_greeting` | greet | greet.php | 2 |"));
}

#[test]
fn test_archive_without_source_files_fails() {
    let dir = TempDir::new().unwrap();
    let archive = create_archive(&dir, &[("readme.txt", "hello"), ("logo.svg", "<svg/>")]);

    hookfinder(dir.path())
        .arg("scan")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no source files"));
}

#[test]
fn test_invalid_archive_fails() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("plugin.zip");
    fs::write(&archive, "definitely not a zip").unwrap();

    hookfinder(dir.path())
        .arg("scan")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid archive"));
}

#[test]
fn test_config_file_applies() {
    let dir = TempDir::new().unwrap();
    let archive = create_archive(&dir, &[("greet.php", GREET)]);
    fs::write(
        dir.path().join("hookfinder.toml"),
        "known_hooks = [\"custom_greeting\"]\n",
    )
    .unwrap();

    hookfinder(dir.path())
        .arg("scan")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("No custom hooks found"));
}

#[test]
fn test_config_init_writes_defaults() {
    let dir = TempDir::new().unwrap();

    hookfinder(dir.path())
        .args(["config", "--init"])
        .assert()
        .success();

    let written = fs::read_to_string(dir.path().join("hookfinder.toml")).unwrap();
    assert!(written.contains("apply_filters"));

    hookfinder(dir.path())
        .args(["config", "--init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_known_command_lists_core_hooks() {
    let dir = TempDir::new().unwrap();

    hookfinder(dir.path())
        .args(["known", "--search", "the_content"])
        .assert()
        .success()
        .stdout(predicate::str::contains("the_content ($content)"));
}
