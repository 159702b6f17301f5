//! CLI end-to-end tests
//!
//! Tests for the playdeck command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the playdeck binary
#[allow(deprecated)]
fn playdeck_cmd() -> Command {
    Command::cargo_bin("playdeck").unwrap()
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("playdeck.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = playdeck_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = playdeck_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("playdeck"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = playdeck_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("playdeck"));
}

#[test]
fn test_cli_check_players_command() {
    let mut cmd = playdeck_cmd();
    cmd.arg("check-players")
        .assert()
        .success()
        .stdout(predicate::str::contains("players"));
}

#[test]
fn test_cli_validate_valid_config() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        r#"
[platform]
granted = ["storage.read"]
prompt = "deny"
"#,
    );

    let mut cmd = playdeck_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_cli_validate_rejects_contradictory_policy() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        r#"
[platform]
granted = ["storage.read"]
revoked = ["storage.read"]
"#,
    );

    let mut cmd = playdeck_cmd();
    cmd.args(["validate", config_file.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn test_cli_caps_grant_policy() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        r#"
[platform]
prompt = "grant"
"#,
    );

    let mut cmd = playdeck_cmd();
    cmd.args([
        "caps",
        "--config",
        config_file.to_str().unwrap(),
        "storage.read",
        "storage.write",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("All capabilities granted."));
}

#[test]
fn test_cli_caps_deny_policy_reports_denials() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        r#"
[platform]
prompt = "deny"
"#,
    );

    // Denial is an outcome, not an error; the command still succeeds.
    let mut cmd = playdeck_cmd();
    cmd.args([
        "caps",
        "--config",
        config_file.to_str().unwrap(),
        "storage.read",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Some capabilities were denied."));
}

#[test]
fn test_cli_caps_json_output() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        r#"
[platform]
granted = ["storage.read"]
"#,
    );

    let mut cmd = playdeck_cmd();
    cmd.args([
        "caps",
        "--json",
        "--config",
        config_file.to_str().unwrap(),
        "storage.read",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"granted\": true"));
}

#[test]
fn test_cli_caps_rationale_query() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        r#"
[platform]
rationale = ["storage.read"]
"#,
    );

    let mut cmd = playdeck_cmd();
    cmd.args([
        "caps",
        "--rationale",
        "--config",
        config_file.to_str().unwrap(),
        "storage.read",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Show rationale first: true"));
}

#[test]
fn test_cli_caps_requires_names() {
    let mut cmd = playdeck_cmd();
    cmd.arg("caps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_stage_and_play_flow() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("source.mp4");
    fs::write(&source, vec![1u8; 8192]).unwrap();
    let library_dir = temp.path().join("library");

    let config_file = write_config(
        temp.path(),
        &format!(
            r#"
[library]
dir = "{}"
source_clip = "{}"
staged_name = "music.mp4"

[platform]
prompt = "grant"
"#,
            library_dir.display(),
            source.display()
        ),
    );

    let mut cmd = playdeck_cmd();
    cmd.args(["stage", "--config", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Staged demo clip"));

    // A second stage without --force leaves the clip alone.
    let mut cmd = playdeck_cmd();
    cmd.args(["stage", "--config", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("already staged"));

    let mut cmd = playdeck_cmd();
    cmd.args(["play", "--config", config_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Playback complete"));
}

#[test]
fn test_cli_stage_denied_capability_fails() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("source.mp4");
    fs::write(&source, b"clip").unwrap();

    let config_file = write_config(
        temp.path(),
        &format!(
            r#"
[library]
dir = "{}"
source_clip = "{}"

[platform]
prompt = "deny"
"#,
            temp.path().join("library").display(),
            source.display()
        ),
    );

    let mut cmd = playdeck_cmd();
    cmd.args(["stage", "--config", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("denied"));
}

#[test]
fn test_cli_play_without_staged_clip_fails() {
    let temp = tempdir().unwrap();
    let config_file = write_config(
        temp.path(),
        &format!(
            r#"
[library]
dir = "{}"
"#,
            temp.path().join("library").display()
        ),
    );

    let mut cmd = playdeck_cmd();
    cmd.args(["play", "--config", config_file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stage"));
}
