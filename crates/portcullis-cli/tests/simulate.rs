//! Integration tests for the simulate command.
//!
//! Each test writes its own dataset fixtures into a temp directory and
//! drives the binary end-to-end.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const POLICIES: &str = r#"{
    "policies": [
        {
            "name": "Policy 1",
            "status": "enabled",
            "users": ["user1"],
            "conditions": {
                "time": { "start_time": "08:00", "end_time": "18:00" },
                "location": ["USA"],
                "device_health": "compliant"
            },
            "grant_controls": { "access": "grant" }
        },
        {
            "name": "Policy 2",
            "status": "enabled",
            "users": ["user2"],
            "conditions": { "location": ["Canada"] },
            "grant_controls": { "access": "grant" }
        }
    ]
}"#;

const USERS: &str = r#"{
    "users": [
        { "id": "user1", "name": "John Doe" },
        { "id": "user2", "name": "Jane Smith" }
    ]
}"#;

const CONTEXT: &str = r#"{
    "context": { "location": "USA", "device_health": "compliant" }
}"#;

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("policies.json"), POLICIES).unwrap();
    fs::write(dir.join("users.json"), USERS).unwrap();
    fs::write(dir.join("context.json"), CONTEXT).unwrap();
}

fn simulate(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("portcullis").unwrap();
    cmd.current_dir(dir).arg("simulate").args(args);
    cmd
}

// ============================================================================
// Commands That Work Without Fixtures
// ============================================================================

#[test]
fn version_command_succeeds() {
    Command::cargo_bin("portcullis")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("portcullis"));
}

#[test]
fn help_flag_shows_usage() {
    Command::cargo_bin("portcullis")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("conditional access"));
}

#[test]
fn simulate_requires_a_subject_id() {
    Command::cargo_bin("portcullis")
        .unwrap()
        .arg("simulate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

// ============================================================================
// End-To-End Decisions
// ============================================================================

#[test]
fn grants_inside_the_window() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());

    simulate(temp.path(), &["user1", "--at", "12:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Access granted to subject 'user1'."));
}

#[test]
fn denies_outside_the_window() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());

    simulate(temp.path(), &["user1", "--at", "07:59"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Access denied to subject 'user1'"));
}

#[test]
fn denies_when_no_policy_location_matches() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());

    // user2's only policy requires Canada; the context says USA.
    simulate(temp.path(), &["user2", "--at", "12:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Access denied to subject 'user2'"));
}

#[test]
fn unknown_subject_denies_with_reason() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());

    simulate(temp.path(), &["ghost", "--at", "12:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown subject"));
}

#[test]
fn trace_lists_policy_dispositions() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());

    simulate(temp.path(), &["user1", "--at", "12:00", "--trace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Policies considered:"))
        .stdout(predicate::str::contains("Policy 1"))
        .stdout(predicate::str::contains("granted"));
}

#[test]
fn explicit_dataset_paths_are_honored() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("p.json"), POLICIES).unwrap();
    fs::write(temp.path().join("u.json"), USERS).unwrap();
    fs::write(temp.path().join("c.json"), CONTEXT).unwrap();

    Command::cargo_bin("portcullis")
        .unwrap()
        .current_dir(temp.path())
        .args([
            "simulate", "user1", "-p", "p.json", "-u", "u.json", "-c", "c.json", "--at", "12:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Access granted"));
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn missing_dataset_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    // No fixtures written.

    simulate(temp.path(), &["user1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn invalid_policy_json_is_an_error_not_a_deny() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());
    fs::write(temp.path().join("policies.json"), "{ broken").unwrap();

    simulate(temp.path(), &["user1", "--at", "12:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("policy"));
}

#[test]
fn malformed_at_time_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_fixtures(temp.path());

    simulate(temp.path(), &["user1", "--at", "noonish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected HH:MM"));
}
