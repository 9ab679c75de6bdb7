//! End-to-end tests for the `ferret signatures` command.

#![expect(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use expect/unwrap for clearer failure messages"
)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ferret() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ferret"))
}

#[test]
fn lists_the_embedded_ruleset() {
    ferret()
        .args(["signatures"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aws_access_key_id"))
        .stdout(predicate::str::contains("github_pat"));
}

#[test]
fn verbose_shows_regexes() {
    ferret()
        .args(["signatures", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AKIA"));
}

#[test]
fn match_level_filters_low_confidence_rules() {
    let low = ferret().args(["signatures"]).output().expect("failed to run");
    let high = ferret()
        .args(["signatures", "--match-level", "5"])
        .output()
        .expect("failed to run");

    let count = |out: &[u8]| String::from_utf8_lossy(out).lines().count();
    assert!(count(&high.stdout) < count(&low.stdout));
}

#[test]
fn custom_rule_file_replaces_the_embedded_set() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.toml");
    fs::write(
        &rules,
        r#"
[meta]
date = "2026-01-01"
time = "00:00"
version = "test"

[[patterns]]
id = "custom_token"
description = "Custom token"
enable = 1
entropy = 0.0
match = 'CUSTOM_[A-Z0-9]{8}'
confidence = 5
part = "content"
"#,
    )
    .unwrap();

    ferret()
        .args(["signatures", "--rules", rules.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom_token"))
        .stdout(predicate::str::contains("aws_access_key_id").not());
}

#[test]
fn malformed_rule_file_is_a_fatal_error() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.toml");
    fs::write(&rules, "not valid toml [[[").unwrap();

    ferret()
        .args(["signatures", "--rules", rules.to_str().unwrap()])
        .assert()
        .code(2);
}
