use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn server() -> Command {
    Command::cargo_bin("tally_server").expect("binary builds")
}

#[test]
fn version_flag_prints_build_info() {
    server()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_flag_prints_usage() {
    server()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: tally_server"));
}

#[test]
fn unknown_argument_fails() {
    server()
        .arg("--bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized argument"));
}

#[test]
fn malformed_config_fails_before_binding() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ nope").expect("write config");

    server()
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: loading"));
}
