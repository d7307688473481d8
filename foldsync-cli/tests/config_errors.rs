//! Fatal configuration errors must be rejected before the scheduler runs.
//!
//! Only the error paths are exercised here: on a valid configuration the
//! binary runs until interrupted.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn foldsync() -> Command {
    Command::cargo_bin("foldsync").expect("binary")
}

#[test]
fn wrong_argument_count_prints_usage() {
    foldsync()
        .arg("/tmp/only-one-arg")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn zero_interval_is_rejected() {
    let tmp = TempDir::new().expect("tempdir");
    let source = tmp.path().join("source");
    std::fs::create_dir_all(&source).expect("mkdir");

    foldsync()
        .arg(&source)
        .arg(tmp.path().join("replica"))
        .arg("0")
        .arg(tmp.path().join("sync.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value '0'"));
}

#[test]
fn non_integer_interval_is_rejected() {
    let tmp = TempDir::new().expect("tempdir");
    let source = tmp.path().join("source");
    std::fs::create_dir_all(&source).expect("mkdir");

    foldsync()
        .arg(&source)
        .arg(tmp.path().join("replica"))
        .arg("soon")
        .arg(tmp.path().join("sync.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'soon'"));
}

#[test]
fn missing_source_directory_is_fatal() {
    let tmp = TempDir::new().expect("tempdir");

    foldsync()
        .arg(tmp.path().join("no-such-source"))
        .arg(tmp.path().join("replica"))
        .arg("5")
        .arg(tmp.path().join("sync.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
