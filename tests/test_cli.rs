//! Tests for the command-line interface.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn openbrowser() -> Command {
    let mut cmd = Command::cargo_bin("openbrowser").unwrap();
    cmd.env_remove("OPENBROWSER_CONFIG")
        .env_remove("OPENBROWSER_LOG")
        .env_remove("OPENBROWSER_PORT");
    cmd
}

#[test]
fn test_init_then_check() {
    let tmp = TempDir::new().unwrap();
    let settings = tmp.path().join("setting.yaml");

    openbrowser()
        .args(["init", "--config"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(settings.exists());

    openbrowser()
        .args(["check", "--config"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings are valid"))
        .stdout(predicate::str::contains("youtube.com"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = TempDir::new().unwrap();
    let settings = tmp.path().join("setting.yaml");
    std::fs::write(&settings, "keep me").unwrap();

    openbrowser()
        .args(["init", "--config"])
        .arg(&settings)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(std::fs::read_to_string(&settings).unwrap(), "keep me");
}

#[test]
fn test_check_url_json() {
    let tmp = TempDir::new().unwrap();
    let settings = tmp.path().join("setting.yaml");
    std::fs::write(&settings, include_str!("fixtures/setting.yaml")).unwrap();

    openbrowser()
        .args(["check", "--json", "--url", "https://evilexample.com/", "--config"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reason\": \"unauthorized_domain\""));

    openbrowser()
        .args(["check", "--json", "--url", "https://sub.example.com/", "--config"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"verdict\": \"accepted\""));
}

#[test]
fn test_check_missing_label_fails() {
    let tmp = TempDir::new().unwrap();
    let settings = tmp.path().join("setting.yaml");
    std::fs::write(&settings, "CheckUpdate: true\nIdlePeriod: 1\nProtocol:\n").unwrap();

    openbrowser()
        .args(["check", "--config"])
        .arg(&settings)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Domain:"));
}
