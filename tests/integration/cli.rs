//! Binary-level smoke tests for the `conhub` CLI.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::LibraryFixture;

fn conhub() -> Command {
    Command::cargo_bin("conhub").expect("conhub binary builds")
}

#[test]
fn list_shows_eager_and_deferred_phases() {
    let lib = LibraryFixture::new();
    lib.file("plain.yaml", "connector:\n  displayName: Plain\n");
    lib.file(
        "templ.yaml",
        "connector:\n  displayName: Templated\nsource: '${var::x}'\n",
    );

    conhub()
        .arg("list")
        .arg(lib.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("plain"))
        .stdout(predicate::str::contains("eager"))
        .stdout(predicate::str::contains("templ"))
        .stdout(predicate::str::contains("deferred"));
}

#[test]
fn list_json_is_parseable() {
    let lib = LibraryFixture::new();
    lib.file("plain.yaml", "connector:\n  displayName: Plain\n");

    let output = conhub()
        .arg("list")
        .arg(lib.path())
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(parsed[0]["id"], "plain");
    assert_eq!(parsed[0]["deferred"], false);
}

#[test]
fn resolve_applies_overrides_from_a_config_file() {
    let lib = LibraryFixture::new();
    lib.file(
        "disk.yaml",
        r"
connector:
  displayName: Disk
  variables:
    unit:
      defaultValue: GB
monitors:
  disk:
    collect:
      sources:
        usage:
          commandLine: 'df -B${var::unit}'
",
    );
    let config = lib.file(
        "overrides.yaml",
        r"
connectors:
  disk-mb:
    uses: disk
    variables:
      unit: MB
    force: true
",
    );

    conhub()
        .arg("resolve")
        .arg(lib.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("disk-mb"))
        .stdout(predicate::str::contains("+disk-mb"));
}

#[test]
fn resolve_rejects_a_missing_directory() {
    conhub()
        .arg("resolve")
        .arg("/nonexistent/library")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}
