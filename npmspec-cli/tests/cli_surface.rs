use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn npmspec_cmd(home: &Path, workdir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("npmspec"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("RUST_LOG")
        .current_dir(workdir);
    cmd
}

#[test]
fn help_lists_both_subcommands() {
    let home = TempDir::new().expect("home");
    npmspec_cmd(home.path(), home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("genspec"))
        .stdout(contains("genpkg"))
        .stdout(contains("--dry"));
}

#[test]
fn genpkg_help_lists_update_and_force() {
    let home = TempDir::new().expect("home");
    npmspec_cmd(home.path(), home.path())
        .args(["genpkg", "--help"])
        .assert()
        .success()
        .stdout(contains("--update"))
        .stdout(contains("--force"));
}

#[test]
fn package_name_is_required() {
    let home = TempDir::new().expect("home");
    npmspec_cmd(home.path(), home.path())
        .arg("genpkg")
        .assert()
        .failure()
        .stderr(contains("<PACKAGE>"));
}

#[test]
fn broken_config_fails_before_any_request() {
    let home = TempDir::new().expect("home");
    let work = TempDir::new().expect("work");
    fs::create_dir_all(home.path().join(".npmspec")).unwrap();
    fs::write(home.path().join(".npmspec/config.yaml"), "registry_url: [unterminated\n").unwrap();

    npmspec_cmd(home.path(), work.path())
        .args(["genpkg", "left-pad"])
        .assert()
        .failure()
        .stderr(contains("config.yaml"));

    assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
}

#[test]
fn unreachable_registry_fails_and_writes_nothing() {
    let home = TempDir::new().expect("home");
    let work = TempDir::new().expect("work");

    npmspec_cmd(home.path(), work.path())
        .args(["--registry", "http://127.0.0.1:1", "genpkg", "left-pad", "--force"])
        .assert()
        .failure()
        .stderr(contains("genpkg failed for 'left-pad'"));

    assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    assert!(!home.path().join(".npm/registry.npmjs.org/left-pad").exists());
}
