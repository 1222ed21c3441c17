use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCRIPTS: [&str; 3] = ["build.sh", "makeProject.sh", "arcApp.sh"];

/// A scripts directory where every script appends its own name to calls.log
fn scripts_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Creating temp dir failed");
    for script in SCRIPTS {
        fs::write(
            dir.path().join(script),
            format!("echo {} >> calls.log\n", script),
        )
        .expect("Writing script failed");
    }
    dir
}

fn calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn spay_build(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spay-build").expect("Binary exists");
    cmd.current_dir(dir).env_remove("SPAY_SCRIPTS_DIR");
    cmd
}

#[test]
fn make_sdk_runs_only_build_script() {
    let dir = scripts_dir();

    spay_build(dir.path())
        .arg("make_sdk")
        .assert()
        .success()
        .stdout(predicate::str::contains("Run build.sh"));

    assert_eq!(calls(dir.path()), vec!["build.sh"]);
}

#[test]
fn make_project_and_make_ipa_run_their_scripts() {
    let dir = scripts_dir();

    spay_build(dir.path()).arg("make_project").assert().success();
    spay_build(dir.path()).arg("make_ipa").assert().success();

    assert_eq!(calls(dir.path()), vec!["makeProject.sh", "arcApp.sh"]);
}

#[test]
fn unknown_command_prints_error_and_spawns_nothing() {
    let dir = scripts_dir();

    for keyword in ["make_apk", "MAKE_SDK", "deploy"] {
        spay_build(dir.path())
            .arg(keyword)
            .assert()
            .code(2)
            .stderr(predicate::str::contains(format!("Invalid command '{}'", keyword)));
    }

    assert!(calls(dir.path()).is_empty());
}

#[test]
fn load_dropbox_is_a_placeholder() {
    let dir = scripts_dir();

    spay_build(dir.path())
        .arg("load_dropbox")
        .assert()
        .success()
        .stdout(predicate::str::contains("not implemented"));

    assert!(calls(dir.path()).is_empty());
}

#[test]
fn failing_script_sets_child_process_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("build.sh"), "exit 7\n").unwrap();

    spay_build(dir.path())
        .arg("make_sdk")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("build.sh exited with code 7"));
}

#[test]
fn missing_script_sets_child_process_exit_code() {
    let dir = tempfile::tempdir().unwrap();

    spay_build(dir.path())
        .arg("make_ipa")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("arcApp.sh not found"));
}

#[test]
fn scripts_dir_flag_and_env() {
    let scripts = scripts_dir();
    let elsewhere = tempfile::tempdir().unwrap();

    spay_build(elsewhere.path())
        .arg("make_sdk")
        .arg("--scripts-dir")
        .arg(scripts.path())
        .assert()
        .success();

    spay_build(elsewhere.path())
        .arg("make_ipa")
        .env("SPAY_SCRIPTS_DIR", scripts.path())
        .assert()
        .success();

    // Scripts run inside the scripts directory
    assert_eq!(calls(scripts.path()), vec!["build.sh", "arcApp.sh"]);
    assert!(!elsewhere.path().join("calls.log").exists());
}

#[test]
fn list_prints_keywords() {
    let dir = tempfile::tempdir().unwrap();

    spay_build(dir.path())
        .arg("--list")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("make_sdk")
                .and(predicate::str::contains("makeProject.sh"))
                .and(predicate::str::contains("load_dropbox")),
        );
}

#[test]
fn missing_command_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    spay_build(dir.path()).assert().code(2);
}
