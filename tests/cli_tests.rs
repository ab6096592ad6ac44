//! CLI smoke tests for the offline dry-run path.

use assert_cmd::Command;
use predicates::prelude::*;

const CI_VARS: &[&str] = &[
    "GITHUB_ACTIONS",
    "GITHUB_REF_TYPE",
    "GITHUB_REF_NAME",
    "GITHUB_EVENT_NAME",
    "GITHUB_REPOSITORY",
    "TRAVIS",
    "TRAVIS_BRANCH",
    "TRAVIS_TAG",
    "TRAVIS_COMMIT_MESSAGE",
    "TRAVIS_PULL_REQUEST",
    "TRAVIS_REPO_SLUG",
    "ROLLOUT_NIGHTLY",
    "ROLLOUT_REPO",
    "ROLLOUT_BRANCH",
    "ROLLOUT_COMMIT_MESSAGE",
];

fn rollout() -> Command {
    let mut cmd = Command::cargo_bin("rollout").expect("binary builds");
    for var in CI_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn dry_run_noop_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("Cargo.toml");
    std::fs::write(&manifest, "[package]\nname = \"pkg\"\nversion = \"1.0.0\"\n").unwrap();

    rollout()
        .current_dir(dir.path())
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"))
        .stdout(predicate::str::contains("dry run"));
}

#[test]
fn missing_manifest_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    rollout()
        .current_dir(dir.path())
        .arg("--manifest")
        .arg(dir.path().join("does-not-exist.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fatal error"));
}
