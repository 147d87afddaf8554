//! Integration tests for CLI argument parsing and validation.
//!
//! Nothing here reaches the network: `apply` needs no token, and invalid
//! `clone`/`list` invocations fail before any forge call.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command isolated from the user's git and gh-template configuration.
fn gh_template(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("gh-template"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GH_TEMPLATE_CONFIG", home.path().join("missing.toml"))
        .env_remove("RUST_LOG")
        .env_remove("GH_HOST");
    cmd
}

#[test]
fn shows_help() {
    let home = TempDir::new().unwrap();
    gh_template(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("clone"))
        .stdout(predicate::str::contains("apply"));
}

#[test]
fn apply_help_lists_variables_and_functions() {
    let home = TempDir::new().unwrap();
    gh_template(&home)
        .args(["apply", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("github.owner"))
        .stdout(predicate::str::contains("pluralize count thing"));
}

#[test]
fn apply_renders_working_directory() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("README.md"), "# {{ project }}\n").unwrap();

    gh_template(&home)
        .current_dir(work.path())
        .args(["apply", "-p", "project=demo"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(work.path().join("README.md")).unwrap(),
        "# demo\n"
    );
}

#[test]
fn apply_without_terminal_does_not_prompt() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("title.txt"), "{{ param('title', 'Demo', 'Title') }}").unwrap();

    gh_template(&home)
        .current_dir(work.path())
        .arg("apply")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(work.path().join("title.txt")).unwrap(), "Demo");

    fs::write(work.path().join("owner.txt"), "{{ param('owner') }}").unwrap();
    gh_template(&home)
        .current_dir(work.path())
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parameter 'owner' is not set"));
}

#[test]
fn apply_uses_defaults_file_delimiters() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let config = home.path().join("config.toml");
    fs::write(&config, "delims = [\"<%\", \"%>\"]\nexclude = [\"vendor\"]\n").unwrap();
    fs::write(work.path().join("README.md"), "# <% project %> {{ raw }}\n").unwrap();
    fs::create_dir_all(work.path().join("vendor")).unwrap();
    fs::write(work.path().join("vendor/lib.txt"), "<% missing %>").unwrap();

    gh_template(&home)
        .env("GH_TEMPLATE_CONFIG", &config)
        .current_dir(work.path())
        .args(["apply", "--param", "project=demo"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(work.path().join("README.md")).unwrap(),
        "# demo {{ raw }}\n"
    );
}

#[test]
fn apply_reports_undefined_parameter() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("README.md"), "{{ missing }}").unwrap();

    gh_template(&home)
        .current_dir(work.path())
        .arg("apply")
        .assert()
        .failure()
        .stderr(predicate::str::contains("README.md"));
}

#[test]
fn half_delimiter_pair_is_rejected() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    fs::write(work.path().join("README.md"), "{{ project }}").unwrap();

    gh_template(&home)
        .current_dir(work.path())
        .args(["apply", "--delims", "<<", "-p", "project=x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "both left and right delimiters are required",
        ));

    assert_eq!(
        fs::read_to_string(work.path().join("README.md")).unwrap(),
        "{{ project }}"
    );
}

#[test]
fn invalid_language_is_rejected() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    gh_template(&home)
        .current_dir(work.path())
        .args(["apply", "--language", "not a tag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid language"));
}

#[test]
fn malformed_param_is_rejected() {
    let home = TempDir::new().unwrap();
    gh_template(&home)
        .args(["apply", "-p", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected name=value"));
}

#[test]
fn conflicting_visibility_is_rejected_before_network() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    gh_template(&home)
        .current_dir(work.path())
        .env("GH_TOKEN", "unused")
        .args(["clone", "app", "--template", "octo/template", "--private", "--public"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "only one of --internal, --private, or --public",
        ));
    assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
}

#[test]
fn clone_requires_template() {
    let home = TempDir::new().unwrap();
    gh_template(&home)
        .args(["clone", "app"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--template"));
}

#[test]
fn list_rejects_malformed_repo() {
    let home = TempDir::new().unwrap();
    gh_template(&home)
        .args(["list", "-R", "not-a-repo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid repository 'not-a-repo'"));
}

#[test]
fn completion_generates_script() {
    let home = TempDir::new().unwrap();
    gh_template(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gh-template"));
}
