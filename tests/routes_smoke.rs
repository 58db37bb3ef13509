//! End-to-end runs of `rrs routes` and `rrs search` against a fixture app
//! whose route command is `cat routes.txt`.

#![cfg(unix)]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;

mod util;

use util::{make_failing_app, make_rails_app};

fn rrs() -> Command {
    Command::cargo_bin("rrs").expect("bin")
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).expect("utf8")
}

// Test: the whole table comes back in table order, one TSV row per route.
#[test]
fn routes_lists_every_row_in_order() {
    let app = make_rails_app();

    let stdout = stdout_of(
        rrs()
            .current_dir(app.path())
            .args(["--quiet", "routes", "--format", "tsv"]),
    );

    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0], "GET\t/users(.:format)\tusers#index\tusers");
    assert_eq!(rows[1], "POST\t/users(.:format)\tusers#create\t");
    assert_eq!(rows[5], "GET\t/admin/posts(.:format)\tadmin/posts#index\tadmin_posts");
    assert!(rows[6].starts_with("\t/cable\t#<ActionCable"));
}

// Test: default table output has the column headers.
#[test]
fn routes_default_format_is_a_table() {
    let app = make_rails_app();

    rrs()
        .current_dir(app.path())
        .args(["--quiet", "routes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Controller#Action"))
        .stdout(predicate::str::contains("users#destroy"));
}

// Test: search returns only matching rows, as JSON objects.
#[test]
fn search_filters_rows_as_json() {
    let app = make_rails_app();

    let stdout = stdout_of(
        rrs()
            .current_dir(app.path())
            .args(["--quiet", "search", "user", "--format", "json"]),
    );

    let v: Value = serde_json::from_str(&stdout).expect("json");
    let rows = v.as_array().expect("array");
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r["handler"].as_str().unwrap().starts_with("users#")));
    assert_eq!(rows[3]["filePath"], "app/controllers/users_controller.rb");
}

// Test: queries are case-insensitive end to end.
#[test]
fn search_ignores_case() {
    let app = make_rails_app();
    let run = |q: &str| {
        stdout_of(
            rrs()
                .current_dir(app.path())
                .args(["--quiet", "search", q, "--format", "tsv"]),
        )
    };

    let upper = run("DELETE");
    assert_eq!(upper, run("delete"));
    assert_eq!(upper.lines().count(), 1);
}

// Test: the root is discovered from a nested directory.
#[test]
fn root_is_discovered_upwards() {
    let app = make_rails_app();

    let stdout = stdout_of(
        rrs()
            .current_dir(app.path().join("app/controllers"))
            .args(["--quiet", "search", "admin", "--format", "tsv"]),
    );
    assert_eq!(stdout.lines().count(), 1);
}

// Test: --root works from anywhere.
#[test]
fn explicit_root_flag() {
    let app = make_rails_app();
    let elsewhere = assert_fs::TempDir::new().expect("tempdir");

    rrs()
        .current_dir(elsewhere.path())
        .arg("--root")
        .arg(app.path())
        .args(["--quiet", "routes", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("users#show"));
}

// Test: quiet mode leaves stderr clean.
#[test]
fn quiet_suppresses_summary() {
    let app = make_rails_app();

    rrs()
        .current_dir(app.path())
        .args(["--quiet", "routes", "--format", "tsv"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

// Test: the summary line goes to stderr when not quiet.
#[test]
fn summary_goes_to_stderr() {
    let app = make_rails_app();

    rrs()
        .current_dir(app.path())
        .args(["--no-color", "search", "posts", "--format", "tsv"])
        .assert()
        .success()
        .stderr(predicate::str::contains("1 of 7 routes"));
}

// Test: a failing route command is reported verbatim.
#[test]
fn failing_route_command_is_reported() {
    let app = make_failing_app();

    rrs()
        .current_dir(app.path())
        .args(["--quiet", "routes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rails: command failed"));
}

// Test: running outside a Rails project fails with the workspace message.
#[test]
fn no_workspace_outside_rails_project() {
    let empty = assert_fs::TempDir::new().expect("tempdir");

    rrs()
        .current_dir(empty.path())
        .args(["--quiet", "routes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("There is no workspace"));
}
