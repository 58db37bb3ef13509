//! Shared test utilities for integration tests
//!
//! Builds throwaway Rails-shaped projects whose route command is replaced
//! through `.railroutes.toml`, so no Ruby toolchain is needed.

#![allow(dead_code)]

use assert_fs::prelude::*;

/// `rails routes` output used by the fixture app
pub const ROUTES: &str = include_str!("fixtures/routes.txt");

/// Controller behind the `users#...` routes
pub const USERS_CONTROLLER: &str = include_str!("fixtures/users_controller.rb");

/// Minimal Rails layout: config/routes.rb plus one controller
fn make_skeleton() -> assert_fs::TempDir
{
    // Initialize the temporary project root
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    // Marks the directory as a Rails root for discovery
    tmp.child("config/routes.rb")
        .write_str("Rails.application.routes.draw do\n  resources :users\nend\n")
        .expect("write routes.rb");

    tmp.child("app/controllers/users_controller.rb")
        .write_str(USERS_CONTROLLER)
        .expect("write controller");

    tmp
}

/// Rails app whose route command prints the fixture table
pub fn make_rails_app() -> assert_fs::TempDir
{
    let tmp = make_skeleton();

    tmp.child("routes.txt")
        .write_str(ROUTES)
        .expect("write routes.txt");

    tmp.child(".railroutes.toml")
        .write_str("command = [\"cat\", \"routes.txt\"]\n")
        .expect("write config");

    tmp
}

/// Rails app whose route command fails the way a broken bundle does
pub fn make_failing_app() -> assert_fs::TempDir
{
    let tmp = make_skeleton();

    tmp.child(".railroutes.toml")
        .write_str("command = [\"sh\", \"-c\", \"echo 'rails: command failed' >&2; exit 1\"]\n")
        .expect("write config");

    tmp
}
