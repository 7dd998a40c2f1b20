//! # DevRS Exec Integration Test Common Helpers
//!
//! File: exec/tests/common.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `exec/tests/`. Each other `.rs`
//! file in this directory is compiled as its own test crate and pulls this in
//! with `mod common;`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// # Get DevRS Exec Command (`devrs_exec_cmd`)
///
/// An `assert_cmd::Command` pointing at the `devrs-exec` binary built for this
/// test run.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn devrs_exec_cmd() -> Command {
    Command::cargo_bin("devrs-exec").expect("Failed to find devrs-exec binary for testing")
}

/// Number of entries in `dir`.
pub fn entry_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .count()
}
