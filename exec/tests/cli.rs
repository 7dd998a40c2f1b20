//! # DevRS Exec CLI Integration Tests
//!
//! File: exec/tests/cli.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! ## Overview
//!
//! Verifies the `devrs-exec` binary end to end: standard flags, `run` and
//! `script` output, and exit code propagation. Tests that spawn real
//! programs rely on a POSIX shell and are gated to Unix.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_help_flag() {
    devrs_exec_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("script"));
}

#[test]
fn test_version_flag() {
    devrs_exec_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_run_requires_program() {
    devrs_exec_cmd().arg("run").assert().failure();
}

/// A whitespace-only program is rejected before anything is spawned.
#[test]
fn test_run_blank_program_fails() {
    devrs_exec_cmd()
        .args(["run", "   "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_run_missing_program_fails() {
    devrs_exec_cmd()
        .args(["run", "devrs-exec-no-such-program-xyz"])
        .assert()
        .code(1);
}

#[cfg(unix)]
#[test]
fn test_run_echo() {
    devrs_exec_cmd()
        .args(["run", "echo", "hello", "world"])
        .assert()
        .success()
        .stdout("hello world\n");
}

#[cfg(unix)]
#[test]
fn test_run_propagates_exit_code_and_stderr() {
    devrs_exec_cmd()
        .args(["run", "--", "sh", "-c", "echo oops >&2; exit 3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("oops"));
}

#[cfg(unix)]
#[test]
fn test_run_strips_leading_blank_lines() {
    devrs_exec_cmd()
        .args(["run", "--", "printf", "\\n\\nfirst\\nsecond\\n"])
        .assert()
        .success()
        .stdout("first\nsecond\n");
}

#[cfg(unix)]
#[test]
fn test_run_in_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().canonicalize().unwrap();
    devrs_exec_cmd()
        .args(["run", "--cwd"])
        .arg(&canonical)
        .arg("pwd")
        .assert()
        .success()
        .stdout(predicate::str::contains(canonical.to_string_lossy().to_string()));
}

#[cfg(unix)]
#[test]
fn test_run_timeout_fails() {
    devrs_exec_cmd()
        .args(["run", "--timeout", "1", "sleep", "10"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to run"));
}

#[cfg(unix)]
#[test]
fn test_run_echo_flag_prints_lines() {
    devrs_exec_cmd()
        .args(["run", "--echo", "--", "sh", "-c", "echo one; echo two"])
        .assert()
        .success()
        .stdout("one\ntwo\n");
}

#[cfg(unix)]
#[test]
fn test_script_runs_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("job.sh");
    std::fs::write(&file, "echo \"args: $1 $2\"\nexit 4\n").unwrap();
    devrs_exec_cmd()
        .arg("script")
        .arg(&file)
        .args(["alpha", "beta"])
        .assert()
        .code(4)
        .stdout("args: alpha beta\n");
}

#[cfg(unix)]
#[test]
fn test_script_echo_prints_each_line_once() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("job.sh");
    std::fs::write(&file, "echo one\necho two\n").unwrap();
    devrs_exec_cmd()
        .args(["script", "--echo"])
        .arg(&file)
        .assert()
        .success()
        .stdout("one\ntwo\n");
}

#[cfg(unix)]
#[test]
fn test_run_program_with_embedded_arguments() {
    devrs_exec_cmd()
        .args(["run", "echo from-program", "and-args"])
        .assert()
        .success()
        .stdout("from-program and-args\n");
}

#[test]
fn test_script_missing_file_fails() {
    devrs_exec_cmd()
        .args(["script", "/definitely/not/here/job.sh"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read script file"));
}
