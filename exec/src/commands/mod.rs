//! # DevRS Exec Command Handlers
//!
//! File: exec/src/commands/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Subcommands of the `devrs-exec` binary. Each handler returns the exit
//! code the binary should terminate with.
//!
//! - `run`: execute a program through `CommandExecutor::execute`
//! - `script`: execute a script file's contents through `CommandExecutor::run_script`
//!
use devrs_exec::ExecutionResult;

pub mod run;
pub mod script;

/// Prints a finished run: display text to stdout unless it was already
/// echoed line by line, error lines to stderr unless echoed.
pub(crate) fn report(result: &ExecutionResult, echoed: bool) {
    if echoed {
        return;
    }
    print!("{}", result.display_text());
    for line in result.errors() {
        eprintln!("{line}");
    }
}
