//! # DevRS Exec Library Root
//!
//! File: exec/src/lib.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! The DevRS command execution engine. It runs an external program
//! (optionally elevated, optionally in a visible window), captures its
//! standard output and standard error line by line, and reports its exit
//! status.
//!
//! ## Architecture
//!
//! - `core`: error types and configuration loading
//! - `common`: platform facts, temporary script files, and the executor
//!
//! The most used items are re-exported at the crate root.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use devrs_exec::{CommandExecutor, CommandSpec};
//!
//! # async fn example() -> Result<(), devrs_exec::ExecError> {
//! let mut executor = CommandExecutor::new();
//! let spec = CommandSpec::builder("echo").args("hello world").build()?;
//! let result = executor.execute(&spec).await?;
//! println!("{} (exit code {})", result, result.exit_code());
//! # Ok(())
//! # }
//! ```
//!
pub mod common;
pub mod core;

pub use crate::common::process::{
    run_command, run_script, CommandExecutor, CommandSpec, CommandSpecBuilder, ExecutionResult,
    InterruptHandle, Strategy,
};
pub use crate::common::system::Platform;
pub use crate::core::config::ExecConfig;
pub use crate::core::error::ExecError;
