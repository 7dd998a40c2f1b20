//! # DevRS Exec Process Execution (`common::process`)
//!
//! File: exec/src/common/process/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Running external programs and capturing what they print.
//!
//! ## Architecture
//!
//! - **`spec`**: `CommandSpec`, the immutable description of what to run, and its builder.
//! - **`strategy`**: Picks windowed launch, shell-wrapped or direct execution and builds the invocation.
//! - **`drain`**: Concurrent line readers for the child's stdout and stderr.
//! - **`launcher`**: The windowed/elevated launch facility and its sentinel wait.
//! - **`interrupt`**: `InterruptHandle`, for abandoning a run that is waiting on its child.
//! - **`result`**: `ExecutionResult`, the captured lines and exit code.
//! - **`executor`**: `CommandExecutor`, tying the above together.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use devrs_exec::common::process::{CommandExecutor, CommandSpec};
//!
//! let mut executor = CommandExecutor::new();
//! let spec = CommandSpec::builder("git").args("rev-parse HEAD").build()?;
//! let head = executor.execute(&spec).await?.first_line().to_string();
//! ```
//!
pub mod drain;
pub mod executor;
pub mod interrupt;
pub mod launcher;
pub mod result;
pub mod spec;
pub mod strategy;

pub use executor::{run_command, run_script, CommandExecutor};
pub use interrupt::InterruptHandle;
pub use launcher::{LaunchRequest, WindowLauncher};
pub use result::ExecutionResult;
pub use spec::{CommandSpec, CommandSpecBuilder, LineCallback};
pub use strategy::Strategy;
