//! # DevRS Exec Error Types
//!
//! File: exec/src/core/error.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This module defines the error types used by the command execution engine.
//! Callers of the executor need to tell "the program ran and exited non-zero"
//! (inspect the exit code on the result) apart from "the program could not be
//! run" (an `ExecError`), so the executor returns a typed error rather than an
//! opaque one.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ExecError`: A custom error enum using `thiserror`, returned by every
//!   executor entry point.
//! - `Result<T>`: A type alias for `anyhow::Result<T>` used by application-level
//!   code (configuration loading, the `devrs-exec` binary) where context matters
//!   more than the concrete type.
//!
//! The error categories are:
//! - Invalid commands (blank program, unparsable argument text)
//! - Process launch failures (the OS refused to spawn)
//! - Interruption while waiting for the child
//! - Timeouts while waiting for the child
//! - I/O failures on streams or temporary scripts
//! - Configuration errors
//!
//! ## Examples
//!
//! ```rust,ignore
//! match executor.execute(&spec).await {
//!     Ok(result) if result.exit_code() != 0 => println!("exited with {}", result.exit_code()),
//!     Ok(result) => print!("{}", result),
//!     Err(ExecError::ProcessLaunch { program, .. }) => eprintln!("could not start {}", program),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the command execution engine.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Failed to launch '{program}': {source}")]
    ProcessLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Interrupted while waiting for '{program}' to exit")]
    Interrupted { program: String },

    #[error("'{program}' did not exit within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExecError {
    /// Wraps an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ExecError::Io {
            context: context.into(),
            source,
        }
    }

    /// True for `ExecError::Interrupted`.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ExecError::Interrupted { .. })
    }

    /// True for `ExecError::InvalidCommand`.
    pub fn is_invalid_command(&self) -> bool {
        matches!(self, ExecError::InvalidCommand(_))
    }
}

/// Type alias for Result using anyhow::Error for application-level code.
/// Executor entry points return `std::result::Result<T, ExecError>` instead.
pub type Result<T> = anyhow::Result<T>;
