//! # DevRS Exec Common Utilities (`common`)
//!
//! File: exec/src/common/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Shared building blocks of the execution engine:
//!
//! - **`fs`**: Writing and removing the temporary scripts an execution needs.
//! - **`process`**: The executor itself: specs, strategies, stream draining, results.
//! - **`system`**: Platform identification and environment lookup.
//!

/// Filesystem helpers for temporary launcher and helper scripts.
pub mod fs;
/// Command specification, strategy selection and execution.
pub mod process;
/// Platform identification and environment-variable lookup.
pub mod system;
