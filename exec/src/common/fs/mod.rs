//! # DevRS Exec Filesystem Utilities (`common::fs`)
//!
//! File: exec/src/common/fs/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Filesystem helpers used by the executor:
//!
//! - **`io`**: Writing script bodies, with `ExecError::Io` context.
//! - **`temp`**: Temp directory resolution and the self-deleting `TempScript`.
//!
pub mod io;
pub mod temp;

pub use temp::{resolve_temp_dir, TempScript};
