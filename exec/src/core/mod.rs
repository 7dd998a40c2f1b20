//! # DevRS Exec Core Infrastructure
//!
//! File: exec/src/core/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Foundational pieces shared by the execution engine and its binary:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the application-level `Result` alias
//!
//! ## Usage
//!
//! ```rust,ignore
//! use devrs_exec::core::config; // For loading configuration
//! use devrs_exec::core::error::{ExecError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
