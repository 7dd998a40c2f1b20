//! # DevRS Exec Script Handler
//!
//! File: exec/src/commands/script.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Implements `devrs-exec script`: reads a script body from a file and runs
//! it through `CommandExecutor::run_script`, which copies it to a temporary
//! file, invokes the platform interpreter (`cscript.exe` on Windows, `sh`
//! elsewhere) and removes the copy afterwards.
//!
//! ## Usage
//!
//! ```bash
//! devrs-exec script ./report.sh --since yesterday
//! ```
//!
use super::report;
use super::run::forward_ctrl_c;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use devrs_exec::common::process::CommandExecutor;
use devrs_exec::core::config;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// # Script Arguments (`ScriptArgs`)
#[derive(Parser, Debug)]
#[command(about = "Run a script file through the platform script interpreter")]
pub struct ScriptArgs {
    /// Print each line as it arrives instead of after the script exits.
    #[arg(long)]
    echo: bool,

    /// File holding the script body.
    #[arg(required = true, value_name = "FILE")]
    file: PathBuf,

    /// Arguments passed to the script.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

/// # Handle Script Command (`handle_script`)
///
/// Runs the script and returns its exit code.
pub async fn handle_script(args: ScriptArgs) -> Result<i32> {
    info!("Handling script command...");
    debug!("Script args: {:?}", args);

    let body = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read script file {:?}", args.file))?;
    let mut cfg = config::load_config().context("Failed to load exec configuration")?;
    if args.echo {
        cfg.echo_lines = true;
    }
    let echo = cfg.echo_lines;

    let mut executor = CommandExecutor::with_config(cfg);
    forward_ctrl_c(executor.interrupt_handle());

    let result = executor
        .run_script_with(&body, &shell_words::join(&args.args), |builder| {
            if echo {
                builder.print_lines()
            } else {
                builder
            }
        })
        .await
        .map_err(|e| anyhow!(e).context(format!("Failed to run script {:?}", args.file)))?;

    report(result, echo);
    Ok(result.exit_code())
}
