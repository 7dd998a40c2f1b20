//! # DevRS Exec Run Handler
//!
//! File: exec/src/commands/run.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Implements `devrs-exec run`. The flow is:
//! 1. Load the exec configuration and apply command-line overrides (`--timeout`, `--echo`).
//! 2. Build a `CommandSpec` from the program, its arguments and the window/elevation flags.
//! 3. Forward Ctrl-C to the executor's `InterruptHandle`.
//! 4. Execute (elevated when `--elevate` is given) and print the result.
//! 5. Return the child's exit code.
//!
//! ## Usage
//!
//! ```bash
//! devrs-exec run echo hello world
//! devrs-exec run --cwd /tmp -- ls -la
//! devrs-exec run --elevate --keep-open -- netsh winsock reset
//! ```
//!
use super::report;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use devrs_exec::common::process::{CommandExecutor, CommandSpec, InterruptHandle};
use devrs_exec::core::config::{self, ExecConfig};
use devrs_exec::ExecError;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Exit code reported when the run was interrupted with Ctrl-C.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// # Run Arguments (`RunArgs`)
///
/// Command-line arguments accepted by `devrs-exec run`.
#[derive(Parser, Debug)]
#[command(about = "Run a program and capture its output")]
pub struct RunArgs {
    /// Run with elevated privileges (sudo prefix, or an elevated window on Windows).
    #[arg(long)]
    elevate: bool,

    /// Launch in a visible console window (Windows only; output is not captured).
    #[arg(long)]
    show_window: bool,

    /// Pause the visible window after the program finishes.
    #[arg(long)]
    keep_open: bool,

    /// Working directory for the program.
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Give up (and kill the program) after this many seconds.
    #[arg(long, value_name = "SECS", env = "DEVRS_EXEC_TIMEOUT")]
    timeout: Option<u64>,

    /// Print each line as it arrives instead of after the program exits.
    #[arg(long)]
    echo: bool,

    /// The program to run.
    #[arg(required = true)]
    program: String,

    /// Arguments passed to the program.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

/// # Handle Run Command (`handle_run`)
///
/// Runs the requested program and returns its exit code.
///
/// ## Errors
///
/// Returns an `Err` if configuration loading fails or the program cannot be run
/// (blank program, launch refused, stream or script I/O failure, timeout).
pub async fn handle_run(args: RunArgs) -> Result<i32> {
    info!("Handling run command...");
    debug!("Run args: {:?}", args);

    let mut cfg = config::load_config().context("Failed to load exec configuration")?;
    apply_overrides(&mut cfg, &args);
    let echo = cfg.echo_lines;

    let mut builder = CommandSpec::builder(args.program.as_str())
        .args(shell_words::join(&args.args))
        .hide_window(!args.show_window)
        .keep_window_open(args.keep_open);
    if let Some(dir) = &args.cwd {
        builder = builder.working_dir(dir);
    }
    if echo {
        builder = builder.print_lines();
    }
    let spec = builder.build()?;

    let mut executor = CommandExecutor::with_config(cfg);
    forward_ctrl_c(executor.interrupt_handle());

    let outcome = if args.elevate {
        executor.execute_elevated(&spec).await
    } else {
        executor.execute(&spec).await
    };

    match outcome {
        Ok(result) => {
            report(result, echo);
            Ok(result.exit_code())
        }
        Err(ExecError::Interrupted { program }) => {
            warn!("Run of '{}' interrupted", program);
            eprintln!("Interrupted: {}", program);
            Ok(INTERRUPTED_EXIT_CODE)
        }
        Err(e) => Err(anyhow!(e).context(format!("Failed to run '{}'", spec.command_line()))),
    }
}

fn apply_overrides(cfg: &mut ExecConfig, args: &RunArgs) {
    if let Some(timeout) = args.timeout {
        cfg.timeout_secs = Some(timeout);
    }
    if args.echo {
        cfg.echo_lines = true;
    }
}

/// Interrupts the executor on the first Ctrl-C.
pub(crate) fn forward_ctrl_c(handle: InterruptHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl-C received; interrupting execution");
            handle.interrupt();
        }
    });
}
