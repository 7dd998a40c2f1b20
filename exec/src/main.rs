//! # DevRS Exec Main Entry Point
//!
//! File: exec/src/main.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Entry point for the `devrs-exec` binary, a thin driver over the
//! `devrs_exec` library. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the exec configuration
//! - Routing execution to the appropriate command handler
//!
//! ## Examples
//!
//! ```bash
//! # Run a command and print what it wrote
//! devrs-exec run echo hello world
//!
//! # Run with more logging
//! devrs-exec -vv run --timeout 5 -- ls -la /tmp
//!
//! # Run an inline script file through the platform interpreter
//! devrs-exec script ./check.sh --fast
//! ```
//!
//! The process exits with the child's exit code, or 1 if the child could
//! not be run at all.
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Handlers for `run` and `script`.

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "devrs-exec",
    about = "Run external programs and capture their output",
    long_about = "Runs a program (optionally elevated or in its own window), captures\n\
                  stdout and stderr line by line, and exits with the program's exit code.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "r")]
    Run(commands::run::RunArgs),
    #[command(alias = "s")]
    Script(commands::script::ScriptArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Run(args) => commands::run::handle_run(args).await,
        Commands::Script(args) => commands::script::handle_script(args).await,
    };

    match command_result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("Command execution failed: {:?}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
