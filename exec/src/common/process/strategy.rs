//! # DevRS Exec Strategy Selection
//!
//! File: exec/src/common/process/strategy.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Turns a `CommandSpec` into something the OS can run. Three strategies
//! exist, evaluated in this order:
//!
//! 1. **`WindowedLaunch`**: elevation or a visible window was requested and the
//!    host can launch console windows. A one-line launcher script is handed to
//!    the platform launch facility (`runas` when elevating, `open` otherwise).
//!    Nothing is captured.
//! 2. **`ShellWrapped`**: the host has no direct exec path worth using for
//!    command lines (Windows). Runs `cmd /C "program args"`.
//! 3. **`Direct`**: console-native hosts. Runs `program` with the argument text
//!    split into argv, prefixed with the elevation command when elevating.
//!
//! Everything here is pure: it depends only on the spec, the `Platform` value
//! and configuration, so both platforms' behavior is testable on any host.
//!
use super::spec::CommandSpec;
use crate::common::system::Platform;
use crate::core::error::ExecError;
use std::fmt;
use std::path::Path;

/// Interpreter invoked on Windows for helper scripts.
pub const WINDOWS_SCRIPT_INTERPRETER: &str = "cscript.exe";
/// Interpreter invoked on console-native platforms for helper scripts.
pub const UNIX_SCRIPT_INTERPRETER: &str = "sh";

/// How a spec will be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    WindowedLaunch,
    ShellWrapped,
    Direct,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::WindowedLaunch => "windowed-launch",
            Strategy::ShellWrapped => "shell-wrapped",
            Strategy::Direct => "direct",
        };
        f.write_str(name)
    }
}

/// Picks the strategy for `spec` on `platform`.
pub fn select_strategy(spec: &CommandSpec, platform: Platform) -> Strategy {
    if (spec.elevate() || !spec.hide_window()) && platform.supports_windowed_launch() {
        Strategy::WindowedLaunch
    } else if platform.requires_shell_wrapper() {
        Strategy::ShellWrapped
    } else {
        Strategy::Direct
    }
}

/// A concrete program + argv ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Passed verbatim after `args`, without the platform's argument quoting.
    /// Only set for the shell-wrapped strategy, whose command line must reach
    /// `cmd` exactly as written.
    pub raw_tail: Option<String>,
}

impl Invocation {
    /// Display form for logs.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        if let Some(tail) = &self.raw_tail {
            parts.push(tail.clone());
        }
        parts.join(" ")
    }
}

/// Builds the spawnable invocation for the capturing strategies.
///
/// # Errors
///
/// `InvalidCommand` if the program, the argument text or the elevation command has
/// unbalanced quotes, or if called for `WindowedLaunch`, which does not spawn
/// directly.
pub fn build_invocation(
    spec: &CommandSpec,
    strategy: Strategy,
    elevation_command: &str,
) -> Result<Invocation, ExecError> {
    match strategy {
        Strategy::ShellWrapped => Ok(Invocation {
            program: "cmd".to_string(),
            args: vec!["/C".to_string()],
            raw_tail: Some(format!("\"{}\"", spec.command_line())),
        }),
        Strategy::Direct => {
            // A program carrying its own arguments ("git status") contributes
            // them ahead of the argument text.
            let (program, mut argv) = split_program(spec.program())?;
            argv.extend(split_args(spec.args())?);
            if spec.elevate() {
                let mut prefix = split_args(elevation_command)?.into_iter();
                let elevator = prefix.next().ok_or_else(|| {
                    ExecError::InvalidCommand("elevation command is empty".to_string())
                })?;
                let mut args: Vec<String> = prefix.collect();
                args.push(program);
                args.extend(argv);
                Ok(Invocation {
                    program: elevator,
                    args,
                    raw_tail: None,
                })
            } else {
                Ok(Invocation {
                    program,
                    args: argv,
                    raw_tail: None,
                })
            }
        }
        Strategy::WindowedLaunch => Err(ExecError::InvalidCommand(
            "windowed launches go through a launcher script, not a direct spawn".to_string(),
        )),
    }
}

/// Splits a program string into the executable and any leading arguments.
///
/// A program without whitespace is taken verbatim so paths keep their
/// backslashes and quotes; one with whitespace follows the same word rules
/// as the argument text (quote a path that contains spaces).
fn split_program(program: &str) -> Result<(String, Vec<String>), ExecError> {
    let program = program.trim();
    if !program.contains(char::is_whitespace) {
        return Ok((program.to_string(), Vec::new()));
    }
    let mut words = split_args(program)?.into_iter();
    let executable = words
        .next()
        .ok_or_else(|| ExecError::InvalidCommand(format!("cannot parse program '{program}'")))?;
    Ok((executable, words.collect()))
}

fn split_args(text: &str) -> Result<Vec<String>, ExecError> {
    shell_words::split(text)
        .map_err(|e| ExecError::InvalidCommand(format!("cannot parse arguments '{text}': {e}")))
}

/// Renders the single-line batch launcher for a windowed launch.
///
/// The whole script is one line, so `cmd` has read everything it needs
/// before the first command runs. That first command creates `sentinel`,
/// which is what allows the executor to delete the script safely.
pub fn render_launcher(spec: &CommandSpec, sentinel: &Path) -> String {
    let mut line = format!(
        "@type nul > \"{}\" & \"{}\"",
        sentinel.display(),
        spec.program()
    );
    if !spec.args().is_empty() {
        line.push(' ');
        line.push_str(spec.args());
    }
    if spec.pauses_window() {
        line.push_str(" & pause");
    }
    line.push_str("\r\n");
    line
}

/// `runas` requests elevation from the launch facility; `open` runs normally.
pub fn launch_operation(spec: &CommandSpec) -> &'static str {
    if spec.elevate() {
        "runas"
    } else {
        "open"
    }
}

/// Window visibility passed to the launch facility: 0 hidden, 1 shown.
pub fn window_show_flag(spec: &CommandSpec) -> i32 {
    if spec.hide_window() {
        0
    } else {
        1
    }
}

/// Program and argument text that run a helper script on `platform`.
pub fn script_command(platform: Platform, script: &Path, args: &str) -> (String, String) {
    let (interpreter, quoted) = match platform {
        Platform::Windows => (
            WINDOWS_SCRIPT_INTERPRETER,
            format!("\"{}\"", script.display()),
        ),
        Platform::Unix => (
            UNIX_SCRIPT_INTERPRETER,
            shell_words::quote(&script.to_string_lossy()).into_owned(),
        ),
    };
    let args = if args.trim().is_empty() {
        quoted
    } else {
        format!("{quoted} {args}")
    };
    (interpreter.to_string(), args)
}
