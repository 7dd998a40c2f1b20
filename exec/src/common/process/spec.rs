//! # DevRS Exec Command Specification
//!
//! File: exec/src/common/process/spec.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! `CommandSpec` describes one command to run: the program, its raw argument
//! text, an optional working directory, the elevation and window flags, and
//! optional per-line callbacks. It is assembled through `CommandSpecBuilder`
//! and is immutable afterwards; the executor only ever reads it.
//!
//! Defaults: no arguments, inherited working directory, not elevated, window
//! hidden, window not kept open, no callbacks.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let spec = CommandSpec::builder("git")
//!     .args("status --short")
//!     .working_dir("/home/me/code/devrs")
//!     .on_output_line(|line| println!("git: {line}"))
//!     .build()?;
//! ```
//!
use crate::core::error::ExecError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Callback invoked with each captured line, on the task draining that stream.
pub type LineCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// An immutable description of a command to execute.
#[derive(Clone)]
pub struct CommandSpec {
    program: String,
    args: String,
    working_dir: Option<PathBuf>,
    elevate: bool,
    hide_window: bool,
    keep_window_open: bool,
    on_output_line: Option<LineCallback>,
    on_error_line: Option<LineCallback>,
}

impl CommandSpec {
    /// Starts building a spec for `program`.
    pub fn builder(program: impl Into<String>) -> CommandSpecBuilder {
        CommandSpecBuilder::new(program)
    }

    /// # New Command Spec (`new`)
    ///
    /// A spec with default flags and no arguments.
    ///
    /// # Arguments
    ///
    /// * `program` - The executable, optionally followed by its own arguments
    ///   (`"git status"`); on console-native platforms it is split with shell
    ///   word rules when it contains whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidCommand` if `program` is empty or whitespace only.
    ///
    /// # Examples
    ///
    /// ```
    /// use devrs_exec::CommandSpec;
    ///
    /// let spec = CommandSpec::new("git status").unwrap();
    /// assert_eq!(spec.program(), "git status");
    /// assert!(spec.hide_window());
    /// assert!(CommandSpec::new("   ").unwrap_err().is_invalid_command());
    /// ```
    pub fn new(program: impl Into<String>) -> Result<Self, ExecError> {
        Self::builder(program).build()
    }

    /// The program as given to the builder.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The raw argument text; empty when none was set.
    pub fn args(&self) -> &str {
        &self.args
    }

    /// Directory the command runs in; `None` inherits the caller's.
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Whether the command runs with elevated privileges.
    pub fn elevate(&self) -> bool {
        self.elevate
    }

    /// Whether the console window stays hidden (only meaningful on Windows).
    pub fn hide_window(&self) -> bool {
        self.hide_window
    }

    /// The flag as configured. See `pauses_window` for whether it takes effect.
    pub fn keep_window_open(&self) -> bool {
        self.keep_window_open
    }

    /// Keeping the window open only applies to a visible window.
    pub fn pauses_window(&self) -> bool {
        self.keep_window_open && !self.hide_window
    }

    /// Callback for stdout lines, if one was installed.
    pub fn on_output_line(&self) -> Option<&LineCallback> {
        self.on_output_line.as_ref()
    }

    /// Callback for stderr lines, if one was installed.
    pub fn on_error_line(&self) -> Option<&LineCallback> {
        self.on_error_line.as_ref()
    }

    /// `program` followed by `args`, separated by a space when args are present.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args)
        }
    }

    /// Fails with `InvalidCommand` when the program is blank.
    pub fn validate(&self) -> Result<(), ExecError> {
        validate_program(&self.program)
    }

    /// The same command as an elevated run with a visible window.
    pub(crate) fn as_elevated(&self) -> CommandSpec {
        CommandSpec {
            elevate: true,
            hide_window: false,
            ..self.clone()
        }
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("working_dir", &self.working_dir)
            .field("elevate", &self.elevate)
            .field("hide_window", &self.hide_window)
            .field("keep_window_open", &self.keep_window_open)
            .field("on_output_line", &self.on_output_line.is_some())
            .field("on_error_line", &self.on_error_line.is_some())
            .finish()
    }
}

fn validate_program(program: &str) -> Result<(), ExecError> {
    if program.trim().is_empty() {
        return Err(ExecError::InvalidCommand(
            "program must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Builder for `CommandSpec`.
#[derive(Clone)]
pub struct CommandSpecBuilder {
    spec: CommandSpec,
}

impl CommandSpecBuilder {
    fn new(program: impl Into<String>) -> Self {
        CommandSpecBuilder {
            spec: CommandSpec {
                program: program.into(),
                args: String::new(),
                working_dir: None,
                elevate: false,
                hide_window: true,
                keep_window_open: false,
                on_output_line: None,
                on_error_line: None,
            },
        }
    }

    /// Raw argument text appended to the program.
    pub fn args(mut self, args: impl Into<String>) -> Self {
        self.spec.args = args.into();
        self
    }

    /// Runs the command in `dir` instead of the caller's working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spec.working_dir = Some(dir.into());
        self
    }

    /// Request elevated privileges: an elevated window on Windows, the
    /// configured elevation command (`sudo`) as a prefix elsewhere.
    pub fn elevate(mut self, elevate: bool) -> Self {
        self.spec.elevate = elevate;
        self
    }

    /// Show (`false`) or hide (`true`, the default) the console window.
    /// A shown window means the output is not captured.
    pub fn hide_window(mut self, hide: bool) -> Self {
        self.spec.hide_window = hide;
        self
    }

    /// Pause the window after completion. Ignored while the window is hidden.
    pub fn keep_window_open(mut self, keep: bool) -> Self {
        self.spec.keep_window_open = keep;
        self
    }

    /// # On Output Line (`on_output_line`)
    ///
    /// Installs a callback for each stdout line, replacing any previous one.
    ///
    /// # Arguments
    ///
    /// * `callback` - Called on the stdout reader task with each line (line
    ///   terminator removed) before the line is stored. It must not block for
    ///   long, since the stream is not read while it runs.
    pub fn on_output_line<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.spec.on_output_line = Some(Arc::new(callback));
        self
    }

    /// Installs a callback for each stderr line; see `on_output_line`.
    pub fn on_error_line<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.spec.on_error_line = Some(Arc::new(callback));
        self
    }

    /// Echo stdout lines to stdout and stderr lines to stderr as they arrive.
    pub fn print_lines(self) -> Self {
        self.on_output_line(|line| println!("{line}"))
            .on_error_line(|line| eprintln!("{line}"))
    }

    /// Removes both line callbacks.
    pub fn clear_line_callbacks(mut self) -> Self {
        self.spec.on_output_line = None;
        self.spec.on_error_line = None;
        self
    }

    /// Finishes the spec.
    ///
    /// # Errors
    ///
    /// `ExecError::InvalidCommand` when the program is empty or whitespace.
    pub fn build(self) -> Result<CommandSpec, ExecError> {
        validate_program(&self.spec.program)?;
        Ok(self.spec)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_defaults() {
        let spec = CommandSpec::new("echo").unwrap();
        assert_eq!(spec.program(), "echo");
        assert_eq!(spec.args(), "");
        assert_eq!(spec.working_dir(), None);
        assert!(!spec.elevate());
        assert!(spec.hide_window());
        assert!(!spec.keep_window_open());
        assert!(spec.on_output_line().is_none());
        assert!(spec.on_error_line().is_none());
    }

    #[test]
    fn test_blank_program_rejected() {
        for program in ["", "   ", "\t\n"] {
            let err = CommandSpec::new(program).unwrap_err();
            assert!(err.is_invalid_command(), "program {:?}", program);
        }
    }

    #[test]
    fn test_builder_sets_fields() {
        let spec = CommandSpec::builder("ls")
            .args("-la /tmp")
            .working_dir("/var")
            .elevate(true)
            .hide_window(false)
            .keep_window_open(true)
            .build()
            .unwrap();
        assert_eq!(spec.command_line(), "ls -la /tmp");
        assert_eq!(spec.working_dir(), Some(Path::new("/var")));
        assert!(spec.elevate());
        assert!(!spec.hide_window());
        assert!(spec.pauses_window());
    }

    #[test]
    fn test_keep_window_open_ignored_when_hidden() {
        let spec = CommandSpec::builder("cmd")
            .keep_window_open(true)
            .hide_window(true)
            .build()
            .unwrap();
        assert!(spec.keep_window_open());
        assert!(!spec.pauses_window());
    }

    #[test]
    fn test_command_line_without_args() {
        assert_eq!(CommandSpec::new("whoami").unwrap().command_line(), "whoami");
    }

    #[test]
    fn test_callbacks_are_invoked_and_cleared() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let spec = CommandSpec::builder("echo")
            .on_output_line(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();
        let callback = spec.on_output_line().unwrap();
        callback("a");
        callback("b");
        assert_eq!(count.load(Ordering::SeqCst), 2);

        let cleared = CommandSpec::builder("echo")
            .print_lines()
            .clear_line_callbacks()
            .build()
            .unwrap();
        assert!(cleared.on_output_line().is_none());
        assert!(cleared.on_error_line().is_none());
    }

    #[test]
    fn test_as_elevated_shows_window() {
        let spec = CommandSpec::builder("netsh")
            .keep_window_open(true)
            .build()
            .unwrap();
        let elevated = spec.as_elevated();
        assert!(elevated.elevate());
        assert!(!elevated.hide_window());
        assert!(elevated.pauses_window());
        // The source CommandSpec is untouched.
        assert!(!spec.elevate());
    }

    #[test]
    fn test_debug_hides_closures() {
        let spec = CommandSpec::builder("echo")
            .on_error_line(|_| {})
            .build()
            .unwrap();
        let rendered = format!("{:?}", spec);
        assert!(rendered.contains("on_error_line: true"));
        assert!(rendered.contains("on_output_line: false"));
    }
}
