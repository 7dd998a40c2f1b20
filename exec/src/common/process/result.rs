//! # DevRS Exec Execution Result
//!
//! File: exec/src/common/process/result.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! `ExecutionResult` holds what one run produced: stdout lines, stderr lines
//! and the exit code. Two views of stdout are kept apart on purpose:
//!
//! - **`raw_lines`**: the stored lines, exactly as captured except that
//!   leading empty lines are dropped once draining finishes.
//! - **`display_text`**: a rendering for humans. On Windows it also drops the
//!   Windows Script Host banner lines and blank lines that `cscript` prints;
//!   the stored lines are not touched.
//!
//! The exit code is only meaningful after a capturing strategy. The windowed
//! launch path never observes the launched process and leaves it at its
//! previous value (0 for a fresh executor).
//!
use crate::common::system::Platform;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Banner fragments printed by the Windows console script interpreter.
const SCRIPT_HOST_BANNER: [&str; 2] = [
    "Windows Script Host Version",
    "Microsoft Corporation. All rights reserved.",
];

/// Captured output and exit status of the most recent run.
#[derive(Clone)]
pub struct ExecutionResult {
    output_lines: Vec<String>,
    error_lines: Vec<String>,
    exit_code: i32,
    platform: Platform,
}

impl ExecutionResult {
    /// An empty result (no lines, exit code 0) rendered for `platform`.
    pub fn new(platform: Platform) -> Self {
        ExecutionResult {
            output_lines: Vec::new(),
            error_lines: Vec::new(),
            exit_code: 0,
            platform,
        }
    }

    /// Stored stdout lines (leading empty lines removed).
    pub fn raw_lines(&self) -> &[String] {
        &self.output_lines
    }

    /// Stored stderr lines, unfiltered.
    pub fn errors(&self) -> &[String] {
        &self.error_lines
    }

    /// Exit code of the last captured run: 0 before any run, `128 + signal`
    /// for a child killed by a signal, `-1` when none could be obtained.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Whether the exit code is 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The first stdout line, or an empty string.
    pub fn first_line(&self) -> &str {
        self.line_at(1)
    }

    /// The stdout line with 1-based number `line_number`, or an empty string when out of range.
    pub fn line_at(&self, line_number: usize) -> &str {
        line_number
            .checked_sub(1)
            .and_then(|index| self.output_lines.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Stdout rendered for display, one line per platform line separator.
    pub fn display_text(&self) -> String {
        let separator = self.platform.line_separator();
        self.output_lines
            .iter()
            .filter(|line| self.platform != Platform::Windows || !is_script_host_noise(line))
            .map(|line| format!("{line}{separator}"))
            .collect()
    }

    /// Writes each stored stdout line to stdout.
    pub fn print(&self) {
        for line in &self.output_lines {
            println!("{line}");
        }
    }

    /// Forgets captured lines before a new run. The exit code is kept.
    pub(crate) fn clear_lines(&mut self) {
        self.output_lines.clear();
        self.error_lines.clear();
    }

    pub(crate) fn set_output_lines(&mut self, lines: Vec<String>) {
        self.output_lines = strip_leading_empty(lines);
    }

    pub(crate) fn set_error_lines(&mut self, lines: Vec<String>) {
        self.error_lines = lines;
    }

    pub(crate) fn set_exit_code(&mut self, code: i32) {
        self.exit_code = code;
    }
}

fn is_script_host_noise(line: &str) -> bool {
    line.trim().is_empty() || SCRIPT_HOST_BANNER.iter().any(|banner| line.contains(banner))
}

fn strip_leading_empty(mut lines: Vec<String>) -> Vec<String> {
    let leading = lines.iter().take_while(|line| line.is_empty()).count();
    lines.drain(..leading);
    lines
}

impl PartialEq for ExecutionResult {
    fn eq(&self, other: &Self) -> bool {
        self.exit_code == other.exit_code
            && self.output_lines == other.output_lines
            && self.error_lines == other.error_lines
    }
}

impl Eq for ExecutionResult {}

impl Hash for ExecutionResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.output_lines.hash(state);
        self.error_lines.hash(state);
        self.exit_code.hash(state);
    }
}

impl fmt::Debug for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionResult")
            .field("result", &self.output_lines)
            .field("errors", &self.error_lines)
            .field("exit_code", &self.exit_code)
            .finish()
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_leading_empty_lines_stripped() {
        let mut result = ExecutionResult::new(Platform::Unix);
        result.set_output_lines(lines(&["", "", "hello", "", "world", ""]));
        assert_eq!(result.raw_lines(), lines(&["hello", "", "world", ""]).as_slice());
    }

    #[test]
    fn test_all_empty_output_becomes_empty() {
        let mut result = ExecutionResult::new(Platform::Unix);
        result.set_output_lines(lines(&["", ""]));
        assert!(result.raw_lines().is_empty());
        assert_eq!(result.first_line(), "");
    }

    #[test]
    fn test_whitespace_line_is_not_empty() {
        let mut result = ExecutionResult::new(Platform::Unix);
        result.set_output_lines(lines(&[" ", "x"]));
        assert_eq!(result.first_line(), " ");
    }

    #[test]
    fn test_line_accessors_are_one_based() {
        let mut result = ExecutionResult::new(Platform::Unix);
        result.set_output_lines(lines(&["one", "two", "three"]));
        assert_eq!(result.first_line(), "one");
        assert_eq!(result.line_at(3), "three");
        assert_eq!(result.line_at(0), "");
        assert_eq!(result.line_at(4), "");
    }

    #[test]
    fn test_display_text_filters_banner_on_windows_only() {
        let captured = lines(&[
            "Microsoft (R) Windows Script Host Version 5.812",
            "Copyright (C) Microsoft Corporation. All rights reserved.",
            "",
            "42",
        ]);

        let mut windows = ExecutionResult::new(Platform::Windows);
        windows.set_output_lines(captured.clone());
        assert_eq!(windows.display_text(), "42\r\n");
        // Stored lines are untouched by the rendering.
        assert_eq!(windows.raw_lines().len(), 4);

        let mut unix = ExecutionResult::new(Platform::Unix);
        unix.set_output_lines(captured);
        assert_eq!(unix.display_text().lines().count(), 4);
    }

    #[test]
    fn test_display_round_trip() {
        let mut result = ExecutionResult::new(Platform::Unix);
        let captured = lines(&["a", "", "b c"]);
        result.set_output_lines(captured.clone());
        let rendered = result.to_string();
        let reparsed: Vec<String> = rendered.lines().map(String::from).collect();
        assert_eq!(reparsed, captured);
    }

    #[test]
    fn test_clear_lines_keeps_exit_code() {
        let mut result = ExecutionResult::new(Platform::Unix);
        result.set_output_lines(lines(&["x"]));
        result.set_error_lines(lines(&["e"]));
        result.set_exit_code(3);
        result.clear_lines();
        assert!(result.raw_lines().is_empty());
        assert!(result.errors().is_empty());
        assert_eq!(result.exit_code(), 3);
        assert!(!result.success());
    }

    #[test]
    fn test_equality_ignores_platform() {
        let mut a = ExecutionResult::new(Platform::Unix);
        let mut b = ExecutionResult::new(Platform::Windows);
        a.set_output_lines(lines(&["same"]));
        b.set_output_lines(lines(&["same"]));
        assert_eq!(a, b);
        b.set_exit_code(1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_lists_fields() {
        let result = ExecutionResult::new(Platform::Unix);
        let rendered = format!("{:?}", result);
        assert!(rendered.contains("result: []"));
        assert!(rendered.contains("errors: []"));
        assert!(rendered.contains("exit_code: 0"));
    }
}
