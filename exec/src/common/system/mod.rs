//! # DevRS Exec System Utilities (`common::system`)
//!
//! File: exec/src/common/system/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Host-level facts the executor needs before it can pick an execution
//! strategy:
//!
//! - **Platform identification**: is this a console-windowed operating system
//!   (Windows, where programs get a console window and elevation goes through
//!   `ShellExecute`) or a console-native one (Unix-likes, where the parent's
//!   terminal is inherited and elevation is a `sudo` prefix)?
//! - **Environment lookup**: reading variables such as `TEMP`/`TMPDIR`,
//!   treating unset and blank values the same way.
//!
//! `Platform` is a plain value so that strategy selection and script
//! rendering can be exercised for either platform from any host.
//!
use std::env;
use std::fmt;

/// The two platform families the executor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Console-windowed OS (Windows): `cmd` wrapping, `ShellExecute` launches, `.bat`/`.vbs` scripts.
    Windows,
    /// Console-native OS (Linux, macOS, BSD): direct exec, `sudo` prefix, `sh` scripts.
    Unix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Whether the host can launch programs in their own (possibly elevated) console window.
    pub fn supports_windowed_launch(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Whether spawning goes through the platform shell rather than a direct exec.
    pub fn requires_shell_wrapper(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// Line separator used when rendering captured output.
    pub fn line_separator(self) -> &'static str {
        match self {
            Platform::Windows => "\r\n",
            Platform::Unix => "\n",
        }
    }

    /// Environment variables consulted, in order, for the temp directory.
    pub fn temp_dir_vars(self) -> &'static [&'static str] {
        match self {
            Platform::Windows => &["TEMP", "TMP"],
            Platform::Unix => &["TMPDIR"],
        }
    }

    /// Extension of the launcher script written for windowed launches.
    pub fn launcher_extension(self) -> &'static str {
        match self {
            Platform::Windows => "bat",
            Platform::Unix => "sh",
        }
    }

    /// Extension of the helper script written by `run_script`.
    pub fn script_extension(self) -> &'static str {
        match self {
            Platform::Windows => "vbs",
            Platform::Unix => "sh",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Unix => write!(f, "unix"),
        }
    }
}

/// Reads an environment variable, returning `None` when unset, non-unicode, or blank.
/// Surrounding whitespace is trimmed.
pub fn env_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform_matches_target() {
        #[cfg(windows)]
        assert_eq!(Platform::current(), Platform::Windows);
        #[cfg(not(windows))]
        assert_eq!(Platform::current(), Platform::Unix);
    }

    #[test]
    fn test_windowed_launch_only_on_windows() {
        assert!(Platform::Windows.supports_windowed_launch());
        assert!(!Platform::Unix.supports_windowed_launch());
        assert!(Platform::Windows.requires_shell_wrapper());
        assert!(!Platform::Unix.requires_shell_wrapper());
    }

    #[test]
    fn test_env_var_blank_is_none() {
        // PATH is set on every supported test host.
        assert!(env_var("PATH").is_some());
        assert_eq!(env_var("DEVRS_EXEC_SURELY_UNSET_VARIABLE"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Platform::Windows.to_string(), "windows");
        assert_eq!(Platform::Unix.to_string(), "unix");
    }
}
