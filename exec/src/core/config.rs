//! # DevRS Exec Configuration System
//!
//! File: exec/src/core/config.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This module loads the tunables of the command execution engine: where
//! temporary launcher scripts go, how long the launcher path waits for its
//! sentinel, whether the direct/shell strategies time out, and which command
//! provides privilege escalation.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.devrs-exec.toml` in current directory or ancestors (up to the git root)
//! 2. User-specific `<config dir>/devrs/exec.toml`
//! 3. Default values defined in the code
//!
//! Each file only overrides the keys it sets. After merging, `~` in paths is
//! expanded and the result is validated.
//! The library never loads configuration on its own; callers pass an
//! `ExecConfig` to `CommandExecutor::with_config`.
//!
//! ## Examples
//!
//! ```rust,ignore
//! let cfg = config::load_config()?;
//! let mut executor = CommandExecutor::with_config(cfg);
//! ```
//!
use crate::core::error::{ExecError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Tunables for `CommandExecutor`, loaded from TOML files.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExecConfig {
    /// Directory for launcher and helper scripts (can use ~). Unset means the platform temp dir.
    #[serde(default)]
    pub temp_dir: Option<String>,
    /// How long the launcher path waits for its sentinel before removing the script anyway.
    #[serde(default = "default_launcher_ready_timeout_ms")]
    pub launcher_ready_timeout_ms: u64,
    /// Poll interval while waiting for the launcher sentinel.
    #[serde(default = "default_launcher_poll_interval_ms")]
    pub launcher_poll_interval_ms: u64,
    /// Optional wait-for-exit timeout for the direct and shell-wrapped strategies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// How long stream readers may keep draining after the child was killed.
    #[serde(default = "default_drain_grace_ms")]
    pub drain_grace_ms: u64,
    /// Privilege-escalation prefix on console-native platforms.
    #[serde(default = "default_elevation_command")]
    pub elevation_command: String,
    /// Whether the binary echoes each captured line as it arrives.
    #[serde(default)]
    pub echo_lines: bool,
}

impl Default for ExecConfig {
    fn default() -> Self {
        ExecConfig {
            temp_dir: None,
            launcher_ready_timeout_ms: default_launcher_ready_timeout_ms(),
            launcher_poll_interval_ms: default_launcher_poll_interval_ms(),
            timeout_secs: None,
            drain_grace_ms: default_drain_grace_ms(),
            elevation_command: default_elevation_command(),
            echo_lines: false,
        }
    }
}

impl ExecConfig {
    pub fn launcher_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.launcher_ready_timeout_ms)
    }

    pub fn launcher_poll_interval(&self) -> Duration {
        Duration::from_millis(self.launcher_poll_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn drain_grace(&self) -> Duration {
        Duration::from_millis(self.drain_grace_ms)
    }

    pub fn temp_dir_override(&self) -> Option<PathBuf> {
        self.temp_dir.as_ref().map(PathBuf::from)
    }
}

fn default_launcher_ready_timeout_ms() -> u64 {
    10_000
}
fn default_launcher_poll_interval_ms() -> u64 {
    100
}
fn default_drain_grace_ms() -> u64 {
    500
}
fn default_elevation_command() -> String {
    "sudo".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".devrs-exec.toml";
const USER_CONFIG_FILENAME: &str = "exec.toml";

/// Loads, merges, expands and validates the configuration.
pub fn load_config() -> Result<ExecConfig> {
    let user_layer = load_user_config()?;
    let project_layer = load_project_config()?;
    let mut merged_config = merge_configs(user_layer, project_layer);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "DevRS", "devrs") {
        let config_path = proj_dirs.config_dir().join(USER_CONFIG_FILENAME);
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_layer_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigLayer>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_layer_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file ({PROJECT_CONFIG_FILENAME}) found.");
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root looking for the project file,
/// stopping at the first directory that contains `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path: &Path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

/// The keys one configuration file actually sets. Absent keys leave the
/// value from the layer below untouched, so a project file can restate a
/// default (or switch `echo_lines` back off) over a user file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    temp_dir: Option<String>,
    launcher_ready_timeout_ms: Option<u64>,
    launcher_poll_interval_ms: Option<u64>,
    timeout_secs: Option<u64>,
    drain_grace_ms: Option<u64>,
    elevation_command: Option<String>,
    echo_lines: Option<bool>,
}

impl ConfigLayer {
    /// Overlays the keys set in this layer onto `base`.
    fn apply_to(self, base: ExecConfig) -> ExecConfig {
        ExecConfig {
            temp_dir: self.temp_dir.or(base.temp_dir),
            launcher_ready_timeout_ms: self
                .launcher_ready_timeout_ms
                .unwrap_or(base.launcher_ready_timeout_ms),
            launcher_poll_interval_ms: self
                .launcher_poll_interval_ms
                .unwrap_or(base.launcher_poll_interval_ms),
            timeout_secs: self.timeout_secs.or(base.timeout_secs),
            drain_grace_ms: self.drain_grace_ms.unwrap_or(base.drain_grace_ms),
            elevation_command: self.elevation_command.unwrap_or(base.elevation_command),
            echo_lines: self.echo_lines.unwrap_or(base.echo_lines),
        }
    }
}

fn load_layer_from_path(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// # Load Config From Path (`load_config_from_path`)
///
/// Reads a single TOML configuration file and fills the keys it does not set
/// with the built-in defaults. No expansion or validation is applied.
///
/// # Errors
///
/// Returns an `Err` if the file cannot be read or is not valid configuration TOML
/// (including unknown keys).
pub fn load_config_from_path(path: &Path) -> Result<ExecConfig> {
    load_layer_from_path(path).map(|layer| layer.apply_to(ExecConfig::default()))
}

/// Defaults, then the user layer, then the project layer; each key takes the
/// value from the highest layer that sets it.
fn merge_configs(user: Option<ConfigLayer>, project: Option<ConfigLayer>) -> ExecConfig {
    [user, project]
        .into_iter()
        .flatten()
        .fold(ExecConfig::default(), |merged, layer| layer.apply_to(merged))
}

fn expand_config_paths(config: &mut ExecConfig) -> Result<()> {
    if let Some(dir) = config.temp_dir.as_mut() {
        *dir = shellexpand::tilde(dir.as_str()).into_owned();
        debug!("Expanded temp directory: {}", dir);
    }
    Ok(())
}

/// Checks the merged configuration for values the executor cannot work with.
pub fn validate_config(config: &ExecConfig) -> Result<()> {
    debug!("Validating exec configuration...");
    if config.launcher_poll_interval_ms == 0 {
        return Err(anyhow!(ExecError::Config(
            "launcher_poll_interval_ms must be greater than zero.".to_string()
        )));
    }
    if config.launcher_poll_interval_ms > config.launcher_ready_timeout_ms {
        return Err(anyhow!(ExecError::Config(format!(
            "launcher_poll_interval_ms ({}) exceeds launcher_ready_timeout_ms ({}).",
            config.launcher_poll_interval_ms, config.launcher_ready_timeout_ms
        ))));
    }
    if config.timeout_secs == Some(0) {
        return Err(anyhow!(ExecError::Config(
            "timeout_secs must be greater than zero when set.".to_string()
        )));
    }
    if config.elevation_command.trim().is_empty() {
        return Err(anyhow!(ExecError::Config(
            "elevation_command cannot be empty.".to_string()
        )));
    }
    if let Some(dir) = config.temp_dir_override() {
        if !dir.exists() {
            warn!(
                "Configured temp directory '{}' does not exist; it will be created on first use.",
                dir.display()
            );
        } else if !dir.is_dir() {
            return Err(anyhow!(ExecError::Config(format!(
                "Configured temp path '{}' exists but is not a directory.",
                dir.display()
            ))));
        }
    }
    debug!("Exec configuration validation successful.");
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            temp_dir = "~/devrs-tmp"
            timeout_secs = 30
            elevation_command = "doas"
        "#;

        let config: ExecConfig = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.temp_dir.as_deref(), Some("~/devrs-tmp")); // Not yet expanded
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.elevation_command, "doas");
        assert_eq!(config.launcher_ready_timeout_ms, 10_000); // Default
        assert_eq!(config.drain_grace(), Duration::from_millis(500)); // Default
        assert!(!config.echo_lines);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<ExecConfig, _> = toml::from_str("hide_window = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = ExecConfig {
            temp_dir: Some("~/exec_tmp".to_string()),
            ..Default::default()
        };

        expand_config_paths(&mut config).unwrap();

        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.temp_dir.as_deref(),
            Some(home_dir.join("exec_tmp").to_string_lossy().as_ref())
        );
    }

    fn layer(toml_content: &str) -> ConfigLayer {
        toml::from_str(toml_content).expect("Failed to parse layer TOML")
    }

    #[test]
    fn test_merge_project_overrides_user() {
        let user = layer(
            r#"
            timeout_secs = 60
            elevation_command = "doas"
            drain_grace_ms = 250
        "#,
        );
        let project = layer("timeout_secs = 5");

        let merged = merge_configs(Some(user), Some(project));

        assert_eq!(merged.timeout_secs, Some(5));
        assert_eq!(merged.elevation_command, "doas"); // Project did not set it
        assert_eq!(merged.drain_grace_ms, 250);
        assert_eq!(merged.launcher_ready_timeout_ms, 10_000); // Default
    }

    #[test]
    fn test_merge_project_can_restate_defaults() {
        let user = layer(
            r#"
            echo_lines = true
            elevation_command = "doas"
        "#,
        );
        let project = layer(
            r#"
            echo_lines = false
            elevation_command = "sudo"
        "#,
        );

        let merged = merge_configs(Some(user), Some(project));

        assert!(!merged.echo_lines);
        assert_eq!(merged.elevation_command, "sudo");
    }

    #[test]
    fn test_merge_without_layers_is_default() {
        assert_eq!(merge_configs(None, None), ExecConfig::default());
        let user = layer("launcher_ready_timeout_ms = 2000");
        let merged = merge_configs(Some(user), None);
        assert_eq!(merged.launcher_ready_timeout_ms, 2_000);
    }

    #[test]
    fn test_layer_rejects_unknown_field() {
        let result: std::result::Result<ConfigLayer, _> = toml::from_str("hide_window = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_from_path_fills_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(PROJECT_CONFIG_FILENAME);
        fs::write(&path, "echo_lines = true\n").unwrap();
        let config = load_config_from_path(&path).unwrap();
        assert!(config.echo_lines);
        assert_eq!(config.elevation_command, "sudo");
    }

    #[test]
    fn test_validate_config_defaults_ok() {
        assert!(validate_config(&ExecConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_config_zero_timeout() {
        let config = ExecConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("timeout_secs must be greater than zero"));
    }

    #[test]
    fn test_validate_config_poll_exceeds_timeout() {
        let config = ExecConfig {
            launcher_ready_timeout_ms: 50,
            launcher_poll_interval_ms: 100,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_temp_path_is_file() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("not_a_dir");
        fs::write(&file_path, "").unwrap();

        let config = ExecConfig {
            temp_dir: Some(file_path.to_string_lossy().to_string()),
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("is not a directory"));
    }

    #[test]
    fn test_find_project_config_stops_at_git_root() {
        let temp = tempdir().unwrap();
        let repo = temp.path().join("repo");
        let nested = repo.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(repo.join(".git")).unwrap();
        // A config above the git root must not be picked up.
        fs::write(temp.path().join(PROJECT_CONFIG_FILENAME), "").unwrap();

        assert_eq!(find_project_config_path(&nested), None);

        fs::write(repo.join(PROJECT_CONFIG_FILENAME), "timeout_secs = 3").unwrap();
        let found = find_project_config_path(&nested).unwrap();
        assert_eq!(found, repo.join(PROJECT_CONFIG_FILENAME));
        let loaded = load_config_from_path(&found).unwrap();
        assert_eq!(loaded.timeout_secs, Some(3));
    }
}
