//! # DevRS Exec Temporary Scripts
//!
//! File: exec/src/common/fs/temp.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Launcher scripts (windowed/elevated launches) and helper scripts
//! (`run_script`) live for exactly one execution. `TempScript` owns such a
//! file through a `tempfile::TempPath`: it is written on creation and deleted
//! when the value is dropped, so the file goes away on every exit path,
//! including `?` early returns and panics. `TempScript::remove` deletes it explicitly when the caller wants a
//! deletion failure reported instead of logged. `TempScript::adopt` guards a
//! path that another process is expected to create (the launcher sentinel).
//!
//! File names are deterministic within a process:
//! `devrs-exec-<pid>-<sequence>.<ext>`, in the platform temp directory
//! resolved by `resolve_temp_dir`.
//!
use super::io::write_string_to_file;
use crate::common::system::{env_var, Platform};
use crate::core::error::ExecError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempPath;
use tracing::debug;

static SCRIPT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Resolves the directory for temporary scripts.
///
/// Precedence: the configured override, then the platform's temp variables
/// (`TEMP`/`TMP` on Windows, `TMPDIR` elsewhere), then `std::env::temp_dir()`.
pub fn resolve_temp_dir(platform: Platform, configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    platform
        .temp_dir_vars()
        .iter()
        .find_map(|name| env_var(name))
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

/// Builds the next script path in `dir` with the given extension.
pub fn next_script_path(dir: &Path, extension: &str) -> PathBuf {
    let sequence = SCRIPT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(
        "devrs-exec-{}-{}.{}",
        std::process::id(),
        sequence,
        extension
    ))
}

/// A script file that is deleted when dropped.
///
/// Wraps a `tempfile::TempPath`, which removes the file on drop without
/// holding an open handle to it, so the launched interpreter can read the
/// script while the guard is alive.
#[derive(Debug)]
pub struct TempScript {
    path: TempPath,
}

impl TempScript {
    /// # Create Temporary Script (`create`)
    ///
    /// Writes `body` to a fresh `devrs-exec-<pid>-<sequence>.<extension>` path
    /// in `dir` and takes ownership of the file.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Io` if `dir` cannot be created or the file cannot be written.
    pub fn create(dir: &Path, extension: &str, body: &str) -> Result<Self, ExecError> {
        Self::create_at(next_script_path(dir, extension), body)
    }

    /// Writes `body` to `path` and takes ownership of the file.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Io` if the file cannot be written. Nothing is
    /// guarded in that case.
    pub fn create_at(path: PathBuf, body: &str) -> Result<Self, ExecError> {
        write_string_to_file(&path, body)?;
        debug!("Created temporary script {:?}", path);
        Ok(TempScript {
            path: TempPath::from_path(path),
        })
    }

    /// Takes ownership of a path some other process is expected to create.
    pub fn adopt(path: PathBuf) -> Self {
        TempScript {
            path: TempPath::from_path(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Remove Temporary Script (`remove`)
    ///
    /// Deletes the file now, reporting failure to the caller instead of
    /// ignoring it as drop does. A file that never appeared (an adopted
    /// sentinel the launcher did not create) is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Io` if the file exists but cannot be deleted.
    pub fn remove(self) -> Result<(), ExecError> {
        let path = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => {
                debug!("Removed temporary script {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ExecError::io(format!("removing {:?}", path), e)),
        }
    }
}
