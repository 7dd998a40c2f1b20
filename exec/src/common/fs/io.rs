//! # DevRS Exec Filesystem I/O Operations
//!
//! File: exec/src/common/fs/io.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Small wrappers around `std::fs` used when persisting launcher and helper
//! scripts. Every failure is reported as `ExecError::Io` carrying a short
//! description of the operation and the path involved, so that an executor
//! error message says which file could not be written.
//!
//! - **`ensure_dir_exists`**: Creates a directory (and parents) if missing; rejects paths that exist as files.
//! - **`write_string_to_file`**: Ensures the parent exists, then writes (overwriting) the content.
//!
use crate::core::error::ExecError;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path, creating it recursively if needed.
///
/// # Errors
///
/// Returns `ExecError::Io` if the path exists but is not a directory, or if creating it fails.
pub fn ensure_dir_exists(path: &Path) -> Result<(), ExecError> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| ExecError::io(format!("creating directory {:?}", path), e))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        return Err(ExecError::io(
            format!("preparing directory {:?}", path),
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "path exists but is not a directory",
            ),
        ));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Writes string content to a file path, overwriting it if it exists.
///
/// The parent directory is created first when missing.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<(), ExecError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir_exists(parent)?;
        }
    }
    fs::write(path, content).map_err(|e| ExecError::io(format!("writing {:?}", path), e))?;
    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Test `ensure_dir_exists` when the directory needs to be created, including parents.
    #[test]
    fn test_ensure_dir_exists_creates_new() {
        let base_dir = tempdir().unwrap();
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir).unwrap();
        assert!(new_dir.is_dir());
    }

    /// Test `ensure_dir_exists` when the target path exists but is a file.
    #[test]
    fn test_ensure_dir_exists_path_is_file() {
        let base_dir = tempdir().unwrap();
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello").unwrap();
        let result = ensure_dir_exists(&file_path);
        assert!(matches!(result, Err(ExecError::Io { .. })));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("path exists but is not a directory"));
    }

    /// Writing creates missing parents and overwrites existing content.
    #[test]
    fn test_write_string_to_file_overwrites() {
        let base_dir = tempdir().unwrap();
        let file_path = base_dir.path().join("scripts/launch.bat");
        write_string_to_file(&file_path, "first").unwrap();
        write_string_to_file(&file_path, "second").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "second");
    }
}
