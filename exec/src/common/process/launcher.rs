//! # DevRS Exec Windowed Launch Facility
//!
//! File: exec/src/common/process/launcher.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! The windowed launch strategy hands a launcher script to the platform's
//! window-aware launch facility (`ShellExecuteW` on Windows) and does not
//! wait for the launched program. `WindowLauncher` is the seam for that
//! facility so the strategy can be exercised with a stand-in.
//!
//! The launcher script creates a sentinel file as soon as the interpreter has
//! read it. `wait_for_sentinel` polls for that file so the executor deletes the
//! script only once it is no longer needed, instead of sleeping a fixed time.
//!
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Everything the launch facility needs for one launch.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    /// `runas` or `open`.
    pub operation: &'static str,
    /// The launcher script to run.
    pub script: &'a Path,
    /// Working directory for the launched process.
    pub working_dir: Option<&'a Path>,
    /// 0 hidden, 1 shown.
    pub show: i32,
    /// File the launcher script creates once it has been read.
    pub sentinel: &'a Path,
}

/// A fire-and-forget launch facility.
pub trait WindowLauncher: Send + Sync {
    /// Issues the launch. Returns once the facility accepted or refused it.
    fn launch(&self, request: &LaunchRequest<'_>) -> io::Result<()>;
}

/// The launch facility of the host platform.
pub fn platform_launcher() -> Box<dyn WindowLauncher> {
    #[cfg(windows)]
    {
        Box::new(shell_execute::ShellExecuteLauncher)
    }
    #[cfg(not(windows))]
    {
        Box::new(UnsupportedLauncher)
    }
}

/// Stand-in for hosts without windowed launches. Strategy selection never
/// routes to it there; it exists so an executor can always hold a launcher.
#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct UnsupportedLauncher;

#[cfg(not(windows))]
impl WindowLauncher for UnsupportedLauncher {
    fn launch(&self, request: &LaunchRequest<'_>) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!(
                "windowed launch of {:?} is not available on this platform",
                request.script
            ),
        ))
    }
}

#[cfg(windows)]
mod shell_execute {
    use super::{LaunchRequest, WindowLauncher};
    use std::ffi::OsStr;
    use std::io;
    use std::iter;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;
    use winapi::um::shellapi::ShellExecuteW;

    /// `ShellExecuteW`-backed launcher.
    #[derive(Debug, Default)]
    pub struct ShellExecuteLauncher;

    fn wide(value: &OsStr) -> Vec<u16> {
        value.encode_wide().chain(iter::once(0)).collect()
    }

    impl WindowLauncher for ShellExecuteLauncher {
        fn launch(&self, request: &LaunchRequest<'_>) -> io::Result<()> {
            let operation = wide(OsStr::new(request.operation));
            let file = wide(request.script.as_os_str());
            let directory = request.working_dir.map(|dir| wide(dir.as_os_str()));
            let directory_ptr = directory.as_ref().map_or(ptr::null(), |dir| dir.as_ptr());

            // SAFETY: every pointer refers to a NUL-terminated UTF-16 buffer that
            // outlives the call; null is accepted for the window and parameters.
            let instance = unsafe {
                ShellExecuteW(
                    ptr::null_mut(),
                    operation.as_ptr(),
                    file.as_ptr(),
                    ptr::null(),
                    directory_ptr,
                    request.show,
                )
            };

            // Values up to 32 are error codes.
            let code = instance as isize;
            if code <= 32 {
                Err(io::Error::other(format!(
                    "ShellExecute({}) failed with code {}",
                    request.operation, code
                )))
            } else {
                Ok(())
            }
        }
    }
}

/// Polls until `sentinel` exists or `timeout` elapses. Returns whether it appeared.
pub async fn wait_for_sentinel(sentinel: &Path, timeout: Duration, poll: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if tokio::fs::try_exists(sentinel).await.unwrap_or(false) {
            debug!("Launcher sentinel {:?} observed", sentinel);
            return true;
        }
        if Instant::now() >= deadline {
            warn!(
                "Launcher sentinel {:?} did not appear within {:?}",
                sentinel, timeout
            );
            return false;
        }
        tokio::time::sleep(poll).await;
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sentinel_already_present() {
        let dir = tempdir().unwrap();
        let sentinel = dir.path().join("x.ready");
        std::fs::write(&sentinel, "").unwrap();
        assert!(
            wait_for_sentinel(&sentinel, Duration::from_millis(100), Duration::from_millis(10))
                .await
        );
    }

    #[tokio::test]
    async fn test_sentinel_created_later() {
        let dir = tempdir().unwrap();
        let sentinel = dir.path().join("later.ready");
        let writer_path = sentinel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            tokio::fs::write(&writer_path, "").await.unwrap();
        });
        assert!(
            wait_for_sentinel(&sentinel, Duration::from_secs(2), Duration::from_millis(10)).await
        );
    }

    #[tokio::test]
    async fn test_sentinel_timeout() {
        let dir = tempdir().unwrap();
        let sentinel = dir.path().join("never.ready");
        assert!(
            !wait_for_sentinel(&sentinel, Duration::from_millis(40), Duration::from_millis(10))
                .await
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn test_unsupported_launcher_refuses() {
        let request = LaunchRequest {
            operation: "open",
            script: Path::new("/tmp/x.bat"),
            working_dir: None,
            show: 1,
            sentinel: Path::new("/tmp/x.ready"),
        };
        let err = platform_launcher().launch(&request).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}
