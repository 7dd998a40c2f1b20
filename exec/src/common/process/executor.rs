//! # DevRS Exec Command Executor
//!
//! File: exec/src/common/process/executor.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/devrs
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! `CommandExecutor` runs a `CommandSpec` and keeps the `ExecutionResult` of
//! the most recent run. One executor runs one command at a time (`execute`
//! takes `&mut self`); it can be reused, and each run starts by clearing the
//! previously captured lines.
//!
//! ## Architecture
//!
//! 1. Validate the spec (blank program -> `InvalidCommand`, before anything is spawned or written).
//! 2. Clear captured lines and pick a `Strategy` for the spec and platform.
//! 3. **Windowed launch**: write the launcher script, hand it to the
//!    `WindowLauncher`, wait for the sentinel, delete script and sentinel.
//!    No output is captured and the exit code is left alone.
//! 4. **Shell-wrapped / direct**: spawn with piped stdout/stderr, start one
//!    reader task per stream, then race the child's exit against the
//!    `InterruptHandle` and the optional timeout. Both readers are joined
//!    before the lines are stored, so the captured output is complete.
//!    A killed child gets `drain_grace_ms` for its readers to finish. After a
//!    normal exit the readers are bounded by the rest of the configured
//!    timeout, so a background grandchild holding a pipe open cannot keep the
//!    call waiting past it.
//!
//! `run_script` writes an inline script to a `TempScript`, runs it through
//! the platform interpreter and removes the file on every exit path.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut executor = CommandExecutor::new();
//! let spec = CommandSpec::builder("echo").args("hello world").build()?;
//! let result = executor.execute(&spec).await?;
//! assert_eq!(result.raw_lines(), ["hello world"]);
//! assert_eq!(result.exit_code(), 0);
//! ```
//!
use super::drain::{join_reader, spawn_line_reader, StreamKind};
use super::interrupt::InterruptHandle;
use super::launcher::{platform_launcher, wait_for_sentinel, LaunchRequest, WindowLauncher};
use super::result::ExecutionResult;
use super::spec::{CommandSpec, CommandSpecBuilder};
use super::strategy::{
    build_invocation, launch_operation, render_launcher, script_command, select_strategy,
    window_show_flag, Invocation, Strategy,
};
use crate::common::fs::temp::{next_script_path, resolve_temp_dir, TempScript};
use crate::common::system::Platform;
use crate::core::config::ExecConfig;
use crate::core::error::ExecError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// How waiting for the child ended.
enum WaitOutcome {
    Exited(io::Result<ExitStatus>),
    Interrupted,
    TimedOut(Duration),
}

/// Runs commands and keeps the result of the latest run.
pub struct CommandExecutor {
    config: ExecConfig,
    platform: Platform,
    launcher: Box<dyn WindowLauncher>,
    interrupt: InterruptHandle,
    result: ExecutionResult,
}

impl CommandExecutor {
    /// An executor with default configuration for the host platform.
    pub fn new() -> Self {
        Self::with_config(ExecConfig::default())
    }

    /// # Executor With Configuration (`with_config`)
    ///
    /// An executor for the host platform using `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Timeouts, temp directory and elevation command, usually
    ///   from `core::config::load_config`. The executor never reads
    ///   configuration files itself.
    ///
    /// # Returns
    ///
    /// An executor with the platform's launch facility, a fresh
    /// `InterruptHandle` and an empty result (exit code 0).
    pub fn with_config(config: ExecConfig) -> Self {
        let platform = Platform::current();
        CommandExecutor {
            config,
            platform,
            launcher: platform_launcher(),
            interrupt: InterruptHandle::new(),
            result: ExecutionResult::new(platform),
        }
    }

    /// Overrides the platform used for strategy selection and rendering.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self.result = ExecutionResult::new(platform);
        self
    }

    /// Replaces the windowed launch facility.
    pub fn with_launcher(mut self, launcher: Box<dyn WindowLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// The configuration this executor was built with.
    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// The platform strategies are selected for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Handle for interrupting a run from another task or thread.
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    /// Result of the most recent run, including partial output of a failed one.
    pub fn result(&self) -> &ExecutionResult {
        &self.result
    }

    /// Consumes the executor, keeping the result of its most recent run.
    pub fn into_result(self) -> ExecutionResult {
        self.result
    }

    /// # Execute Command (`execute`)
    ///
    /// Runs `spec` with its flags as configured.
    ///
    /// # Arguments
    ///
    /// * `spec` - The command to run. Its line callbacks are invoked while
    ///   the output is read.
    ///
    /// # Returns
    ///
    /// The result of this run: captured stdout/stderr lines and the exit code.
    /// A windowed launch captures nothing and keeps the previous exit code.
    ///
    /// # Errors
    ///
    /// - `InvalidCommand` for a blank program or unparsable arguments.
    /// - `ProcessLaunch` when the OS (or the launch facility) refuses to start it.
    /// - `Interrupted` / `TimedOut` when waiting is abandoned; the child is killed.
    /// - `Io` for stream, script write or script removal failures.
    pub async fn execute(&mut self, spec: &CommandSpec) -> Result<&ExecutionResult, ExecError> {
        self.run(spec).await?;
        Ok(&self.result)
    }

    /// Runs `spec` elevated with a visible window (so `keep_window_open` applies).
    ///
    /// # Errors
    ///
    /// As `execute`. A blank program fails before the spec is copied.
    pub async fn execute_elevated(
        &mut self,
        spec: &CommandSpec,
    ) -> Result<&ExecutionResult, ExecError> {
        spec.validate()?;
        self.run(&spec.as_elevated()).await?;
        Ok(&self.result)
    }

    /// Writes `body` to a temporary script and runs it with the platform
    /// interpreter (`cscript.exe` on Windows, `sh` elsewhere), passing `args`.
    /// The script is removed whether or not the run succeeds.
    pub async fn run_script(
        &mut self,
        body: &str,
        args: &str,
    ) -> Result<&ExecutionResult, ExecError> {
        self.run_script_with(body, args, |builder| builder).await
    }

    /// # Run Script With Options (`run_script_with`)
    ///
    /// Like `run_script`, but lets the caller adjust the interpreter's spec
    /// before it runs, typically to install line callbacks.
    ///
    /// # Arguments
    ///
    /// * `body` - The script source, written verbatim to the temporary file.
    /// * `args` - Argument text passed to the script after its path.
    /// * `configure` - Receives the builder for the interpreter invocation
    ///   (program and arguments already set) and returns it adjusted.
    ///
    /// # Errors
    ///
    /// Everything `execute` can return, plus `Io` when the script cannot be
    /// written or removed.
    pub async fn run_script_with<F>(
        &mut self,
        body: &str,
        args: &str,
        configure: F,
    ) -> Result<&ExecutionResult, ExecError>
    where
        F: FnOnce(CommandSpecBuilder) -> CommandSpecBuilder,
    {
        let dir = self.temp_dir();
        // Dropping `script` on any early return below deletes the file.
        let script = TempScript::create(&dir, self.platform.script_extension(), body)?;
        let (program, script_args) = script_command(self.platform, script.path(), args);
        let spec = configure(CommandSpec::builder(program).args(script_args)).build()?;
        self.run(&spec).await?;
        script.remove()?;
        Ok(&self.result)
    }

    #[instrument(skip(self, spec), fields(program = %spec.program()))]
    async fn run(&mut self, spec: &CommandSpec) -> Result<(), ExecError> {
        spec.validate()?;
        self.result.clear_lines();

        let strategy = select_strategy(spec, self.platform);
        info!(
            "Executing '{}' via {} strategy (elevate: {}, hide window: {})",
            spec.command_line(),
            strategy,
            spec.elevate(),
            spec.hide_window()
        );

        match strategy {
            Strategy::WindowedLaunch => self.launch_windowed(spec).await,
            Strategy::ShellWrapped | Strategy::Direct => {
                let invocation = build_invocation(spec, strategy, &self.config.elevation_command)?;
                self.spawn_and_capture(spec, &invocation).await
            }
        }
    }

    fn temp_dir(&self) -> PathBuf {
        resolve_temp_dir(self.platform, self.config.temp_dir_override().as_deref())
    }

    async fn launch_windowed(&mut self, spec: &CommandSpec) -> Result<(), ExecError> {
        let script_path = next_script_path(&self.temp_dir(), self.platform.launcher_extension());
        let sentinel = TempScript::adopt(script_path.with_extension("ready"));
        let script = TempScript::create_at(script_path, &render_launcher(spec, sentinel.path()))?;

        let request = LaunchRequest {
            operation: launch_operation(spec),
            script: script.path(),
            working_dir: spec.working_dir(),
            show: window_show_flag(spec),
            sentinel: sentinel.path(),
        };
        debug!("Issuing windowed launch: {:?}", request);
        self.launcher
            .launch(&request)
            .map_err(|source| ExecError::ProcessLaunch {
                program: spec.program().to_string(),
                source,
            })?;

        let interrupt = self.interrupt.clone();
        let ready = tokio::select! {
            ready = wait_for_sentinel(
                sentinel.path(),
                self.config.launcher_ready_timeout(),
                self.config.launcher_poll_interval(),
            ) => ready,
            _ = interrupt.requested() => {
                warn!("Interrupted while waiting for the launcher of '{}'", spec.program());
                return Err(ExecError::Interrupted {
                    program: spec.program().to_string(),
                });
            }
        };
        if !ready {
            warn!(
                "Launcher for '{}' never signalled it started; removing it anyway",
                spec.program()
            );
        }

        script.remove()?;
        sentinel.remove()?;
        info!("Windowed launch of '{}' issued", spec.program());
        Ok(())
    }

    async fn spawn_and_capture(
        &mut self,
        spec: &CommandSpec,
        invocation: &Invocation,
    ) -> Result<(), ExecError> {
        debug!("Spawning: {}", invocation.display());
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(tail) = &invocation.raw_tail {
            append_raw(&mut command, tail);
        }
        if let Some(dir) = spec.working_dir() {
            command.current_dir(dir);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| ExecError::ProcessLaunch {
            program: invocation.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take().ok_or_else(|| missing_pipe(StreamKind::Stdout))?;
        let stderr = child.stderr.take().ok_or_else(|| missing_pipe(StreamKind::Stderr))?;
        let out_reader = spawn_line_reader(
            stdout,
            StreamKind::Stdout,
            spec.on_output_line().cloned(),
        );
        let err_reader = spawn_line_reader(
            stderr,
            StreamKind::Stderr,
            spec.on_error_line().cloned(),
        );

        let started = Instant::now();
        let outcome = self.wait_for_exit(&mut child).await;
        let grace = match outcome {
            // Output may still be buffered in the pipes; readers get whatever
            // remains of the timeout (at least the drain grace) to finish it.
            WaitOutcome::Exited(_) => self.config.timeout().map(|timeout| {
                timeout
                    .saturating_sub(started.elapsed())
                    .max(self.config.drain_grace())
            }),
            WaitOutcome::Interrupted | WaitOutcome::TimedOut(_) => {
                kill_and_reap(&mut child).await;
                Some(self.config.drain_grace())
            }
        };

        let (out, err) = tokio::join!(
            join_reader(out_reader, grace),
            join_reader(err_reader, grace),
        );
        if out.abandoned || err.abandoned {
            warn!(
                "Output of '{}' was still open when waiting ended; later lines are dropped",
                spec.program()
            );
        }
        self.result.set_output_lines(out.lines);
        self.result.set_error_lines(err.lines);

        let program = spec.program().to_string();
        match outcome {
            WaitOutcome::Exited(Ok(status)) => {
                let code = exit_code_of(status);
                self.result.set_exit_code(code);
                info!("'{}' exited with code {}", program, code);
                match out.error.or(err.error) {
                    Some(e) => Err(e),
                    None => Ok(()),
                }
            }
            WaitOutcome::Exited(Err(e)) => Err(ExecError::io(format!("waiting for '{program}'"), e)),
            WaitOutcome::Interrupted => {
                warn!("Interrupted while waiting for '{}'; child killed", program);
                Err(ExecError::Interrupted { program })
            }
            WaitOutcome::TimedOut(timeout) => {
                warn!("'{}' timed out after {:?}; child killed", program, timeout);
                Err(ExecError::TimedOut { program, timeout })
            }
        }
    }

    async fn wait_for_exit(&self, child: &mut Child) -> WaitOutcome {
        let interrupt = self.interrupt.clone();
        let timeout = self.config.timeout();
        tokio::select! {
            status = child.wait() => WaitOutcome::Exited(status),
            _ = interrupt.requested() => WaitOutcome::Interrupted,
            _ = sleep_or_pending(timeout) => {
                WaitOutcome::TimedOut(timeout.unwrap_or_default())
            }
        }
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("config", &self.config)
            .field("platform", &self.platform)
            .field("result", &self.result)
            .finish()
    }
}

/// Builds a spec for `program`/`args`, runs it on a fresh executor and returns the result.
pub async fn run_command(program: &str, args: &str) -> Result<ExecutionResult, ExecError> {
    let spec = CommandSpec::builder(program).args(args).build()?;
    let mut executor = CommandExecutor::new();
    executor.execute(&spec).await?;
    Ok(executor.into_result())
}

/// Runs an inline script on a fresh executor and returns the result.
pub async fn run_script(body: &str, args: &str) -> Result<ExecutionResult, ExecError> {
    let mut executor = CommandExecutor::new();
    executor.run_script(body, args).await?;
    Ok(executor.into_result())
}

async fn sleep_or_pending(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => std::future::pending::<()>().await,
    }
}

async fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        warn!("Failed to kill child: {}", e);
    }
    if let Err(e) = child.wait().await {
        warn!("Failed to reap killed child: {}", e);
    }
}

fn missing_pipe(kind: StreamKind) -> ExecError {
    ExecError::io(
        format!("capturing child {:?}", kind),
        io::Error::other("stream was not piped"),
    )
}

#[cfg(windows)]
fn append_raw(command: &mut Command, tail: &str) {
    command.raw_arg(tail);
}

#[cfg(not(windows))]
fn append_raw(command: &mut Command, tail: &str) {
    command.arg(tail);
}

/// Exit code of a finished child. Signal deaths map to `128 + signal`; `-1` if unknown.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
