//! Command execution engine.

use std::io;
use std::path::Path;
use std::process::ExitStatus;

use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::warn;

use super::command::CommandLine;
use super::options::{CmdBuilder, RunConfig};
use super::state::ExecutionState;
use super::stream::{pump_input, pump_output, InputSource, OutputSink};
use crate::error::{EasyCmdError, RunFailure};
use crate::Result;

/// Runs command strings as child processes.
///
/// A `Cmd` holds one [`RunConfig`] and can be shared freely; every run
/// reads the same configuration and nothing is mutated between runs.
#[derive(Debug, Clone, Default)]
pub struct Cmd {
    config: RunConfig,
}

impl Cmd {
    /// Create an executor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building an executor.
    pub fn builder() -> CmdBuilder {
        CmdBuilder::new()
    }

    /// Create an executor from a finished configuration.
    pub fn with_config(config: RunConfig) -> Self {
        Self { config }
    }

    /// The configuration used for every run.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run a command.
    pub async fn run(&self, command: &str) -> Result<()> {
        execute(&CommandLine::new(command), &self.config).await
    }

    /// Run a command through `bash -c`.
    pub async fn run_shell(&self, command: &str) -> Result<()> {
        execute(&CommandLine::new(command).shell_command(), &self.config).await
    }

    /// Run a command through PowerShell.
    pub async fn run_powershell(&self, command: &str) -> Result<()> {
        execute(&CommandLine::new(command).powershell_command(), &self.config).await
    }

    /// Run a command in `dir`.
    pub async fn run_with_dir(&self, command: &str, dir: impl AsRef<Path>) -> Result<()> {
        execute(&CommandLine::new(command), &self.config.with_dir(dir)).await
    }

    /// Run a command through `bash -c` in `dir`.
    pub async fn run_shell_with_dir(&self, command: &str, dir: impl AsRef<Path>) -> Result<()> {
        let config = self.config.with_dir(dir);
        execute(&CommandLine::new(command).shell_command(), &config).await
    }

    /// Run a command through PowerShell in `dir`.
    pub async fn run_powershell_with_dir(
        &self,
        command: &str,
        dir: impl AsRef<Path>,
    ) -> Result<()> {
        let config = self.config.with_dir(dir);
        execute(&CommandLine::new(command).powershell_command(), &config).await
    }
}

/// Execute `command` with `config` and wait for it to finish.
///
/// An empty command is rejected before anything is traced or started.
/// With a timeout, the child is killed once the deadline passes and the
/// call returns [`EasyCmdError::TimeoutFailure`]; it never waits past the
/// deadline for more than the time it takes to reap the killed child.
pub async fn execute(command: &CommandLine, config: &RunConfig) -> Result<()> {
    if command.is_empty() {
        return Err(EasyCmdError::EmptyCommand);
    }

    let tracer = config.tracer();
    let mut state = ExecutionState::Idle;
    enter(&mut state, ExecutionState::Starting);

    let name = command.name();
    let args = command.args();
    tracer.parsed_command(command.as_str());
    tracer.execution_command(&name, &args);
    if let Some(dir) = config.dir() {
        tracer.execution_directory(dir);
    }
    if let Some(timeout) = config.timeout() {
        tracer.timeout(timeout);
    }
    tracer.execution_start();

    let started = Instant::now();
    let deadline = config.timeout().map(|timeout| started + timeout);

    let mut cmd = Command::new(&name);
    cmd.args(&args)
        .stdin(config.stdin().stdio())
        .stdout(config.stdout().stdio())
        .stderr(config.stderr().stdio())
        .kill_on_drop(true);
    if let Some(dir) = config.dir() {
        cmd.current_dir(dir);
    }
    if !config.env().is_empty() {
        tracer.environment(config.env().len());
        cmd.env_clear().envs(env_pairs(config.env()));
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            enter(&mut state, ExecutionState::StartFailed);
            tracer.start_failed(&err);
            return Err(EasyCmdError::StartFailure(err));
        }
    };
    enter(&mut state, ExecutionState::Running);

    let mut pumps = attach_streams(&mut child, config);

    let waited = match deadline {
        Some(deadline) => timeout_at(deadline, wait_and_drain(&mut child, &mut pumps)).await,
        None => Ok(wait_and_drain(&mut child, &mut pumps).await),
    };

    let failure = match waited {
        Ok(Ok(status)) if status.success() => {
            enter(&mut state, ExecutionState::Succeeded);
            tracer.execution_completed(started.elapsed());
            return Ok(());
        }
        Ok(Ok(status)) => RunFailure::Exit(status),
        Ok(Err(err)) => RunFailure::Io(err),
        Err(_elapsed) => {
            pumps.abort();
            let cause = kill(&mut child).await;
            enter(&mut state, ExecutionState::TimedOut);
            tracer.execution_failed(&cause, true);
            return Err(EasyCmdError::TimeoutFailure {
                // Deadline is only set when a timeout is.
                timeout: config.timeout().unwrap_or_default(),
                cause,
            });
        }
    };

    enter(&mut state, ExecutionState::RuntimeFailed);
    tracer.execution_failed(&failure, false);
    Err(EasyCmdError::RuntimeFailure(failure))
}

/// Move an execution to its next lifecycle state.
fn enter(state: &mut ExecutionState, next: ExecutionState) {
    let from = *state;
    let moved = state.advance(next);
    debug_assert!(moved, "invalid execution transition {from:?} -> {next:?}");
}

/// Split `KEY=VALUE` entries at the first `=`.
///
/// An entry without `=` names no variable and is skipped with a warning.
fn env_pairs<'a>(entries: &'a [String]) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    entries.iter().filter_map(|entry| {
        let pair = entry.split_once('=');
        if pair.is_none() {
            warn!(target: "easycmd::exec", %entry, "skipping environment entry without '='");
        }
        pair
    })
}

/// Wait for the child to exit, then for its output to be fully copied.
async fn wait_and_drain(child: &mut Child, pumps: &mut Pumps) -> io::Result<ExitStatus> {
    let status = child.wait().await?;
    pumps.finish().await?;
    Ok(status)
}

/// Kill a child that outlived its deadline and reap it.
async fn kill(child: &mut Child) -> RunFailure {
    // Exited already, with output still open in a grandchild.
    if let Ok(Some(status)) = child.try_wait() {
        return RunFailure::Exit(status);
    }
    if let Err(err) = child.kill().await {
        return RunFailure::Io(err);
    }
    match child.try_wait() {
        Ok(Some(status)) => RunFailure::Exit(status),
        Ok(None) => RunFailure::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "process still running after kill",
        )),
        Err(err) => RunFailure::Io(err),
    }
}

/// Connect caller-supplied streams to the child's pipes.
fn attach_streams(child: &mut Child, config: &RunConfig) -> Pumps {
    if let (InputSource::Reader(reader), Some(stdin)) = (config.stdin(), child.stdin.take()) {
        pump_input(reader.clone(), stdin);
    }

    let mut handles = Vec::with_capacity(2);
    if let (OutputSink::Writer(writer), Some(stdout)) = (config.stdout(), child.stdout.take()) {
        handles.push(pump_output(stdout, writer.clone()));
    }
    if let (OutputSink::Writer(writer), Some(stderr)) = (config.stderr(), child.stderr.take()) {
        handles.push(pump_output(stderr, writer.clone()));
    }

    Pumps { handles }
}

/// Background copies of the child's output pipes.
///
/// Copies still running when this is dropped are aborted.
struct Pumps {
    handles: Vec<JoinHandle<io::Result<()>>>,
}

impl Pumps {
    async fn finish(&mut self) -> io::Result<()> {
        while let Some(handle) = self.handles.last_mut() {
            let result = handle.await;
            self.handles.pop();
            result.map_err(io::Error::other)??;
        }
        Ok(())
    }

    fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

impl Drop for Pumps {
    fn drop(&mut self) {
        self.abort();
    }
}
