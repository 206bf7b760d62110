//! Run configuration and its builder.

use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::executor::Cmd;
use super::stream::{InputSource, OutputSink};
use crate::trace::{DebugTracer, NoopTracer, Tracer};

/// Execution parameters shared by every run of a [`Cmd`].
///
/// A configuration never changes once built. [`RunConfig::with_dir`] makes
/// a copy that differs only in its working directory; streams, environment
/// and tracer stay shared with the original.
#[derive(Clone)]
pub struct RunConfig {
    dir: Option<PathBuf>,
    stdin: InputSource,
    stdout: OutputSink,
    stderr: OutputSink,
    env: Arc<[String]>,
    timeout: Option<Duration>,
    tracer: Arc<dyn Tracer>,
}

impl RunConfig {
    /// Working directory, or `None` to inherit the caller's.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Standard input of the child.
    pub fn stdin(&self) -> &InputSource {
        &self.stdin
    }

    /// Standard output of the child.
    pub fn stdout(&self) -> &OutputSink {
        &self.stdout
    }

    /// Standard error of the child.
    pub fn stderr(&self) -> &OutputSink {
        &self.stderr
    }

    /// `KEY=VALUE` entries replacing the inherited environment; empty
    /// means inherit.
    pub fn env(&self) -> &[String] {
        &self.env
    }

    /// Maximum run time, or `None` for no limit.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Tracer receiving lifecycle events.
    pub fn tracer(&self) -> &dyn Tracer {
        self.tracer.as_ref()
    }

    /// Copy of this configuration running in `dir` instead.
    ///
    /// An empty path means the caller's working directory.
    pub fn with_dir(&self, dir: impl AsRef<Path>) -> RunConfig {
        Self {
            dir: non_empty_dir(dir.as_ref()),
            ..self.clone()
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        CmdBuilder::new().into_config()
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("dir", &self.dir)
            .field("stdin", &self.stdin)
            .field("stdout", &self.stdout)
            .field("stderr", &self.stderr)
            .field("env", &self.env)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn non_empty_dir(dir: &Path) -> Option<PathBuf> {
    if dir.as_os_str().is_empty() {
        None
    } else {
        Some(dir.to_path_buf())
    }
}

/// Builder for [`Cmd`].
///
/// Each method sets one field; calling a method again replaces the earlier
/// value. Streams that are never set inherit the parent's standard streams.
#[derive(Default)]
pub struct CmdBuilder {
    dir: Option<PathBuf>,
    stdin: Option<InputSource>,
    stdout: Option<OutputSink>,
    stderr: Option<OutputSink>,
    env: Vec<String>,
    timeout: Duration,
    tracer: Option<Arc<dyn Tracer>>,
}

impl CmdBuilder {
    /// Create a builder with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default working directory.
    pub fn dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = non_empty_dir(dir.as_ref());
        self
    }

    /// Set the standard input source.
    pub fn stdin(mut self, source: InputSource) -> Self {
        self.stdin = Some(source);
        self
    }

    /// Read standard input from `reader`.
    pub fn stdin_reader<R: Read + Send + 'static>(self, reader: R) -> Self {
        self.stdin(InputSource::reader(reader))
    }

    /// Set the standard output sink.
    pub fn stdout(mut self, sink: impl Into<OutputSink>) -> Self {
        self.stdout = Some(sink.into());
        self
    }

    /// Write standard output to `writer`.
    pub fn stdout_writer<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.stdout(OutputSink::writer(writer))
    }

    /// Set the standard error sink.
    pub fn stderr(mut self, sink: impl Into<OutputSink>) -> Self {
        self.stderr = Some(sink.into());
        self
    }

    /// Write standard error to `writer`.
    pub fn stderr_writer<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.stderr(OutputSink::writer(writer))
    }

    /// Replace the inherited environment with `KEY=VALUE` entries.
    ///
    /// An empty list keeps the inherited environment. Entries are split at
    /// the first `=`; an entry without one cannot be expressed as a
    /// variable, so it is skipped (with a `warn` log event) when the process
    /// is built.
    pub fn env<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Set the execution timeout; zero disables it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the execution timeout in whole seconds.
    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    /// Set the execution timeout in milliseconds.
    pub fn timeout_millis(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    /// Trace executions to standard error.
    pub fn debug(self) -> Self {
        self.tracer(DebugTracer::stderr())
    }

    /// Trace executions to `out`.
    pub fn debug_to<W: Write + Send + 'static>(self, out: W) -> Self {
        self.tracer(DebugTracer::new(out))
    }

    /// Use a custom tracer.
    pub fn tracer<T: Tracer + 'static>(self, tracer: T) -> Self {
        self.shared_tracer(Arc::new(tracer))
    }

    /// Use a tracer that is also held elsewhere.
    pub fn shared_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Build the executor.
    pub fn build(self) -> Cmd {
        Cmd::with_config(self.into_config())
    }

    /// Build the configuration alone, filling in defaults.
    pub fn into_config(self) -> RunConfig {
        RunConfig {
            dir: self.dir,
            stdin: self.stdin.unwrap_or_default(),
            stdout: self.stdout.unwrap_or_default(),
            stderr: self.stderr.unwrap_or_default(),
            env: self.env.into(),
            timeout: Some(self.timeout).filter(|t| !t.is_zero()),
            tracer: self.tracer.unwrap_or_else(|| Arc::new(NoopTracer)),
        }
    }
}
