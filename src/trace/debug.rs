//! Human-readable tracer writing diagnostic lines.

use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;

use super::Tracer;
use crate::execution::SharedWriter;

/// Writes one timestamped `[DEBUG]` line per event.
///
/// Write errors are ignored; tracing never affects an execution.
#[derive(Clone)]
pub struct DebugTracer {
    out: SharedWriter,
}

impl DebugTracer {
    /// Create a tracer writing to `out`.
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    /// Create a tracer writing to an already shared writer.
    pub fn shared(out: SharedWriter) -> Self {
        Self { out }
    }

    /// Create a tracer writing to the process's standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    fn line(&self, message: fmt::Arguments<'_>) {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f");
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{timestamp} [DEBUG] {message}");
            let _ = out.flush();
        }
    }
}

impl Default for DebugTracer {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for DebugTracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugTracer").finish_non_exhaustive()
    }
}

impl Tracer for DebugTracer {
    fn parsed_command(&self, command: &str) {
        self.line(format_args!("parsed command: {command}"));
    }

    fn execution_command(&self, name: &str, args: &[String]) {
        self.line(format_args!("program: {name}"));
        self.line(format_args!("arguments: {args:?}"));
    }

    fn execution_directory(&self, dir: &Path) {
        self.line(format_args!("directory: {}", dir.display()));
    }

    fn execution_start(&self) {
        self.line(format_args!("starting command..."));
    }

    fn timeout(&self, timeout: Duration) {
        self.line(format_args!("timeout: {timeout:?}"));
    }

    fn environment(&self, count: usize) {
        self.line(format_args!("environment: {count} entries"));
    }

    fn start_failed(&self, err: &io::Error) {
        self.line(format_args!("failed to start: {err}"));
    }

    fn execution_failed(&self, err: &dyn Error, timed_out: bool) {
        if timed_out {
            self.line(format_args!("timed out: {err}"));
        } else {
            self.line(format_args!("failed: {err}"));
        }
    }

    fn execution_completed(&self, elapsed: Duration) {
        self.line(format_args!("completed in {elapsed:?}"));
    }
}
