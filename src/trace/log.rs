//! Tracer that forwards execution events to `tracing`.

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use super::Tracer;

/// Emits each lifecycle event as a `tracing` event under the
/// `easycmd::exec` target. Failures are logged at `warn`, everything else
/// at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTracer;

impl Tracer for TracingTracer {
    fn parsed_command(&self, command: &str) {
        debug!(target: "easycmd::exec", command, "parsed command");
    }

    fn execution_command(&self, name: &str, args: &[String]) {
        debug!(target: "easycmd::exec", program = name, ?args, "resolved command");
    }

    fn execution_directory(&self, dir: &Path) {
        debug!(target: "easycmd::exec", dir = %dir.display(), "working directory");
    }

    fn execution_start(&self) {
        debug!(target: "easycmd::exec", "starting process");
    }

    fn timeout(&self, timeout: Duration) {
        debug!(target: "easycmd::exec", ?timeout, "timeout configured");
    }

    fn environment(&self, count: usize) {
        debug!(target: "easycmd::exec", count, "environment override");
    }

    fn start_failed(&self, err: &std::io::Error) {
        warn!(target: "easycmd::exec", error = %err, "failed to start process");
    }

    fn execution_failed(&self, err: &dyn Error, timed_out: bool) {
        warn!(target: "easycmd::exec", error = %err, timed_out, "process failed");
    }

    fn execution_completed(&self, elapsed: Duration) {
        debug!(target: "easycmd::exec", ?elapsed, "process completed");
    }
}
