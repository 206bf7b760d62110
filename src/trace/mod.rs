//! Execution tracing hooks.
//!
//! An executor reports each lifecycle step of an execution to a [`Tracer`]
//! carried in its configuration. The tracer only observes: nothing it does
//! changes the result of the execution.
//!
//! - [`NoopTracer`] ignores everything and is the default.
//! - [`DebugTracer`] writes timestamped `[DEBUG]` lines to a writer.
//! - [`TracingTracer`] forwards events to the `tracing` ecosystem.

mod debug;
mod log;

pub use debug::DebugTracer;
pub use log::TracingTracer;

use std::error::Error;
use std::path::Path;
use std::time::Duration;

/// Observer of execution lifecycle events.
///
/// Methods are called in lifecycle order from the task running the
/// execution. Implementations must be shareable, since one executor may run
/// several executions at once.
pub trait Tracer: Send + Sync {
    /// The command string about to be executed, after any wrapping.
    fn parsed_command(&self, command: &str);

    /// The resolved program and arguments.
    fn execution_command(&self, name: &str, args: &[String]);

    /// The working directory, when one is set.
    fn execution_directory(&self, dir: &Path);

    /// The process is about to be started.
    fn execution_start(&self);

    /// The configured timeout, when one is set.
    fn timeout(&self, timeout: Duration);

    /// Number of environment entries replacing the inherited environment.
    fn environment(&self, count: usize);

    /// The process could not be started.
    fn start_failed(&self, err: &std::io::Error);

    /// The process ran but did not succeed.
    fn execution_failed(&self, err: &dyn Error, timed_out: bool);

    /// The process exited successfully after `elapsed`.
    fn execution_completed(&self, elapsed: Duration);
}

/// A tracer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn parsed_command(&self, _command: &str) {}
    fn execution_command(&self, _name: &str, _args: &[String]) {}
    fn execution_directory(&self, _dir: &Path) {}
    fn execution_start(&self) {}
    fn timeout(&self, _timeout: Duration) {}
    fn environment(&self, _count: usize) {}
    fn start_failed(&self, _err: &std::io::Error) {}
    fn execution_failed(&self, _err: &dyn Error, _timed_out: bool) {}
    fn execution_completed(&self, _elapsed: Duration) {}
}
