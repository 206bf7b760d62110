//! # easycmd
//!
//! Run command strings as child processes.
//!
//! A command string such as `git commit -m 'first commit'` is split into a
//! program and its arguments with shell-like quoting, optionally wrapped
//! for `bash -c` or PowerShell, and executed with configurable streams,
//! working directory, environment, timeout and tracing.
//!
//! ## Features
//!
//! - **Quote-aware parsing**: single and double quotes group words
//! - **Shell wrapping**: hand the whole string to `bash -c` or PowerShell
//! - **Timeouts**: the child is killed when its deadline passes
//! - **Tracing**: pluggable lifecycle observer, silent by default
//!
//! ## Quick Start
//!
//! ```no_run
//! use easycmd::{Cmd, SharedBuffer};
//!
//! #[tokio::main]
//! async fn main() -> easycmd::Result<()> {
//!     // Initialize logging
//!     easycmd::logging::try_init().ok();
//!
//!     let out = SharedBuffer::new();
//!     let cmd = Cmd::builder()
//!         .stdout(out.clone())
//!         .timeout_secs(5)
//!         .debug()
//!         .build();
//!
//!     cmd.run("echo hello world").await?;
//!     assert_eq!(out.to_string_lossy(), "hello world\n");
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod trace;

// Re-export commonly used types
pub use error::{EasyCmdError, Result, RunFailure};
pub use execution::{
    tokenize, Cmd, CmdBuilder, CommandLine, ExecutionState, InputSource, OutputSink, RunConfig,
    SharedBuffer,
};
pub use trace::{DebugTracer, NoopTracer, Tracer, TracingTracer};
