//! Command parsing and execution engine.
//!
//! This module provides:
//! - Quote-aware tokenizing of command strings
//! - `bash -c` / PowerShell wrapping
//! - Child process execution with stream wiring and timeouts
//!
//! # Example
//!
//! ```no_run
//! use easycmd::execution::{Cmd, SharedBuffer};
//!
//! # async fn demo() -> easycmd::Result<()> {
//! let out = SharedBuffer::new();
//! let cmd = Cmd::builder().stdout(out.clone()).timeout_secs(10).build();
//!
//! cmd.run("echo 'hello world'").await?;
//! cmd.run_shell("ls | wc -l").await?;
//! cmd.run_with_dir("pwd", "/tmp").await?;
//!
//! print!("{}", out.to_string_lossy());
//! # Ok(())
//! # }
//! ```

mod command;
mod executor;
mod options;
mod state;
mod stream;
mod tokenizer;

pub use command::{CommandLine, BASH_PREFIX, POWERSHELL_PREFIX};
pub use executor::{execute, Cmd};
pub use options::{CmdBuilder, RunConfig};
pub use state::ExecutionState;
pub use stream::{InputSource, OutputSink, SharedBuffer, SharedReader, SharedWriter};
pub use tokenizer::tokenize;
