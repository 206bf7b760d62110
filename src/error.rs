//! Error types for easycmd.

use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use crate::execution::ExecutionState;

/// Main error type for command execution.
///
/// Each variant is one terminal failure class of an execution, so callers
/// can match on the outcome instead of inspecting message text.
#[derive(Error, Debug)]
pub enum EasyCmdError {
    /// The resolved command string was empty; no process was started.
    #[error("empty command")]
    EmptyCommand,

    /// The OS refused to create the process.
    #[error("cannot start command: {0}")]
    StartFailure(#[source] std::io::Error),

    /// The configured deadline elapsed and the process was killed.
    #[error("command timed out after {timeout:?}: {cause}")]
    TimeoutFailure {
        timeout: Duration,
        #[source]
        cause: RunFailure,
    },

    /// The process started but did not complete successfully.
    #[error("command did not complete successfully: {0}")]
    RuntimeFailure(#[source] RunFailure),
}

impl EasyCmdError {
    /// Check if the execution was cut short by its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutFailure { .. })
    }

    /// Lifecycle state the execution ended in.
    ///
    /// A rejected empty command never left [`ExecutionState::Idle`].
    pub fn outcome(&self) -> ExecutionState {
        match self {
            Self::EmptyCommand => ExecutionState::Idle,
            Self::StartFailure(_) => ExecutionState::StartFailed,
            Self::TimeoutFailure { .. } => ExecutionState::TimedOut,
            Self::RuntimeFailure(_) => ExecutionState::RuntimeFailed,
        }
    }

    /// Exit code reported by the child, if it exited on its own.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::RuntimeFailure(cause) => cause.exit_code(),
            _ => None,
        }
    }
}

/// What went wrong after the process was running.
#[derive(Error, Debug)]
pub enum RunFailure {
    /// The child exited with a non-success status (or was killed).
    #[error("{0}")]
    Exit(ExitStatus),

    /// Waiting on the child or pumping one of its streams failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl RunFailure {
    /// Exit code of the child, when it has one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exit(status) => status.code(),
            Self::Io(_) => None,
        }
    }
}

/// Convenience Result type for easycmd operations.
pub type Result<T> = std::result::Result<T, EasyCmdError>;
