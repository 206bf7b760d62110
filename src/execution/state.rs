//! Execution lifecycle state machine.

/// Lifecycle state of a single command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionState {
    /// Nothing has happened yet.
    #[default]
    Idle,
    /// Tracing is done and the child process is being created.
    Starting,
    /// The child process exists and is being waited on.
    Running,
    /// The child exited with a success status.
    Succeeded,
    /// The OS refused to create the child.
    StartFailed,
    /// The child exited unsuccessfully or could not be waited on.
    RuntimeFailed,
    /// The deadline elapsed and the child was killed.
    TimedOut,
}

impl ExecutionState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Idle -> Starting
    /// - Starting -> Running
    /// - Starting -> StartFailed
    /// - Running -> Succeeded
    /// - Running -> RuntimeFailed
    /// - Running -> TimedOut
    pub fn can_transition_to(&self, target: ExecutionState) -> bool {
        use ExecutionState::*;
        matches!(
            (*self, target),
            (Idle, Starting)
                | (Starting, Running)
                | (Starting, StartFailed)
                | (Running, Succeeded)
                | (Running, RuntimeFailed)
                | (Running, TimedOut)
        )
    }

    /// Move to `target`, returning whether the transition was allowed.
    ///
    /// The state is left unchanged on an invalid transition.
    pub fn advance(&mut self, target: ExecutionState) -> bool {
        if self.can_transition_to(target) {
            *self = target;
            true
        } else {
            false
        }
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        use ExecutionState::*;
        matches!(self, Succeeded | StartFailed | RuntimeFailed | TimedOut)
    }
}
