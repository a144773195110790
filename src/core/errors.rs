/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use super::limits::FATAL_EXIT_CODE;
use super::types::{RawPid, WorkerIndex};
use miette::Diagnostic;
use thiserror::Error;

/// Supervisor operation result
pub type SupervisorResult<T> = Result<T, SupervisorError>;

/// Fatal supervisor errors
///
/// A worker killed by a signal is not an error: it is reported as
/// `WorkerOutcome::AbnormalTermination` and collection continues.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SupervisorError {
    #[error("Failed to spawn worker {index}: {reason}")]
    #[diagnostic(
        code(supervisor::spawn_failed),
        help("The OS refused to create another process. Already-spawned workers keep running unattended.")
    )]
    SpawnFailed {
        index: WorkerIndex,
        /// Pids of workers spawned before the failure, left running
        orphaned: Vec<RawPid>,
        reason: String,
    },

    #[error("Failed to collect worker {index} (PID {pid}): {reason}")]
    #[diagnostic(
        code(supervisor::collect_failed),
        help("The worker may have been reaped elsewhere. Check for competing waiters.")
    )]
    CollectFailed {
        index: WorkerIndex,
        pid: RawPid,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(supervisor::invalid_config),
        help("Delays must satisfy 1 <= min <= max and the worker count must stay within limits.")
    )]
    InvalidConfig(String),

    #[error("Invalid command: {0}")]
    #[diagnostic(
        code(exec::invalid_command),
        help("Program paths and arguments must be non-empty and free of NUL bytes.")
    )]
    InvalidCommand(String),

    #[error("Failed to exec '{program}': {reason}")]
    #[diagnostic(
        code(exec::exec_failed),
        help("Check that the program exists and is executable.")
    )]
    ExecFailed { program: String, reason: String },
}

impl SupervisorError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        FATAL_EXIT_CODE
    }

    /// Workers left running when the run aborted
    pub fn orphaned(&self) -> &[RawPid] {
        match self {
            SupervisorError::SpawnFailed { orphaned, .. } => orphaned,
            _ => &[],
        }
    }
}
