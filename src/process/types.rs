/*!
 * Process Types
 * Handles, outcomes, and reports for supervised workers
 */

use crate::core::types::{RawPid, WorkerIndex};
use nix::sys::signal::Signal;
use nix::sys::wait::WaitStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Spawner operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Low-level spawner errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Collect failed: {0}")]
    CollectFailed(String),
}

/// Parent-side handle to a spawned worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerHandle {
    pub index: WorkerIndex,
    pub pid: RawPid,
}

impl WorkerHandle {
    pub fn new(index: WorkerIndex, pid: RawPid) -> Self {
        Self { index, pid }
    }
}

/// How a worker terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkerOutcome {
    /// Worker called exit with this status
    NormalExit { code: i32 },
    /// Worker was killed by a signal
    AbnormalTermination { signal: i32, core_dumped: bool },
}

impl WorkerOutcome {
    pub fn signaled(signal: Signal) -> Self {
        WorkerOutcome::AbnormalTermination {
            signal: signal as i32,
            core_dumped: false,
        }
    }

    /// Classify a terminal wait status
    ///
    /// Returns `None` for non-terminal statuses (stopped, continued, still alive).
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(_, code) => Some(WorkerOutcome::NormalExit { code }),
            WaitStatus::Signaled(_, signal, core_dumped) => {
                Some(WorkerOutcome::AbnormalTermination {
                    signal: signal as i32,
                    core_dumped,
                })
            }
            _ => None,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            WorkerOutcome::NormalExit { code } => Some(*code),
            WorkerOutcome::AbnormalTermination { .. } => None,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, WorkerOutcome::NormalExit { .. })
    }

    /// Symbolic name of the terminating signal, if any
    pub fn signal_name(&self) -> Option<&'static str> {
        match self {
            WorkerOutcome::AbnormalTermination { signal, .. } => {
                Signal::try_from(*signal).ok().map(Signal::as_str)
            }
            WorkerOutcome::NormalExit { .. } => None,
        }
    }
}

impl fmt::Display for WorkerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerOutcome::NormalExit { code } => write!(f, "exited with code {}", code),
            WorkerOutcome::AbnormalTermination { signal, .. } => match self.signal_name() {
                Some(name) => write!(f, "terminated by {}", name),
                None => write!(f, "terminated by signal {}", signal),
            },
        }
    }
}

/// Collected result of one worker, in launch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkerReport {
    pub index: WorkerIndex,
    pub pid: RawPid,
    pub outcome: WorkerOutcome,
}

impl WorkerReport {
    pub fn new(handle: WorkerHandle, outcome: WorkerOutcome) -> Self {
        Self {
            index: handle.index,
            pid: handle.pid,
            outcome,
        }
    }
}
