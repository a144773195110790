/*!
 * Process Spawner
 * Creates worker processes and collects their termination status
 */

use super::types::{ProcessError, ProcessResult, WorkerHandle, WorkerOutcome};
use super::worker::WorkerEntry;
use crate::core::limits::CHILD_PANIC_EXIT_CODE;
use crate::core::types::WorkerIndex;
use nix::errno::Errno;
use nix::sys::wait::waitpid;
use nix::unistd::{fork, ForkResult, Pid};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Spawn and collect workers
///
/// `spawn` only ever returns in the parent: the child runs `entry` and
/// terminates with its result.
pub trait Spawner {
    fn spawn(&mut self, index: WorkerIndex, entry: &dyn WorkerEntry)
        -> ProcessResult<WorkerHandle>;

    /// Block until this specific worker has terminated
    fn collect(&mut self, handle: &WorkerHandle) -> ProcessResult<WorkerOutcome>;
}

/// Spawner backed by fork(2) and waitpid(2)
#[derive(Debug, Default)]
pub struct ForkSpawner;

impl ForkSpawner {
    pub fn new() -> Self {
        Self
    }

    /// Child side of a fork: run the entry and exit with its status
    fn run_child(index: WorkerIndex, entry: &dyn WorkerEntry) -> ! {
        let code = panic::catch_unwind(AssertUnwindSafe(|| entry.run(index)))
            .unwrap_or(CHILD_PANIC_EXIT_CODE);
        std::process::exit(code)
    }
}

impl Spawner for ForkSpawner {
    fn spawn(
        &mut self,
        index: WorkerIndex,
        entry: &dyn WorkerEntry,
    ) -> ProcessResult<WorkerHandle> {
        // SAFETY: the child only runs `entry` and then exits; it never
        // returns into the caller's stack frames.
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                debug!(worker = index, pid = child.as_raw(), "Forked worker");
                Ok(WorkerHandle::new(index, child.as_raw()))
            }
            Ok(ForkResult::Child) => Self::run_child(index, entry),
            Err(errno) => Err(ProcessError::SpawnFailed(errno.to_string())),
        }
    }

    fn collect(&mut self, handle: &WorkerHandle) -> ProcessResult<WorkerOutcome> {
        let pid = Pid::from_raw(handle.pid);
        loop {
            match waitpid(pid, None) {
                Ok(status) => match WorkerOutcome::from_wait_status(status) {
                    Some(outcome) => return Ok(outcome),
                    None => debug!(pid = handle.pid, ?status, "Non-terminal wait status"),
                },
                Err(Errno::EINTR) => {
                    warn!(pid = handle.pid, "Wait interrupted, retrying");
                }
                Err(errno) => return Err(ProcessError::CollectFailed(errno.to_string())),
            }
        }
    }
}
