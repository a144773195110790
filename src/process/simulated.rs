/*!
 * Simulated Spawner
 *
 * In-memory spawner that runs each entry inline instead of forking.
 * Supports injecting spawn failures and signal terminations so the
 * supervisor's error paths can be exercised deterministically.
 * Entries that replace the process image are refused unless the worker
 * is scripted to be killed, since running them inline would exec the
 * caller.
 */

use super::spawner::Spawner;
use super::types::{ProcessError, ProcessResult, WorkerHandle, WorkerOutcome};
use super::worker::WorkerEntry;
use crate::core::types::{RawPid, WorkerIndex};
use nix::sys::signal::Signal;
use std::collections::HashMap;

/// First pid handed out by the simulated spawner
const FIRST_SIMULATED_PID: RawPid = 1000;

/// Spawner that never creates a real process
///
/// Entries that replace the process image fail to spawn unless killed.
#[derive(Debug, Default)]
pub struct SimulatedSpawner {
    fail_at: Option<WorkerIndex>,
    killed: HashMap<WorkerIndex, Signal>,
    finished: HashMap<RawPid, WorkerOutcome>,
    spawn_log: Vec<WorkerIndex>,
    collect_log: Vec<WorkerIndex>,
    next_pid: RawPid,
}

impl SimulatedSpawner {
    pub fn new() -> Self {
        Self {
            next_pid: FIRST_SIMULATED_PID,
            ..Default::default()
        }
    }

    /// Make the spawn of worker `index` fail
    pub fn fail_spawn_at(mut self, index: WorkerIndex) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Terminate worker `index` with `signal` instead of letting it exit
    pub fn kill_worker(mut self, index: WorkerIndex, signal: Signal) -> Self {
        self.killed.insert(index, signal);
        self
    }

    /// Worker indices in the order they were spawned
    pub fn spawn_log(&self) -> &[WorkerIndex] {
        &self.spawn_log
    }

    /// Worker indices in the order they were collected
    pub fn collect_log(&self) -> &[WorkerIndex] {
        &self.collect_log
    }

    /// Workers spawned but never collected
    pub fn uncollected(&self) -> usize {
        self.finished.len()
    }
}

impl Spawner for SimulatedSpawner {
    fn spawn(
        &mut self,
        index: WorkerIndex,
        entry: &dyn WorkerEntry,
    ) -> ProcessResult<WorkerHandle> {
        if self.fail_at == Some(index) {
            return Err(ProcessError::SpawnFailed(
                "EAGAIN: Resource temporarily unavailable".to_string(),
            ));
        }

        let outcome = match self.killed.get(&index) {
            Some(signal) => WorkerOutcome::signaled(*signal),
            None if entry.replaces_image() => {
                return Err(ProcessError::SpawnFailed(
                    "entry replaces the process image and cannot run inline".to_string(),
                ));
            }
            None => WorkerOutcome::NormalExit {
                code: entry.run(index),
            },
        };

        let pid = self.next_pid;
        self.next_pid += 1;

        self.finished.insert(pid, outcome);
        self.spawn_log.push(index);
        Ok(WorkerHandle::new(index, pid))
    }

    fn collect(&mut self, handle: &WorkerHandle) -> ProcessResult<WorkerOutcome> {
        let outcome = self.finished.remove(&handle.pid).ok_or_else(|| {
            ProcessError::CollectFailed("ECHILD: No child processes".to_string())
        })?;
        self.collect_log.push(handle.index);
        Ok(outcome)
    }
}
