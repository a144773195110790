/*!
 * Fixed-Fanout Supervisor
 *
 * Spawns every worker up front, then collects them one at a time in
 * launch order. A worker that finishes early waits as a zombie until its
 * turn comes.
 */

use super::spawner::{ForkSpawner, Spawner};
use super::types::{WorkerHandle, WorkerReport};
use super::worker::{DelayWorker, WorkerEntry};
use crate::config::SupervisorConfig;
use crate::core::{SupervisorError, SupervisorResult};
use crate::monitoring::RunSpan;
use tracing::{error, info, warn};

/// Launches a fixed number of workers and reports their outcomes
pub struct Supervisor<S: Spawner> {
    spawner: S,
    handles: Vec<WorkerHandle>,
}

impl Supervisor<ForkSpawner> {
    /// Supervisor that forks real worker processes
    pub fn forking() -> Self {
        Self::new(ForkSpawner::new())
    }
}

impl<S: Spawner> Supervisor<S> {
    pub fn new(spawner: S) -> Self {
        Self {
            spawner,
            handles: Vec::new(),
        }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Handles of workers spawned by the last run, in launch order
    pub fn handles(&self) -> &[WorkerHandle] {
        &self.handles
    }

    /// Spawn `count` workers running `entry` and collect them in launch order
    ///
    /// Aborts on the first spawn failure without touching the workers that
    /// were already started.
    pub fn run(
        &mut self,
        count: usize,
        entry: &dyn WorkerEntry,
    ) -> SupervisorResult<Vec<WorkerReport>> {
        let run_span = RunSpan::new(count);
        let _entered = run_span.enter();

        info!(pid = std::process::id(), workers = count, "Supervisor starting");

        if let Err(e) = self.spawn_all(count, entry) {
            run_span.record_error(&e.to_string());
            return Err(e);
        }

        let mut reports = Vec::with_capacity(count);
        for handle in &self.handles {
            info!(
                worker = handle.index + 1,
                pid = handle.pid,
                "Waiting for worker"
            );

            let outcome = match self.spawner.collect(handle) {
                Ok(outcome) => outcome,
                Err(e) => {
                    let err = SupervisorError::CollectFailed {
                        index: handle.index,
                        pid: handle.pid,
                        reason: e.to_string(),
                    };
                    error!(error = %err, "Collection failed");
                    run_span.record_error(&err.to_string());
                    return Err(err);
                }
            };

            match outcome.exit_code() {
                Some(code) => info!(
                    worker = handle.index + 1,
                    pid = handle.pid,
                    code,
                    "Worker exited normally"
                ),
                None => warn!(
                    worker = handle.index + 1,
                    pid = handle.pid,
                    outcome = %outcome,
                    "Worker terminated abnormally"
                ),
            }

            reports.push(WorkerReport::new(*handle, outcome));
            run_span.record_collected(reports.len());
        }

        info!(workers = count, "All workers collected");
        run_span.record_success();
        Ok(reports)
    }

    fn spawn_all(&mut self, count: usize, entry: &dyn WorkerEntry) -> SupervisorResult<()> {
        self.handles.clear();
        self.handles.reserve(count);

        for index in 0..count {
            match self.spawner.spawn(index, entry) {
                Ok(handle) => self.handles.push(handle),
                Err(e) => {
                    let orphaned: Vec<_> = self.handles.iter().map(|h| h.pid).collect();
                    error!(
                        worker = index + 1,
                        error = %e,
                        orphaned = ?orphaned,
                        "Spawn failed, abandoning running workers"
                    );
                    return Err(SupervisorError::SpawnFailed {
                        index,
                        orphaned,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Run the fan-out described by `config` with forked, randomly delayed workers
pub fn run(config: &SupervisorConfig) -> SupervisorResult<Vec<WorkerReport>> {
    run_with(ForkSpawner::new(), config)
}

/// `run` over an arbitrary spawner
pub fn run_with<S: Spawner>(
    spawner: S,
    config: &SupervisorConfig,
) -> SupervisorResult<Vec<WorkerReport>> {
    config.validate()?;
    let worker = DelayWorker::from_config(&config.delay);
    Supervisor::new(spawner).run(config.workers, &worker)
}

/// Process exit status for the outcome of a run
///
/// Abnormal worker terminations are part of a successful run and map to 0.
pub fn exit_status<T>(result: &SupervisorResult<T>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(e) => e.exit_code(),
    }
}
