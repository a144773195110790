/*!
 * Process Module
 * Worker spawning, collection, and program execution
 */

pub mod exec;
pub mod simulated;
pub mod spawner;
pub mod supervisor;
pub mod types;
pub mod worker;

// Re-export for convenience
pub use exec::{fork_exec_wait, fork_exec_wait_with, replace_current, ExecRequest, ExecWorker};
pub use simulated::SimulatedSpawner;
pub use spawner::{ForkSpawner, Spawner};
pub use supervisor::{exit_status, run_with, Supervisor};
pub use types::{ProcessError, ProcessResult, WorkerHandle, WorkerOutcome, WorkerReport};
pub use worker::{
    DelaySource, DelayWorker, FixedDelays, RandomDelays, Sleeper, ThreadSleeper, WorkerEntry,
};
