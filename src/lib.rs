/*!
 * Fanout Supervisor Library
 * Fork a fixed set of workers, collect them in launch order, report outcomes
 */

pub mod config;
pub mod core;
pub mod monitoring;
pub mod process;

// Re-exports
pub use config::{DelayConfig, SeedStrategy, SupervisorConfig};
pub use self::core::{Delay, RawPid, SupervisorError, SupervisorResult, WorkerIndex};
pub use monitoring::{init_tracing, RunSpan};
pub use process::supervisor::{exit_status, run, run_with};
pub use process::{
    fork_exec_wait, replace_current, ExecRequest, ForkSpawner, SimulatedSpawner, Spawner,
    Supervisor, WorkerEntry, WorkerOutcome, WorkerReport,
};
