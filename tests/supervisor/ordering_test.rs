/*!
 * Supervisor Ordering Properties
 * Count, order, and failure behavior over the simulated spawner
 */

use fanout_supervisor::process::{DelayWorker, FixedDelays, Sleeper};
use fanout_supervisor::{SimulatedSpawner, Supervisor, SupervisorError, WorkerOutcome};
use nix::sys::signal::Signal;
use proptest::prelude::*;
use std::time::Duration;

/// Sleeper that returns immediately
struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

proptest! {
    #[test]
    fn prop_reports_match_launch_order(
        delays in prop::collection::vec(1u8..=9, 1..24),
        killed in prop::collection::vec(any::<bool>(), 24),
    ) {
        let count = delays.len();
        let mut spawner = SimulatedSpawner::new();
        for (index, kill) in killed.iter().take(count).enumerate() {
            if *kill {
                spawner = spawner.kill_worker(index, Signal::SIGKILL);
            }
        }

        let script = FixedDelays::new(delays.clone()).unwrap();
        let worker = DelayWorker::new(script, NoSleep, Duration::from_secs(1));
        let mut supervisor = Supervisor::new(spawner);
        let reports = supervisor.run(count, &worker).unwrap();

        prop_assert_eq!(reports.len(), count);
        for (index, report) in reports.iter().enumerate() {
            prop_assert_eq!(report.index, index);
            if killed[index] {
                prop_assert_eq!(report.outcome, WorkerOutcome::signaled(Signal::SIGKILL));
            } else {
                prop_assert_eq!(report.outcome.exit_code(), Some(i32::from(delays[index])));
            }
        }
        prop_assert_eq!(supervisor.spawner().collect_log(), supervisor.spawner().spawn_log());
    }

    #[test]
    fn prop_spawn_failure_returns_no_outcomes(
        count in 1usize..24,
        fail_seed in any::<usize>(),
    ) {
        let fail_at = fail_seed % count;
        let spawner = SimulatedSpawner::new().fail_spawn_at(fail_at);
        let mut supervisor = Supervisor::new(spawner);
        let entry = |_: usize| 1;

        let err = supervisor.run(count, &entry).unwrap_err();
        match err {
            SupervisorError::SpawnFailed { index, orphaned, .. } => {
                prop_assert_eq!(index, fail_at);
                prop_assert_eq!(orphaned.len(), fail_at);
            }
            other => {
                prop_assert!(false, "unexpected error: {}", other);
            }
        }
        prop_assert!(supervisor.spawner().collect_log().is_empty());
        prop_assert_eq!(supervisor.spawner().uncollected(), fail_at);
    }
}
