/*!
 * Forking Supervisor Tests
 * Real fork/waitpid runs with shortened delay units
 */

use fanout_supervisor::process::{DelayWorker, FixedDelays, ThreadSleeper};
use fanout_supervisor::{
    run, DelayConfig, SeedStrategy, Supervisor, SupervisorConfig, WorkerOutcome,
};
use nix::sys::signal::{raise, Signal};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

fn fast_config(workers: usize) -> SupervisorConfig {
    SupervisorConfig::new(workers)
        .with_delay(DelayConfig::default().with_unit(Duration::from_millis(10)))
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[test]
#[serial]
fn test_default_fanout_reports_every_worker() {
    let reports = run(&fast_config(3)).unwrap();

    assert_eq!(reports.len(), 3);
    for (position, report) in reports.iter().enumerate() {
        assert_eq!(report.index, position);
        assert!(report.pid > 0);
        let code = report.outcome.exit_code().expect("worker should exit normally");
        assert!((1..=9).contains(&code), "exit code {} out of range", code);
    }
}

#[test]
#[serial]
fn test_zero_workers_returns_immediately() {
    let start = Instant::now();
    let reports = run(&fast_config(0)).unwrap();
    assert!(reports.is_empty());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
#[serial]
fn test_collection_order_is_launch_order() {
    // Worker 1 finishes first and worker 0 last, reports still come back 0, 1, 2
    let unit = Duration::from_millis(100);
    let delays = FixedDelays::new([5, 1, 3]).unwrap();
    let worker = DelayWorker::new(delays, ThreadSleeper, unit);
    let mut supervisor = Supervisor::forking();

    let start = Instant::now();
    let reports = supervisor.run(3, &worker).unwrap();
    let elapsed = start.elapsed();

    let indices: Vec<_> = reports.iter().map(|r| r.index).collect();
    let codes: Vec<_> = reports.iter().map(|r| r.outcome.exit_code()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(codes, vec![Some(5), Some(1), Some(3)]);

    // Workers sleep concurrently: total time tracks the longest delay, not the sum
    assert!(elapsed >= unit * 5, "finished too early: {:?}", elapsed);
    assert!(elapsed < unit * 9, "workers did not overlap: {:?}", elapsed);
}

#[test]
#[serial]
fn test_signaled_worker_does_not_stop_collection() {
    let entry = |index: usize| {
        if index == 1 {
            let _ = raise(Signal::SIGKILL);
        }
        std::thread::sleep(Duration::from_millis(20));
        index as i32 + 1
    };
    let mut supervisor = Supervisor::forking();

    let reports = supervisor.run(3, &entry).unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].outcome, WorkerOutcome::NormalExit { code: 1 });
    assert_eq!(reports[1].outcome.signal_name(), Some("SIGKILL"));
    assert_eq!(reports[2].outcome, WorkerOutcome::NormalExit { code: 3 });
}

#[test]
#[serial]
fn test_handles_match_reported_pids() {
    let entry = |_: usize| 0;
    let mut supervisor = Supervisor::forking();

    let reports = supervisor.run(2, &entry).unwrap();
    let handle_pids: Vec<_> = supervisor.handles().iter().map(|h| h.pid).collect();
    let report_pids: Vec<_> = reports.iter().map(|r| r.pid).collect();
    assert_eq!(handle_pids, report_pids);
    assert_ne!(report_pids[0], report_pids[1]);
}

#[test]
#[serial]
fn test_wall_clock_seed_correlates_siblings() {
    // Siblings seeded from the same wall-clock second draw the same delay.
    // Retry if the run straddles a second boundary.
    let config = SupervisorConfig::new(3).with_delay(
        DelayConfig::default()
            .with_unit(Duration::from_millis(1))
            .with_seed(SeedStrategy::WallClockSeconds),
    );

    for _ in 0..5 {
        let before = epoch_secs();
        let reports = run(&config).unwrap();
        if epoch_secs() != before {
            continue;
        }

        let codes: Vec<_> = reports.iter().map(|r| r.outcome.exit_code()).collect();
        assert!(codes.iter().all(|c| *c == codes[0]), "codes differ: {:?}", codes);
        return;
    }
    panic!("every attempt crossed a second boundary");
}

#[test]
#[serial]
fn test_default_seed_decorrelates_siblings() {
    // Per-process seeds differ, so a dozen siblings should not all agree.
    // All equal by chance is 9^-11.
    let config = SupervisorConfig::new(12)
        .with_delay(DelayConfig::default().with_unit(Duration::from_millis(1)));
    assert_eq!(config.delay.seed, SeedStrategy::PerProcess);

    let reports = run(&config).unwrap();
    let codes: Vec<_> = reports.iter().map(|r| r.outcome.exit_code()).collect();
    assert_eq!(codes.len(), 12);
    assert!(codes.iter().all(Option::is_some), "abnormal worker: {:?}", codes);
    assert!(codes.iter().any(|c| *c != codes[0]), "codes all equal: {:?}", codes);
}
