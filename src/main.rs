/*!
 * Fanout Supervisor - Main Entry Point
 *
 * Forks three workers that each sleep a random 1-9 seconds and exit with
 * the number of seconds slept, then waits for them in launch order.
 */

use fanout_supervisor::{exit_status, init_tracing, run, SupervisorConfig, SupervisorResult};
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    init_tracing();

    let result = supervise();
    let status = exit_status(&result);
    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
    }
    ExitCode::from(status)
}

fn supervise() -> SupervisorResult<()> {
    let config = SupervisorConfig::default();
    info!(
        pid = std::process::id(),
        workers = config.workers,
        min_secs = config.delay.min_secs,
        max_secs = config.delay.max_secs,
        "Supervisor process starting"
    );

    let reports = run(&config)?;

    for report in &reports {
        info!(
            worker = report.index + 1,
            pid = report.pid,
            outcome = %report.outcome,
            "Worker result"
        );
    }

    match serde_json::to_string(&reports) {
        Ok(summary) => info!(%summary, "All workers finished, supervisor exiting"),
        Err(e) => tracing::warn!(error = %e, "Could not serialize run summary"),
    }

    Ok(())
}
