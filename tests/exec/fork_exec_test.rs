/*!
 * Fork/Exec Tests
 * Children that replace themselves with /bin/sh
 */

use fanout_supervisor::process::fork_exec_wait_with;
use fanout_supervisor::{
    fork_exec_wait, ExecRequest, SimulatedSpawner, SupervisorError, WorkerOutcome,
};
use pretty_assertions::assert_eq;
use serial_test::serial;

fn sh(script: &str) -> ExecRequest {
    ExecRequest::new("/bin/sh").with_args(["sh", "-c", script])
}

#[test]
#[serial]
fn test_child_exit_code_is_reported() {
    let report = fork_exec_wait(&sh("exit 7")).unwrap();
    assert_eq!(report.index, 0);
    assert_eq!(report.outcome, WorkerOutcome::NormalExit { code: 7 });
}

#[test]
#[serial]
fn test_exec_failure_exits_child_with_one() {
    let report = fork_exec_wait(&ExecRequest::new("/nonexistent/fanout-test-binary")).unwrap();
    assert_eq!(report.outcome, WorkerOutcome::NormalExit { code: 1 });
}

#[test]
#[serial]
fn test_child_runs_with_only_given_environment() {
    // cargo exports this to test binaries; the child must not see it
    let empty = fork_exec_wait(&sh(r#"test -z "$CARGO_MANIFEST_DIR""#)).unwrap();
    assert_eq!(empty.outcome, WorkerOutcome::NormalExit { code: 0 });

    let with_var = sh(r#"test "$FANOUT_TEST" = yes"#)
        .with_env(vec![("FANOUT_TEST".to_string(), "yes".to_string())]);
    let report = fork_exec_wait(&with_var).unwrap();
    assert_eq!(report.outcome, WorkerOutcome::NormalExit { code: 0 });
}

#[test]
#[serial]
fn test_child_side_effects_are_visible() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let script = format!("echo hello > '{}'", path.display());

    let report = fork_exec_wait(&sh(&script)).unwrap();
    assert!(report.outcome.is_normal());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
}

#[test]
#[serial]
fn test_signaled_child() {
    let report = fork_exec_wait(&sh("kill -TERM $$")).unwrap();
    assert_eq!(report.outcome.signal_name(), Some("SIGTERM"));
}

#[test]
fn test_simulated_spawner_never_execs_in_process() {
    // Must come back as an error; an inline exec would replace the test binary
    let err = fork_exec_wait_with(SimulatedSpawner::new(), &ExecRequest::new("/bin/true"))
        .unwrap_err();
    match err {
        SupervisorError::SpawnFailed {
            index, orphaned, ..
        } => {
            assert_eq!(index, 0);
            assert!(orphaned.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}
