/*!
 * Fork/Exec/Wait Demo
 *
 * Forks a child that replaces itself with `/bin/ls -l`, waits for it, and
 * reports how it terminated.
 */

use fanout_supervisor::{fork_exec_wait, init_tracing, ExecRequest};
use tracing::info;

fn main() -> miette::Result<()> {
    init_tracing();

    let request = ExecRequest::new("/bin/ls").with_args(["/bin/ls", "-l"]);
    info!(
        pid = std::process::id(),
        program = %request.program,
        "Parent forking child"
    );

    let report = fork_exec_wait(&request)?;
    info!(
        child = report.pid,
        outcome = %report.outcome,
        "Child finished, parent exiting"
    );

    Ok(())
}
