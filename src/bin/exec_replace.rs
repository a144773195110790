/*!
 * Exec Replacement Demo
 *
 * Replaces this process with `/bin/ls -l` under an empty environment.
 * Anything after the exec only runs if it failed.
 */

use fanout_supervisor::{init_tracing, replace_current, ExecRequest};
use tracing::info;

fn main() -> miette::Result<()> {
    init_tracing();

    let request = ExecRequest::new("/bin/ls").with_args(["/bin/ls", "-l"]);
    info!(program = %request.program, "Preparing to exec");

    Err(replace_current(&request).into())
}
