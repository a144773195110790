/*!
 * Program Execution
 * Process image replacement, alone or inside a forked child
 */

use super::spawner::{ForkSpawner, Spawner};
use super::supervisor::Supervisor;
use super::types::WorkerReport;
use super::worker::WorkerEntry;
use crate::core::limits::EXEC_FAILURE_EXIT_CODE;
use crate::core::types::WorkerIndex;
use crate::core::{SupervisorError, SupervisorResult};
use nix::unistd::execve;
use serde::{Deserialize, Serialize};
use std::ffi::CString;
use tracing::{error, info};

/// Program to exec, with an explicit argument vector and environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExecRequest {
    pub program: String,
    /// Full argv; empty means `[program]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// `KEY=VALUE` pairs; the child inherits nothing else
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<(String, String)>,
}

impl ExecRequest {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            env_vars: vec![],
        }
    }

    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, env_vars: Vec<(String, String)>) -> Self {
        self.env_vars = env_vars;
        self
    }

    /// Convert into the C strings execve expects
    pub fn to_c_strings(&self) -> SupervisorResult<PreparedExec> {
        if self.program.trim().is_empty() {
            return Err(SupervisorError::InvalidCommand("Empty program".to_string()));
        }

        let path = c_string(&self.program)?;
        let argv = if self.args.is_empty() {
            vec![path.clone()]
        } else {
            self.args
                .iter()
                .map(|a| c_string(a))
                .collect::<SupervisorResult<Vec<_>>>()?
        };
        let envp = self
            .env_vars
            .iter()
            .map(|(k, v)| {
                if k.is_empty() || k.contains('=') {
                    return Err(SupervisorError::InvalidCommand(format!(
                        "Invalid environment variable name: {:?}",
                        k
                    )));
                }
                c_string(&format!("{}={}", k, v))
            })
            .collect::<SupervisorResult<Vec<_>>>()?;

        Ok(PreparedExec { path, argv, envp })
    }
}

fn c_string(value: &str) -> SupervisorResult<CString> {
    CString::new(value).map_err(|_| {
        SupervisorError::InvalidCommand(format!("{:?} contains a NUL byte", value))
    })
}

/// An exec request already converted to C strings
///
/// Preparing before fork surfaces validation errors in the parent.
#[derive(Debug, Clone)]
pub struct PreparedExec {
    path: CString,
    argv: Vec<CString>,
    envp: Vec<CString>,
}

impl PreparedExec {
    /// Replace the current process image; returns only on failure
    pub fn exec(&self) -> SupervisorError {
        match execve(&self.path, &self.argv, &self.envp) {
            Ok(never) => match never {},
            Err(errno) => SupervisorError::ExecFailed {
                program: self.path.to_string_lossy().into_owned(),
                reason: errno.to_string(),
            },
        }
    }
}

/// Replace the current process with `request`
///
/// Returns only if the exec could not happen.
pub fn replace_current(request: &ExecRequest) -> SupervisorError {
    let prepared = match request.to_c_strings() {
        Ok(prepared) => prepared,
        Err(e) => return e,
    };
    info!(program = %request.program, args = ?request.args, "Replacing process image");
    prepared.exec()
}

/// Worker that replaces itself with a program
#[derive(Debug, Clone)]
pub struct ExecWorker {
    prepared: PreparedExec,
}

impl ExecWorker {
    pub fn new(request: &ExecRequest) -> SupervisorResult<Self> {
        Ok(Self {
            prepared: request.to_c_strings()?,
        })
    }
}

impl WorkerEntry for ExecWorker {
    fn run(&self, index: WorkerIndex) -> i32 {
        info!(worker = index + 1, pid = std::process::id(), "Child executing program");
        let err = self.prepared.exec();
        error!(error = %err, "Child exec failed");
        EXEC_FAILURE_EXIT_CODE
    }

    fn replaces_image(&self) -> bool {
        true
    }
}

/// Fork one child that execs `request`, wait for it, and report the outcome
pub fn fork_exec_wait(request: &ExecRequest) -> SupervisorResult<WorkerReport> {
    fork_exec_wait_with(ForkSpawner::new(), request)
}

/// `fork_exec_wait` over an arbitrary spawner
pub fn fork_exec_wait_with<S: Spawner>(
    spawner: S,
    request: &ExecRequest,
) -> SupervisorResult<WorkerReport> {
    let worker = ExecWorker::new(request)?;
    let mut reports = Supervisor::new(spawner).run(1, &worker)?;
    reports.pop().ok_or_else(|| SupervisorError::CollectFailed {
        index: 0,
        pid: 0,
        reason: "no report for the exec child".to_string(),
    })
}
