//! Boundary-facing summary of an invocation.
//!
//! Every outcome is flattened into a single `output` string, the way
//! clients of `/compile` have always read it, while [`RunStatus`] keeps the
//! outcome category machine-readable.

use serde::Serialize;

use super::output::{ExecutionError, ExecutionOutput};

/// Which of the possible outcomes an invocation ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The process ran to completion, whatever its exit code.
    Ok,
    /// The process exceeded its timeout and was killed.
    Timeout,
    /// The process could not be started.
    LaunchFailed,
    /// Anything else (scratch file not writable, invalid invocation, ...).
    Error,
}

/// Serializable result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Stdout then stderr on success, otherwise the failure description.
    pub output: String,
    pub status: RunStatus,
    /// `None` unless the process completed with an exit code.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn from_result(result: Result<ExecutionOutput, ExecutionError>) -> Self {
        match result {
            Ok(output) => Self {
                output: output.combined(),
                status: RunStatus::Ok,
                exit_code: output.exit_code,
                duration_ms: output.duration_ms,
            },
            Err(err) => {
                let (status, duration_ms) = match &err {
                    ExecutionError::Timeout { elapsed_ms, .. } => (RunStatus::Timeout, *elapsed_ms),
                    ExecutionError::Launch { .. } => (RunStatus::LaunchFailed, 0),
                    _ => (RunStatus::Error, 0),
                };
                Self {
                    output: err.to_string(),
                    status,
                    exit_code: None,
                    duration_ms,
                }
            }
        }
    }
}
