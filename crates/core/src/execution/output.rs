//! Captured results and failure modes of an invocation.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// Raw output of a process that ran to completion.
///
/// A non-zero `exit_code` is still a completed run; callers decide what it
/// means.
#[derive(Debug, Clone)]
pub struct ExecutionOutput {
    /// Process exit code (`None` if terminated by a signal).
    pub exit_code: Option<i32>,
    /// Bytes captured from stdout.
    pub stdout: Vec<u8>,
    /// Bytes captured from stderr.
    pub stderr: Vec<u8>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl ExecutionOutput {
    /// Stdout text followed by stderr text.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
    pub fn combined(&self) -> String {
        let mut text = String::from_utf8_lossy(&self.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&self.stderr));
        text
    }
}

/// Errors that prevent an invocation from producing output.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The process outlived its deadline and its process group was killed.
    #[error("Command '{command}' timed out after {} seconds", .timeout.as_secs_f64())]
    Timeout {
        command: String,
        timeout: Duration,
        elapsed_ms: u64,
    },

    /// The program could not be started (missing, not executable, ...).
    #[error("Failed to launch '{}': {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source text could not be persisted, so nothing was launched.
    #[error("Failed to write scratch file '{}': {source}", .path.display())]
    ScratchWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The invocation itself was malformed (empty program, zero timeout).
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// Waiting on an already-running process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
