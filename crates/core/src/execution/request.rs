//! Immutable description of a single invocation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CoreError;

/// What to run, against which scratch file, and for how long.
///
/// Built fresh for every invocation; there are no setters.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    program: PathBuf,
    scratch_path: PathBuf,
    timeout: Duration,
}

impl ExecutionRequest {
    /// Build a request, rejecting an empty program path or a zero timeout.
    pub fn new(
        program: impl Into<PathBuf>,
        scratch_path: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let program = program.into();
        if program.as_os_str().is_empty() {
            return Err(CoreError::Validation(
                "executable path must not be empty".to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(CoreError::Validation(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            program,
            scratch_path: scratch_path.into(),
            timeout,
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The sole argument passed to the program.
    pub fn scratch_path(&self) -> &Path {
        &self.scratch_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Human-readable command line, used in failure descriptions.
    pub fn command_line(&self) -> String {
        format!("{} {}", self.program.display(), self.scratch_path.display())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn rejects_zero_timeout() {
        let result = ExecutionRequest::new("./calc", "app.txt", Duration::ZERO);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("timeout"));
    }

    #[test]
    fn rejects_empty_program() {
        let result = ExecutionRequest::new("", "app.txt", Duration::from_secs(5));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn command_line_joins_program_and_scratch_path() {
        let request =
            ExecutionRequest::new("./calc", "app.txt", Duration::from_secs(5)).expect("valid");
        assert_eq!(request.command_line(), "./calc app.txt");
        assert_eq!(request.timeout(), Duration::from_secs(5));
    }
}
