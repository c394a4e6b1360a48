//! Entry points that tie scratch persistence to process execution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::output::{ExecutionError, ExecutionOutput};
use super::request::ExecutionRequest;
use super::scratch::{ScratchFile, ScratchPolicy};
use super::subprocess;

/// Runs one external program against submitted source text.
///
/// Holds everything that stays fixed between invocations: the program, the
/// timeout, and where scratch files go. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Runner {
    program: PathBuf,
    timeout: Duration,
    scratch_dir: PathBuf,
    policy: ScratchPolicy,
}

impl Runner {
    /// Create a runner using unique scratch files in the OS temp directory.
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            scratch_dir: std::env::temp_dir(),
            policy: ScratchPolicy::default(),
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn with_policy(mut self, policy: ScratchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn policy(&self) -> ScratchPolicy {
        self.policy
    }

    /// Persist `source`, run the program on it, and return what it printed.
    ///
    /// `label` names the scratch file under [`ScratchPolicy::Unique`]
    /// (usually the request id). The scratch file is fully written before
    /// the program starts.
    pub async fn execute(
        &self,
        source: &str,
        label: Option<&str>,
    ) -> Result<ExecutionOutput, ExecutionError> {
        let scratch = ScratchFile::write(&self.scratch_dir, self.policy, label, source).await?;
        let request = ExecutionRequest::new(&self.program, scratch.path(), self.timeout)?;

        tracing::debug!(
            command = %request.command_line(),
            source_bytes = source.len(),
            "Running calculator"
        );

        let result = subprocess::run_request(&request).await;

        match &result {
            Ok(output) => tracing::info!(
                exit_code = ?output.exit_code,
                duration_ms = output.duration_ms,
                stdout_bytes = output.stdout.len(),
                stderr_bytes = output.stderr.len(),
                "Calculator finished"
            ),
            Err(ExecutionError::Timeout { elapsed_ms, .. }) => tracing::warn!(
                elapsed_ms,
                timeout_ms = self.timeout.as_millis() as u64,
                "Calculator timed out and was killed"
            ),
            Err(e) => tracing::error!(error = %e, "Calculator could not be run"),
        }

        result
    }
}

/// Run `executable_path` against `source_text` and return stdout followed
/// by stderr as one string.
///
/// Uses a unique scratch file in the OS temp directory that is removed
/// afterwards.
pub async fn run(
    source_text: &str,
    executable_path: impl AsRef<Path>,
    timeout: Duration,
) -> Result<String, ExecutionError> {
    Runner::new(executable_path.as_ref(), timeout)
        .execute(source_text, None)
        .await
        .map(|output| output.combined())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
