//! Spawn, capture, and bound a child process.
//!
//! Provides [`run_request`], which launches the program named by an
//! [`ExecutionRequest`] with the scratch path as its only argument and an
//! empty stdin, collects stdout and stderr into separate buffers, and
//! enforces the request's wall-clock timeout.
//!
//! The child is started as the leader of a new process group. When the run
//! ends, whether by completion, timeout, or the returned future being
//! dropped, the whole group is sent `SIGKILL`, so helpers the program
//! forked never outlive it.

use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::output::{ExecutionError, ExecutionOutput};
use super::request::ExecutionRequest;

/// Maximum stdout or stderr size captured per stream (10 MiB).
///
/// Anything past the limit is read and discarded so the child never stalls
/// on a full pipe.
pub const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Run `request` to completion, timeout, or launch failure.
pub async fn run_request(request: &ExecutionRequest) -> Result<ExecutionOutput, ExecutionError> {
    let mut cmd = Command::new(request.program());
    cmd.arg(request.scratch_path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true);

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(|source| ExecutionError::Launch {
        program: request.program().to_path_buf(),
        source,
    })?;
    let mut group = ProcessGroupGuard::new(child.id());

    let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
    let stderr_task = tokio::spawn(read_stream(child.stderr.take()));
    let stdout_abort = stdout_task.abort_handle();
    let stderr_abort = stderr_task.abort_handle();

    // One deadline covers both the exit and the draining of both pipes: a
    // background helper holding a pipe open counts against the timeout.
    let completed = tokio::time::timeout(request.timeout(), async {
        let status = child.wait().await?;
        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();
        Ok::<_, std::io::Error>((status, stdout, stderr))
    })
    .await;

    match completed {
        Ok(Ok((status, stdout, stderr))) => {
            // The leader is reaped, but detached helpers may remain; the
            // group id stays reserved while any of them is alive.
            group.kill();
            group.disarm();
            Ok(ExecutionOutput {
                exit_code: status.code(),
                stdout,
                stderr,
                duration_ms: start.elapsed().as_millis() as u64,
            })
        }
        Ok(Err(e)) => Err(ExecutionError::Io(e)),
        Err(_elapsed) => {
            group.kill();
            stdout_abort.abort();
            stderr_abort.abort();
            // Reap the leader so no zombie is left behind.
            if let Err(e) = child.wait().await {
                tracing::warn!(error = %e, "Failed to reap timed-out process");
            }
            group.disarm();
            Err(ExecutionError::Timeout {
                command: request.command_line(),
                timeout: request.timeout(),
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
        let _ = tokio::io::copy(&mut h, &mut tokio::io::sink()).await;
    }
    buf
}

/// Kills the child's process group when dropped, unless disarmed.
///
/// Armed from spawn until the run has finished with the group.
struct ProcessGroupGuard {
    pgid: Option<libc::pid_t>,
}

impl ProcessGroupGuard {
    fn new(pid: Option<u32>) -> Self {
        Self {
            pgid: pid.and_then(|p| libc::pid_t::try_from(p).ok()),
        }
    }

    fn kill(&self) {
        if let Some(pgid) = self.pgid {
            // Safety: kill(2) has no memory-safety preconditions. A negative
            // pid addresses the process group led by our child.
            let ret = unsafe { libc::kill(-pgid, libc::SIGKILL) };
            if ret == -1 {
                let err = std::io::Error::last_os_error();
                if err.raw_os_error() != Some(libc::ESRCH) {
                    tracing::warn!(pgid, error = %err, "Failed to kill process group");
                }
            }
        }
    }

    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        self.kill();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
