//! Scratch files that carry submitted source text to the calculator.
//!
//! The calculator only accepts input as a file path, so every invocation
//! first persists the text to disk. Two placement policies exist:
//!
//! - [`ScratchPolicy::Unique`] gives each invocation its own file, created
//!   exclusively under a random name and removed afterwards. The request id
//!   only appears as a readable prefix; it never decides the path on its
//!   own, so concurrent requests cannot see each other's input.
//! - [`ScratchPolicy::Shared`] reuses one fixed file for every invocation
//!   and never deletes it. Concurrent requests race on that file: one
//!   request's text can be replaced before its process reads it. Only use
//!   this when the old single-file layout is required.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use super::output::ExecutionError;
use crate::error::CoreError;

/// File name used by [`ScratchPolicy::Shared`].
pub const SHARED_SCRATCH_NAME: &str = "app.txt";

/// Where an invocation's scratch file lives and whether it outlives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScratchPolicy {
    #[default]
    Unique,
    Shared,
}

impl FromStr for ScratchPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unique" => Ok(Self::Unique),
            "shared" => Ok(Self::Shared),
            other => Err(CoreError::Validation(format!(
                "unknown scratch mode '{other}' (expected 'unique' or 'shared')"
            ))),
        }
    }
}

impl fmt::Display for ScratchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unique => f.write_str("unique"),
            Self::Shared => f.write_str("shared"),
        }
    }
}

/// File name prefix for a unique scratch file.
///
/// `label` (usually the request id) is reduced to `[A-Za-z0-9-]` and capped
/// at 64 characters. A random suffix is always appended after it.
fn unique_prefix(label: Option<&str>) -> String {
    let label: String = label
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(64)
        .collect();
    if label.is_empty() {
        "calc-".to_string()
    } else {
        format!("calc-{label}-")
    }
}

#[derive(Debug)]
enum Location {
    /// Removed from disk when dropped.
    Unique(TempPath),
    Shared(PathBuf),
}

/// A source file written to disk for the lifetime of one invocation.
///
/// Unique scratch files are deleted on drop; the shared one is left in place.
#[derive(Debug)]
pub struct ScratchFile {
    location: Location,
}

impl ScratchFile {
    /// Persist `source` according to `policy`.
    ///
    /// The write has completed when this returns, so a process launched
    /// afterwards always sees the whole text.
    pub async fn write(
        dir: &Path,
        policy: ScratchPolicy,
        label: Option<&str>,
        source: &str,
    ) -> Result<Self, ExecutionError> {
        match policy {
            ScratchPolicy::Unique => Self::write_unique(dir, label, source).await,
            ScratchPolicy::Shared => Self::write_shared(dir, source).await,
        }
    }

    async fn write_unique(
        dir: &Path,
        label: Option<&str>,
        source: &str,
    ) -> Result<Self, ExecutionError> {
        // Exclusive create under a random name: never follows a planted
        // symlink and never collides with another request.
        let named = tempfile::Builder::new()
            .prefix(&unique_prefix(label))
            .suffix(".txt")
            .tempfile_in(dir)
            .map_err(|e| scratch_error(dir, e))?;
        let (file, path) = named.into_parts();

        let mut file = tokio::fs::File::from_std(file);
        file.write_all(source.as_bytes())
            .await
            .map_err(|e| scratch_error(&path, e))?;
        file.flush().await.map_err(|e| scratch_error(&path, e))?;

        Ok(Self {
            location: Location::Unique(path),
        })
    }

    async fn write_shared(dir: &Path, source: &str) -> Result<Self, ExecutionError> {
        let path = dir.join(SHARED_SCRATCH_NAME);
        tokio::fs::write(&path, source.as_bytes())
            .await
            .map_err(|e| scratch_error(&path, e))?;
        Ok(Self {
            location: Location::Shared(path),
        })
    }

    pub fn path(&self) -> &Path {
        match &self.location {
            Location::Unique(path) => &**path,
            Location::Shared(path) => path.as_path(),
        }
    }
}

fn scratch_error(path: &Path, source: std::io::Error) -> ExecutionError {
    ExecutionError::ScratchWrite {
        path: path.to_path_buf(),
        source,
    }
}
