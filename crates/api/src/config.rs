use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use calcweb_core::error::CoreError;
use calcweb_core::execution::{Runner, ScratchPolicy};

/// Reasons the environment does not describe a usable server.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("SCRATCH_MODE: {0}")]
    ScratchMode(#[source] CoreError),

    #[error("Invalid CORS origin '{0}'")]
    CorsOrigin(String),

    #[error("EXEC_TIMEOUT_SECS ({exec}) must be greater than zero and less than REQUEST_TIMEOUT_SECS ({request})")]
    Timeouts { exec: u64, request: u64 },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running next to a locally built
/// `calc` binary. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Path of the calculator executable (default: `./calc`).
    pub calc_binary: PathBuf,
    /// Wall-clock limit for one calculator run in seconds (default: `5`).
    pub exec_timeout_secs: u64,
    /// Directory scratch files are written to (default: OS temp dir).
    pub scratch_dir: PathBuf,
    /// Scratch file placement (default: `unique`).
    pub scratch_mode: ScratchPolicy,
    /// Largest accepted `code` payload in bytes (default: 1 MiB).
    pub max_code_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `CALC_BINARY`          | `./calc`                   |
    /// | `EXEC_TIMEOUT_SECS`    | `5`                        |
    /// | `SCRATCH_DIR`          | OS temp dir                |
    /// | `SCRATCH_MODE`         | `unique`                   |
    /// | `MAX_CODE_BYTES`       | `1048576`                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_var(&lookup, "PORT", "3000", "a valid u16")?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs =
            parse_var(&lookup, "REQUEST_TIMEOUT_SECS", "30", "a valid u64")?;
        let calc_binary = PathBuf::from(lookup("CALC_BINARY").unwrap_or_else(|| "./calc".into()));
        let exec_timeout_secs = parse_var(&lookup, "EXEC_TIMEOUT_SECS", "5", "a valid u64")?;
        let scratch_dir = lookup("SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        let scratch_mode = lookup("SCRATCH_MODE")
            .unwrap_or_else(|| "unique".into())
            .parse()
            .map_err(ConfigError::ScratchMode)?;
        let max_code_bytes = parse_var(&lookup, "MAX_CODE_BYTES", "1048576", "a valid usize")?;

        let config = Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            calc_binary,
            exec_timeout_secs,
            scratch_dir,
            scratch_mode,
            max_code_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// The calculator's timeout must fire before the HTTP request timeout,
    /// otherwise clients would only ever see a bare 408.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exec_timeout_secs == 0 || self.exec_timeout_secs >= self.request_timeout_secs {
            return Err(ConfigError::Timeouts {
                exec: self.exec_timeout_secs,
                request: self.request_timeout_secs,
            });
        }
        if let Some(bad) = self
            .cors_origins
            .iter()
            .find(|o| o.parse::<HeaderValue>().is_err())
        {
            return Err(ConfigError::CorsOrigin(bad.clone()));
        }
        Ok(())
    }

    pub fn exec_timeout(&self) -> Duration {
        Duration::from_secs(self.exec_timeout_secs)
    }

    /// Request body limit: the code limit plus room for JSON framing and escapes.
    pub fn max_body_bytes(&self) -> usize {
        self.max_code_bytes.saturating_mul(2).saturating_add(1024)
    }

    /// Build the calculator runner described by this configuration.
    pub fn runner(&self) -> Runner {
        Runner::new(&self.calc_binary, self.exec_timeout())
            .with_scratch_dir(&self.scratch_dir)
            .with_policy(self.scratch_mode)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = lookup(var).unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value,
    })
}
