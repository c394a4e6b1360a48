use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the calculator binary exists and is executable.
    pub calc_available: bool,
}

/// GET /health -- returns service and calculator health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let calc_available = is_executable(state.runner.program()).await;

    let status = if calc_available { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        calc_available,
    })
}

/// Whether `path` is a regular file with any execute bit set.
pub async fn is_executable(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
