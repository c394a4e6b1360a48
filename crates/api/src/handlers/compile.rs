//! Run submitted code through the calculator.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use calcweb_core::execution::RunReport;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::router::REQUEST_ID_HEADER;
use crate::state::AppState;

/// Request body for `POST /compile`.
#[derive(Debug, Deserialize)]
pub struct CompileRequest {
    /// Source text for the calculator. Missing or `null` means empty.
    #[serde(default)]
    pub code: Option<String>,
}

/// POST /compile
///
/// Writes `code` to a scratch file, runs the calculator on it, and returns
/// its combined stdout and stderr as `output`. Timeouts and launch failures
/// are reported through `status` with their description in `output`, never
/// as an HTTP error.
pub async fn compile_and_run(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CompileRequest>, JsonRejection>,
) -> AppResult<Json<RunReport>> {
    let Json(request) = payload?;
    let code = request.code.unwrap_or_default();

    if code.len() > state.config.max_code_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "code is {} bytes, limit is {}",
            code.len(),
            state.config.max_code_bytes
        )));
    }

    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok());

    let result = state.runner.execute(&code, request_id).await;
    let report = RunReport::from_result(result);

    tracing::info!(
        request_id,
        status = ?report.status,
        exit_code = ?report.exit_code,
        duration_ms = report.duration_ms,
        "Compile request handled"
    );

    Ok(Json(report))
}
