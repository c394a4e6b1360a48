#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use calcweb_core::execution::ScratchPolicy;
use http_body_util::BodyExt;
use tower::ServiceExt;

use calcweb_api::config::ServerConfig;
use calcweb_api::router::build_app_router;
use calcweb_api::state::AppState;

/// `/bin/sh` reads the scratch file as a script, so each request's `code`
/// decides what the stand-in calculator prints.
pub const SH: &str = "/bin/sh";

/// Build a test `ServerConfig` with safe defaults.
///
/// Runs `calc_binary` with a 2-second limit and writes scratch files into
/// `scratch_dir`.
pub fn test_config(calc_binary: impl Into<PathBuf>, scratch_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        calc_binary: calc_binary.into(),
        exec_timeout_secs: 2,
        scratch_dir: scratch_dir.to_path_buf(),
        scratch_mode: ScratchPolicy::Unique,
        max_code_bytes: 64 * 1024,
    }
}

/// Build the full application router around `config`.
pub fn build_test_app(config: ServerConfig) -> Router {
    build_app_router(AppState::new(config))
}

/// Router whose calculator is `/bin/sh`, with scratch files in `dir`.
pub fn sh_app(dir: &tempfile::TempDir) -> Router {
    build_test_app(test_config(SH, dir.path()))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, "application/json", body.to_string()).await
}

/// POST a JSON body with a caller-chosen `x-request-id`.
pub async fn post_json_with_request_id(
    app: Router,
    uri: &str,
    request_id: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-request-id", request_id)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(
    app: Router,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", content_type)
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
