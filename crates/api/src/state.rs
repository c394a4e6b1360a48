use std::sync::Arc;

use calcweb_core::execution::Runner;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Runs the calculator against submitted code.
    pub runner: Arc<Runner>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let runner = Arc::new(config.runner());
        Self {
            config: Arc::new(config),
            runner,
        }
    }
}
