use std::net::SocketAddr;

use calcweb_core::execution::ScratchPolicy;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calcweb_api::config::ServerConfig;
use calcweb_api::router::build_app_router;
use calcweb_api::routes::health::is_executable;
use calcweb_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "calcweb_api=debug,calcweb_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        host = %config.host,
        port = %config.port,
        calc_binary = %config.calc_binary.display(),
        exec_timeout_secs = config.exec_timeout_secs,
        scratch_dir = %config.scratch_dir.display(),
        scratch_mode = %config.scratch_mode,
        "Loaded server configuration"
    );

    if !is_executable(&config.calc_binary).await {
        tracing::warn!(
            calc_binary = %config.calc_binary.display(),
            "Calculator binary is missing or not executable; requests will report launch failures"
        );
    }
    if config.scratch_mode == ScratchPolicy::Shared {
        tracing::warn!(
            "Shared scratch file in use; concurrent requests can overwrite each other's input"
        );
    }

    let addr = match config.host.parse() {
        Ok(ip) => SocketAddr::new(ip, config.port),
        Err(e) => {
            tracing::error!(host = %config.host, error = %e, "Invalid HOST address");
            std::process::exit(1);
        }
    };

    // --- Router ---
    let app = build_app_router(AppState::new(config));

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM so the server shuts down
/// cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
