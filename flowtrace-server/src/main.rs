//! Flowtrace lineage service
//!
//! HTTP server that ingests lineage events and serves per-pipeline
//! graphs for visualization.
//!
//! # Endpoints
//!
//! - POST /api/v1/lineage - ingest a lineage event
//! - GET /api/get/graph/:dag - retrieve a pipeline graph (png, dot or json)
//! - GET /health - liveness probe
//! - GET /metrics - Prometheus metrics
//!
//! # Configuration
//!
//! Environment variables:
//! - PORT - HTTP port (default: 3000)
//! - FLOWTRACE_DOT_BIN - Graphviz binary for PNG rendering (default: "dot")
//! - REQUEST_TIMEOUT_SECS - per-request timeout (default: 30)
//! - MAX_BODY_BYTES - request body cap (default: 2 MiB)

use flowtrace_server::{app, config::ServerConfig, handler::AppState};
use tokio::signal;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowtrace_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Flowtrace lineage service");

    let config = match ServerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        port = config.port,
        dot_bin = %config.dot_bin,
        timeout_seconds = config.request_timeout.as_secs(),
        "Configuration loaded"
    );

    let state = AppState::new(&config.dot_bin);

    let service = app(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, address = %addr, "Failed to bind server");
            std::process::exit(1);
        }
    };

    info!(address = %addr, "Server listening");

    if let Err(e) = axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }

    info!("Server shut down gracefully");
}

/// Graceful shutdown signal handler
///
/// Waits for SIGTERM or Ctrl-C
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl-C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
