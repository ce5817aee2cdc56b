//! Flowtrace HTTP service library
//!
//! Exposes the lineage ingestion and graph retrieval endpoints over the
//! engine in `flowtrace-lineage`. The binary in `main.rs` wires this
//! router to a listener with logging and graceful shutdown.

pub mod config;
pub mod handler;
pub mod metrics;
pub mod render;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use handler::AppState;

/// Build the service router over the given application state.
///
/// Shared with the contract tests, which drive the router directly
/// without binding a listener.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/lineage", post(handler::post_lineage))
        .route("/api/get/graph/:dag", get(handler::get_graph))
        .route("/health", get(handler::health_handler))
        .route("/metrics", get(handler::metrics_handler))
        .with_state(state)
}
