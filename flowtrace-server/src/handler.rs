//! HTTP handlers for the lineage API
//!
//! Implements:
//! - POST /api/v1/lineage - merge a lineage event into its pipeline graph
//! - GET /api/get/graph/:dag - retrieve a pipeline's graph
//! - GET /health - liveness probe
//! - GET /metrics - Prometheus metrics

use crate::metrics::{
    EVENT_REJECTIONS_TOTAL, GRAPH_RENDERS_TOTAL, LINEAGE_EVENTS_TOTAL, PIPELINES_TRACKED,
};
use crate::render::{self, RenderError};
use crate::types::{GraphFormat, GraphQuery, GraphView, HealthResponse, IngestResponse};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use flowtrace_core::Event;
use flowtrace_lineage::{dot, process_event, PipelineGraphStore};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PipelineGraphStore>,
    pub dot_bin: String,
}

impl AppState {
    /// Create state over a fresh store
    pub fn new(dot_bin: impl Into<String>) -> Self {
        Self {
            store: Arc::new(PipelineGraphStore::new()),
            dot_bin: dot_bin.into(),
        }
    }
}

/// Merge a lineage event into its pipeline's graph.
///
/// The body is decoded by hand rather than through the `Json` extractor
/// so decode failures map onto the API's own error shape.
pub async fn post_lineage(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let event: Event = serde_json::from_slice(&body).map_err(ApiError::Decode)?;

    let run_id = event.run.run_id.clone();
    let pipeline = process_event(&event, &state.store)?;

    LINEAGE_EVENTS_TOTAL.with_label_values(&[&pipeline]).inc();
    PIPELINES_TRACKED.set(state.store.len() as i64);
    info!(
        pipeline = %pipeline,
        run_id = %run_id,
        job = %event.job.name,
        inputs = event.inputs.len(),
        outputs = event.outputs.len(),
        "Lineage event merged"
    );

    Ok(Json(IngestResponse::merged(pipeline, run_id)))
}

/// Retrieve a pipeline's accumulated graph.
///
/// The default format pipes the graph's DOT description through the
/// external layout tool and streams the PNG back; `?format=dot` and
/// `?format=json` skip rasterization.
pub async fn get_graph(
    State(state): State<AppState>,
    Path(dag): Path<String>,
    Query(query): Query<GraphQuery>,
) -> Result<Response, ApiError> {
    let graph = state
        .store
        .get(&dag)
        .ok_or_else(|| ApiError::UnknownPipeline(dag.clone()))?;

    let format = query.format;
    let result = match format {
        GraphFormat::Json => Ok(Json(GraphView::from_graph(&dag, &graph)).into_response()),
        GraphFormat::Dot => Ok((
            [(header::CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")],
            dot::render(&graph),
        )
            .into_response()),
        GraphFormat::Png => render::dot_to_png(&state.dot_bin, &dot::render(&graph))
            .await
            .map(|png| ([(header::CONTENT_TYPE, "image/png")], png).into_response())
            .map_err(ApiError::Render),
    };

    let outcome = if result.is_ok() { "ok" } else { "error" };
    GRAPH_RENDERS_TOTAL
        .with_label_values(&[format.as_str(), outcome])
        .inc();
    if result.is_ok() {
        info!(
            pipeline = %dag,
            format = format.as_str(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Pipeline graph retrieved"
        );
    }

    result
}

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Prometheus metrics endpoint
pub async fn metrics_handler() -> Result<String, ApiError> {
    let encoder = prometheus::TextEncoder::new();
    encoder
        .encode_to_string(&prometheus::gather())
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Error taxonomy of the lineage API
#[derive(Debug)]
pub enum ApiError {
    /// Body is not a valid event document
    Decode(serde_json::Error),
    /// Event decoded but cannot be processed (e.g. empty job name)
    InvalidEvent(String),
    /// Pipeline identity never merged
    UnknownPipeline(String),
    /// External rendering failed; stored graph is untouched
    Render(RenderError),
    /// Broken internal invariant
    Internal(String),
}

impl From<flowtrace_lineage::Error> for ApiError {
    fn from(err: flowtrace_lineage::Error) -> Self {
        match err {
            flowtrace_lineage::Error::Event(e) => ApiError::InvalidEvent(e.to_string()),
            // Missing edge endpoints mean the merge ordering broke; that
            // is a bug, not a client problem.
            flowtrace_lineage::Error::NodeNotFound(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Decode(ref e) => {
                warn!(error = %e, "Failed to decode lineage event");
                EVENT_REJECTIONS_TOTAL.with_label_values(&["decode"]).inc();
                (StatusCode::BAD_REQUEST, "Failed to parse event JSON".to_string())
            }
            ApiError::InvalidEvent(ref msg) => {
                warn!(error = %msg, "Rejected invalid lineage event");
                EVENT_REJECTIONS_TOTAL
                    .with_label_values(&["invalid_event"])
                    .inc();
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::UnknownPipeline(ref dag) => (
                StatusCode::NOT_FOUND,
                format!("Unknown pipeline: {dag}"),
            ),
            ApiError::Render(ref e) => {
                error!(error = %e, "Graph rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Graph rendering failed".to_string())
            }
            ApiError::Internal(ref msg) => {
                error!(error = %msg, "Internal invariant violation");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
