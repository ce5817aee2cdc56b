//! Type definitions for the HTTP API
//!
//! Response shapes for the ingestion and retrieval endpoints, and the
//! JSON projection of a pipeline graph.

use flowtrace_lineage::{LineageNode, NodeKey, PipelineGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response from the ingestion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Processing status
    pub status: String,

    /// Pipeline the event was merged into
    pub pipeline: String,

    /// Run id carried by the event
    pub run_id: String,
}

impl IngestResponse {
    /// Create a success response for a merged event
    pub fn merged(pipeline: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            pipeline: pipeline.into(),
            run_id: run_id.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthResponse {
    /// Create a healthy response
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}

/// Output format for graph retrieval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    /// Rasterized through the external layout tool
    #[default]
    Png,
    /// Graphviz DOT text
    Dot,
    /// JSON projection of nodes and edges
    Json,
}

impl GraphFormat {
    /// Label used for the render metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphFormat::Png => "png",
            GraphFormat::Dot => "dot",
            GraphFormat::Json => "json",
        }
    }
}

/// Query parameters for graph retrieval
#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub format: GraphFormat,
}

/// JSON projection of a pipeline graph.
///
/// Edges reference nodes by their position in the `nodes` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphView {
    pub pipeline: String,
    pub nodes: Vec<LineageNode>,
    pub edges: Vec<EdgeView>,
}

/// A directed edge between two positions in the node array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: usize,
    pub target: usize,
}

impl GraphView {
    /// Project a pipeline graph for JSON consumers
    pub fn from_graph(pipeline: impl Into<String>, graph: &PipelineGraph) -> Self {
        let ids: HashMap<NodeKey, usize> = graph
            .nodes()
            .enumerate()
            .map(|(i, node)| (node.key(), i))
            .collect();

        Self {
            pipeline: pipeline.into(),
            nodes: graph.nodes().cloned().collect(),
            edges: graph
                .edges()
                .map(|(source, target)| EdgeView {
                    source: ids[&source.key()],
                    target: ids[&target.key()],
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtrace_lineage::{LineageNode, NodeKind};

    #[test]
    fn test_ingest_response_shape() {
        let response = IngestResponse::merged("sales", "run-1");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["pipeline"], "sales");
        assert_eq!(json["run_id"], "run-1");
    }

    #[test]
    fn test_graph_format_deserializes_lowercase() {
        let query: GraphQuery = serde_json::from_value(serde_json::json!({ "format": "dot" })).unwrap();
        assert_eq!(query.format, GraphFormat::Dot);
    }

    #[test]
    fn test_graph_format_defaults_to_png() {
        let query: GraphQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.format, GraphFormat::Png);
    }

    #[test]
    fn test_graph_view_projection() {
        let mut graph = PipelineGraph::new();
        graph.upsert_node(LineageNode::datasource("raw.orders", ""));
        graph.upsert_node(LineageNode::job("sales.load", ""));
        let data = LineageNode::datasource("raw.orders", "").key();
        let job = LineageNode::job("sales.load", "").key();
        graph.add_edge(&data, &job).unwrap();

        let view = GraphView::from_graph("sales", &graph);
        assert_eq!(view.nodes.len(), 2);
        assert_eq!(view.edges.len(), 1);

        let edge = &view.edges[0];
        assert_eq!(view.nodes[edge.source].kind, NodeKind::Datasource);
        assert_eq!(view.nodes[edge.target].kind, NodeKind::Job);
    }
}
