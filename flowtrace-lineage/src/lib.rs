//! # Flowtrace Lineage
//!
//! The lineage graph engine: merges lineage events into one directed
//! graph per pipeline and keeps those graphs in a concurrent in-memory
//! store for later retrieval and rendering.

pub mod builder;
pub mod dot;
pub mod graph;
pub mod store;

// Re-export commonly used types
pub use builder::{merge, process_event};
pub use graph::{LineageNode, NodeKey, NodeKind, NodeStyle, PipelineGraph};
pub use store::PipelineGraphStore;

/// Result type for lineage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for lineage operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Event error: {0}")]
    Event(#[from] flowtrace_core::Error),

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}
