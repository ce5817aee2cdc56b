//! # Flowtrace Core
//!
//! Wire-level lineage event model, pipeline identity resolution, and
//! SQL inspection helpers shared by the graph engine and the HTTP service.

pub mod event;
pub mod pipeline;
pub mod sql;

// Re-export commonly used types
pub use event::{DataSourceFacet, Event, Facet, Input, Job, Output, Run, SqlFacet};
pub use pipeline::pipeline_id;
pub use sql::is_drop_table;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}
