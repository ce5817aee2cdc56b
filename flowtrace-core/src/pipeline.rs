//! Pipeline identity resolution
//!
//! Jobs carry dotted names (`<pipeline>.<task>`); the substring before the
//! first `.` identifies the pipeline the event belongs to. All events
//! sharing a prefix accumulate into the same graph.

use crate::event::Event;
use crate::{Error, Result};

/// Derive the pipeline identity for an event from its job name.
///
/// A name with no separator is its own pipeline identity. An empty job
/// name makes resolution impossible and is rejected as an invalid event.
pub fn pipeline_id(event: &Event) -> Result<&str> {
    let name = event.job.name.as_str();
    if name.is_empty() {
        return Err(Error::InvalidEvent("job name is empty".to_string()));
    }

    Ok(name.split('.').next().unwrap_or(name))
}
