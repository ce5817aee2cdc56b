//! Prometheus metrics for ingestion and retrieval
//!
//! Exposed at `/metrics` in Prometheus text format.

use prometheus::{register_counter_vec, register_int_gauge, CounterVec, IntGauge};
use std::sync::LazyLock;

/// Total lineage events merged, by pipeline.
pub static LINEAGE_EVENTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter_vec!(
        "flowtrace_lineage_events_total",
        "Total lineage events merged, by pipeline",
        &["pipeline"]
    )
    .expect("Failed to register flowtrace_lineage_events_total metric")
});

/// Total rejected ingestion requests.
///
/// Labels:
/// - `reason`: decode | invalid_event
pub static EVENT_REJECTIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter_vec!(
        "flowtrace_event_rejections_total",
        "Total rejected ingestion requests",
        &["reason"]
    )
    .expect("Failed to register flowtrace_event_rejections_total metric")
});

/// Total graph retrievals.
///
/// Labels:
/// - `format`: png | dot | json
/// - `outcome`: ok | error
pub static GRAPH_RENDERS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter_vec!(
        "flowtrace_graph_renders_total",
        "Total graph retrievals by format and outcome",
        &["format", "outcome"]
    )
    .expect("Failed to register flowtrace_graph_renders_total metric")
});

/// Number of pipelines currently tracked in the store.
pub static PIPELINES_TRACKED: LazyLock<IntGauge> = LazyLock::new(|| {
    register_int_gauge!(
        "flowtrace_pipelines_tracked",
        "Number of pipelines currently tracked in the store"
    )
    .expect("Failed to register flowtrace_pipelines_tracked metric")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_register_once() {
        // Touching each static must not panic on re-registration.
        LINEAGE_EVENTS_TOTAL.with_label_values(&["sales"]).inc();
        EVENT_REJECTIONS_TOTAL.with_label_values(&["decode"]).inc();
        GRAPH_RENDERS_TOTAL.with_label_values(&["png", "ok"]).inc();
        PIPELINES_TRACKED.set(1);
    }
}
