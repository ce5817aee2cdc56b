//! Pipeline graph store
//!
//! Keyed container holding the one current graph per pipeline identity
//! for the lifetime of the process. Each graph sits behind its own lock,
//! so concurrent events for the same pipeline serialize their
//! read-modify-write while unrelated pipelines proceed in parallel.
//! Entries are created on first sight of a pipeline and never evicted.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::graph::PipelineGraph;

/// Concurrent map of pipeline identity to its current graph
#[derive(Default)]
pub struct PipelineGraphStore {
    graphs: DashMap<String, Arc<Mutex<PipelineGraph>>>,
}

impl PipelineGraphStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the slot for a pipeline, creating an empty graph on first
    /// sight.
    ///
    /// The returned handle is the pipeline's lock: hold it across the
    /// whole fetch-merge sequence so no concurrent update is lost. The
    /// map shard is released before the caller locks, so slow merges on
    /// one pipeline never block access to others.
    pub fn slot(&self, pipeline: &str) -> Arc<Mutex<PipelineGraph>> {
        self.graphs
            .entry(pipeline.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Snapshot a pipeline's current graph.
    ///
    /// Returns `None` for a pipeline never merged. The clone is taken
    /// under the pipeline's lock, so it is always a whole merge's state,
    /// never a partially-applied event.
    pub fn get(&self, pipeline: &str) -> Option<PipelineGraph> {
        let slot = self.graphs.get(pipeline)?.value().clone();
        let graph = slot.lock();
        Some(graph.clone())
    }

    /// Replace a pipeline's graph wholesale
    pub fn put(&self, pipeline: &str, graph: PipelineGraph) {
        let slot = self.slot(pipeline);
        *slot.lock() = graph;
    }

    /// Whether a pipeline has been seen
    pub fn contains(&self, pipeline: &str) -> bool {
        self.graphs.contains_key(pipeline)
    }

    /// Identities of all pipelines seen so far
    pub fn pipelines(&self) -> Vec<String> {
        self.graphs.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of pipelines tracked
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether no pipeline has been seen yet
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LineageNode;

    #[test]
    fn test_get_unknown_pipeline_is_absent() {
        let store = PipelineGraphStore::new();
        assert!(store.get("sales").is_none());
        assert!(!store.contains("sales"));
    }

    #[test]
    fn test_slot_creates_empty_graph() {
        let store = PipelineGraphStore::new();
        let slot = store.slot("sales");
        assert_eq!(slot.lock().node_count(), 0);
        assert!(store.contains("sales"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_slot_returns_same_graph() {
        let store = PipelineGraphStore::new();
        store.slot("sales").lock().upsert_node(LineageNode::job("sales.load", ""));

        let again = store.slot("sales");
        assert_eq!(again.lock().node_count(), 1);
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let store = PipelineGraphStore::new();
        let mut graph = PipelineGraph::new();
        graph.upsert_node(LineageNode::datasource("raw.orders", ""));

        store.put("sales", graph);

        let snapshot = store.get("sales").unwrap();
        assert_eq!(snapshot.node_count(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = PipelineGraphStore::new();
        store.slot("sales");
        let snapshot = store.get("sales").unwrap();

        store.slot("sales").lock().upsert_node(LineageNode::job("sales.load", ""));

        assert_eq!(snapshot.node_count(), 0);
        assert_eq!(store.get("sales").unwrap().node_count(), 1);
    }

    #[test]
    fn test_pipelines_lists_all_keys() {
        let store = PipelineGraphStore::new();
        store.slot("sales");
        store.slot("billing");

        let mut pipelines = store.pipelines();
        pipelines.sort_unstable();
        assert_eq!(pipelines, ["billing", "sales"]);
    }

    #[test]
    fn test_concurrent_merges_on_one_pipeline_lose_nothing() {
        use std::thread;

        let store = Arc::new(PipelineGraphStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    let slot = store.slot("sales");
                    let mut graph = slot.lock();
                    graph.upsert_node(LineageNode::job(format!("sales.task_{i}"), ""));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("sales").unwrap().node_count(), 16);
    }

    #[test]
    fn test_concurrent_distinct_pipelines() {
        use std::thread;

        let store = Arc::new(PipelineGraphStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    let pipeline = format!("pipeline_{i}");
                    let slot = store.slot(&pipeline);
                    let mut graph = slot.lock();
                    graph.upsert_node(LineageNode::job(format!("{pipeline}.task"), ""));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8);
    }
}
