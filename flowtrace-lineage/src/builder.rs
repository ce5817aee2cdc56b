//! Event merge
//!
//! Folds one lineage event into a pipeline's graph: the job and every
//! dataset it touched become nodes, inputs gain edges into the job, the
//! job gains edges into its outputs. A job whose SQL drops a table gets
//! the rewrite treatment for its outputs: the dataset node is re-created
//! under the dropped classification with its incoming edges intact.

use flowtrace_core::{is_drop_table, pipeline_id, Event};
use tracing::debug;

use crate::graph::{LineageNode, PipelineGraph};
use crate::store::PipelineGraphStore;
use crate::Result;

/// Merge a single event into a pipeline graph.
///
/// Pure with respect to its inputs apart from the mutated graph: merging
/// the same event twice leaves the node and edge sets unchanged.
pub fn merge(event: &Event, graph: &mut PipelineGraph) -> Result<()> {
    let job = LineageNode::job(&event.job.name, event.job.sql_query());
    let job_key = job.key();
    let destructive = is_drop_table(&job.info);
    graph.upsert_node(job);

    for input in &event.inputs {
        let node = LineageNode::datasource(&input.name, input.data_source_name());
        let key = node.key();
        graph.upsert_node(node);
        graph.add_edge(&key, &job_key)?;
    }

    for output in &event.outputs {
        let node = LineageNode::datasource(&output.name, output.data_source_name());
        let key = node.key();
        if destructive {
            graph.rewrite_dropped(node)?;
        } else {
            graph.upsert_node(node);
        }
        graph.add_edge(&job_key, &key)?;
    }

    Ok(())
}

/// Process an inbound event against the store.
///
/// Resolves the pipeline identity, then merges the event into that
/// pipeline's graph under its lock, creating the graph on first sight.
/// Returns the pipeline identity the event landed in.
pub fn process_event(event: &Event, store: &PipelineGraphStore) -> Result<String> {
    let pipeline = pipeline_id(event)?.to_string();
    let slot = store.slot(&pipeline);

    let mut graph = slot.lock();
    merge(event, &mut graph)?;
    debug!(
        pipeline = %pipeline,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Merged event into pipeline graph"
    );

    Ok(pipeline)
}
