//! Graphviz DOT rendering
//!
//! Produces the textual graph description handed to the external layout
//! tool. The engine's only rendering responsibility is supplying nodes,
//! edges, and per-node style tags; rasterization happens outside.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::graph::{NodeKey, NodeStyle, PipelineGraph};

/// Styling for job nodes and actively-produced datasets
const VERTEX_ATTRIBUTES: &[(&str, &str)] = &[
    ("colorscheme", "blues3"),
    ("style", "filled"),
    ("color", "2"),
    ("fillcolor", "1"),
    ("shape", "rectangle"),
];

/// Styling for datasets dropped by their last producing job
const VERTEX_ATTRIBUTES_DROPPED: &[(&str, &str)] = &[
    ("colorscheme", "reds3"),
    ("style", "filled"),
    ("color", "2"),
    ("fillcolor", "1"),
    ("shape", "rectangle"),
];

/// Render a pipeline graph as Graphviz DOT text.
pub fn render(graph: &PipelineGraph) -> String {
    let mut out = String::new();
    out.push_str("digraph lineage {\n");
    out.push_str("  rankdir=LR;\n\n");

    let ids: HashMap<NodeKey, usize> = graph
        .nodes()
        .enumerate()
        .map(|(i, node)| (node.key(), i))
        .collect();

    for (i, node) in graph.nodes().enumerate() {
        let attrs = match node.style {
            NodeStyle::Normal => VERTEX_ATTRIBUTES,
            NodeStyle::Dropped => VERTEX_ATTRIBUTES_DROPPED,
        };

        let _ = write!(out, "  n{} [label=\"{}\"", i, dot_escape(&node.name));
        for (key, value) in attrs {
            let _ = write!(out, ", {key}=\"{value}\"");
        }
        if !node.info.is_empty() {
            let _ = write!(out, ", tooltip=\"{}\"", dot_escape(&node.info));
        }
        out.push_str("];\n");
    }

    out.push('\n');
    for (source, target) in graph.edges() {
        let _ = writeln!(out, "  n{} -> n{};", ids[&source.key()], ids[&target.key()]);
    }

    out.push_str("}\n");
    out
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
