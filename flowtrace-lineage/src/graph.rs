//! Pipeline graph data structure
//!
//! One `PipelineGraph` exists per pipeline identity. Vertices represent
//! jobs and datasources and are addressed by a typed key of name plus
//! kind, so a datasource and a job sharing a name never collide. Edges
//! are directed and carry no payload; display styling lives on the nodes.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::{Error, Result};

/// What a graph node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Job,
    Datasource,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Job => write!(f, "job"),
            NodeKind::Datasource => write!(f, "datasource"),
        }
    }
}

/// Display classification of a node.
///
/// `Dropped` records that the dataset was last written by a job whose SQL
/// dropped it; the renderer maps this to the red scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStyle {
    #[default]
    Normal,
    Dropped,
}

/// Node in a pipeline graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageNode {
    pub kind: NodeKind,
    pub name: String,

    /// SQL query text for a job node, data-source name for a datasource
    /// node; empty when the event carried no facet.
    pub info: String,

    #[serde(default)]
    pub style: NodeStyle,
}

impl LineageNode {
    /// Create a job node
    pub fn job(name: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Job,
            name: name.into(),
            info: info.into(),
            style: NodeStyle::Normal,
        }
    }

    /// Create a datasource node
    pub fn datasource(name: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Datasource,
            name: name.into(),
            info: info.into(),
            style: NodeStyle::Normal,
        }
    }

    /// The same node re-classified as dropped
    pub fn dropped(mut self) -> Self {
        self.style = NodeStyle::Dropped;
        self
    }

    /// Storage identity of this node within its graph
    pub fn key(&self) -> NodeKey {
        NodeKey {
            name: self.name.clone(),
            kind: self.kind,
        }
    }
}

/// Storage identity of a node: name plus kind.
///
/// Keying on the pair rather than the name alone keeps a job and a
/// datasource with the same name distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub name: String,
    pub kind: NodeKind,
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Directed graph of jobs and datasources for one pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineGraph {
    graph: DiGraph<LineageNode, ()>,
    nodes: HashMap<NodeKey, NodeIndex>,
}

impl PipelineGraph {
    /// Create a new empty pipeline graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or overwrite the stored node with the same key.
    ///
    /// Overwriting replaces the node's `info` and `style` with the
    /// incoming values; edges are unaffected. A key is therefore unique
    /// within the graph and re-adding never duplicates.
    pub fn upsert_node(&mut self, node: LineageNode) -> NodeIndex {
        match self.nodes.get(&node.key()) {
            Some(&idx) => {
                self.graph[idx] = node;
                idx
            }
            None => {
                let key = node.key();
                let idx = self.graph.add_node(node);
                self.nodes.insert(key, idx);
                idx
            }
        }
    }

    /// Add a directed edge between two existing nodes.
    ///
    /// Both endpoints must already be present; a missing endpoint means
    /// the caller broke the add-vertices-first ordering and is surfaced
    /// as an error. An edge that already exists is left as is, so
    /// replaying an event does not accumulate duplicates.
    pub fn add_edge(&mut self, from: &NodeKey, to: &NodeKey) -> Result<()> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;

        if self.graph.find_edge(from_idx, to_idx).is_none() {
            self.graph.add_edge(from_idx, to_idx, ());
        }
        Ok(())
    }

    /// Re-insert a node under the dropped classification, preserving any
    /// incoming edges it had.
    ///
    /// If a node with this key exists, its incoming edges are captured,
    /// the node and those edges are removed, the node is re-inserted as
    /// dropped, and each captured edge is re-added with its source
    /// unchanged. The lineage history of who fed the dataset survives;
    /// only its classification changes. If no such node exists yet it is
    /// inserted directly as dropped.
    pub fn rewrite_dropped(&mut self, node: LineageNode) -> Result<()> {
        let node = node.dropped();
        let key = node.key();

        if let Some(&idx) = self.nodes.get(&key) {
            let sources: Vec<NodeKey> = self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|source| self.graph[source].key())
                .collect();

            self.remove_node(&key);
            self.upsert_node(node);
            for source in sources {
                self.add_edge(&source, &key)?;
            }
        } else {
            self.upsert_node(node);
        }
        Ok(())
    }

    /// Look up a node by key
    pub fn node(&self, key: &NodeKey) -> Option<&LineageNode> {
        self.nodes.get(key).map(|&idx| &self.graph[idx])
    }

    /// Whether a node with this key is present
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Get the total number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the total number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &LineageNode> {
        self.graph.node_weights()
    }

    /// Iterate over all edges as (source, target) node pairs
    pub fn edges(&self) -> impl Iterator<Item = (&LineageNode, &LineageNode)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()]))
    }

    /// All nodes with an edge into the given node
    pub fn incoming(&self, key: &NodeKey) -> Vec<&LineageNode> {
        self.neighbors(key, Direction::Incoming)
    }

    /// All nodes the given node has an edge to
    pub fn outgoing(&self, key: &NodeKey) -> Vec<&LineageNode> {
        self.neighbors(key, Direction::Outgoing)
    }

    fn neighbors(&self, key: &NodeKey, direction: Direction) -> Vec<&LineageNode> {
        match self.nodes.get(key) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, direction)
                .map(|n| &self.graph[n])
                .collect(),
            None => Vec::new(),
        }
    }

    fn index_of(&self, key: &NodeKey) -> Result<NodeIndex> {
        self.nodes
            .get(key)
            .copied()
            .ok_or_else(|| Error::NodeNotFound(key.to_string()))
    }

    /// Remove a node and its incident edges.
    ///
    /// `petgraph` moves the highest-index node into the freed slot, so
    /// the key map entry for that node is repaired after removal.
    fn remove_node(&mut self, key: &NodeKey) -> Option<LineageNode> {
        let idx = self.nodes.remove(key)?;
        let removed = self.graph.remove_node(idx);
        if let Some(moved) = self.graph.node_weight(idx) {
            self.nodes.insert(moved.key(), idx);
        }
        removed
    }
}
