#![forbid(unsafe_code)]

//! In-memory chart being edited: the `{nodes, edges}` pair plus the mutations
//! the editor exposes. Persistence lives in `om_storage`; nothing here touches
//! disk.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ChartEdge, ChartNode, NodeData, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChartError {
    UnknownNode(String),
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::UnknownNode(id) => write!(f, "no node with id '{id}'"),
        }
    }
}

impl std::error::Error for ChartError {}

/// What `from_parts` had to drop to make an untrusted pair consistent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub nodes_dropped: usize,
    pub edges_dropped: usize,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.nodes_dropped == 0 && self.edges_dropped == 0
    }
}

/// A node removed from the chart together with the edges that referenced it.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovedNode {
    pub node: ChartNode,
    pub edges: Vec<ChartEdge>,
}

/// Working graph. Serializes as the bare `{nodes, edges}` pair exchanged with
/// the canvas and stored inside snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub nodes: Vec<ChartNode>,
    pub edges: Vec<ChartEdge>,
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    /// The five-person sample org a fresh editor starts from.
    pub fn starter() -> Self {
        Self {
            nodes: vec![
                seed_node("1", 250.0, 5.0, "Morgan Reed", "Chief Executive Officer", "Executive"),
                seed_node("2", 100.0, 100.0, "Riley Chen", "Director", "Sales"),
                seed_node("3", 400.0, 100.0, "Dana Flores", "Director", "Engineering"),
                seed_node("4", 100.0, 200.0, "Sam Ortiz", "Manager", "Sales"),
                seed_node("5", 400.0, 200.0, "Alex Kim", "Manager", "Engineering"),
            ],
            edges: vec![
                seed_edge("e1-2", "1", "2"),
                seed_edge("e1-3", "1", "3"),
                seed_edge("e2-4", "2", "4"),
                seed_edge("e3-5", "3", "5"),
            ],
        }
    }

    /// Builds a chart from an untrusted `{nodes, edges}` pair. Later nodes
    /// reusing an id are dropped, as are edges with a duplicate id or an
    /// endpoint that is not a kept node.
    pub fn from_parts(nodes: Vec<ChartNode>, edges: Vec<ChartEdge>) -> (Self, IngestReport) {
        let mut report = IngestReport::default();

        let mut kept_nodes: Vec<ChartNode> = Vec::with_capacity(nodes.len());
        for node in nodes {
            if kept_nodes.iter().any(|kept| kept.id == node.id) {
                report.nodes_dropped += 1;
            } else {
                kept_nodes.push(node);
            }
        }

        let mut kept_edges: Vec<ChartEdge> = Vec::with_capacity(edges.len());
        for edge in edges {
            let duplicate = kept_edges.iter().any(|kept| kept.id == edge.id);
            let anchored = kept_nodes.iter().any(|node| node.id == edge.source)
                && kept_nodes.iter().any(|node| node.id == edge.target);
            if duplicate || !anchored {
                report.edges_dropped += 1;
            } else {
                kept_edges.push(edge);
            }
        }

        (
            Self {
                nodes: kept_nodes,
                edges: kept_edges,
            },
            report,
        )
    }

    pub fn node(&self, id: &str) -> Option<&ChartNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Adds a person at `position` and returns the allocated node id.
    pub fn add_node(&mut self, data: NodeData, position: Position) -> String {
        let id = self.next_node_id();
        self.nodes.push(ChartNode {
            id: id.clone(),
            position,
            data,
        });
        id
    }

    /// Replaces the person payload of an existing node. Position is untouched.
    pub fn update_node(&mut self, id: &str, data: NodeData) -> Result<(), ChartError> {
        match self.nodes.iter_mut().find(|node| node.id == id) {
            Some(node) => {
                node.data = data;
                Ok(())
            }
            None => Err(ChartError::UnknownNode(id.to_string())),
        }
    }

    /// Removes a node and every edge that references it, in either direction.
    /// Edges between surviving nodes are left untouched.
    pub fn remove_node(&mut self, id: &str) -> Result<RemovedNode, ChartError> {
        let index = self
            .nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| ChartError::UnknownNode(id.to_string()))?;
        let node = self.nodes.remove(index);

        let edges: Vec<ChartEdge> = self
            .edges
            .iter()
            .filter(|edge| edge.source == id || edge.target == id)
            .cloned()
            .collect();
        self.edges.retain(|edge| edge.source != id && edge.target != id);

        Ok(RemovedNode { node, edges })
    }

    /// Adds a reporting edge from `source` to `target`. Both endpoints must
    /// exist; parallel edges and self-loops are allowed.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<ChartEdge, ChartError> {
        if !self.has_node(source) {
            return Err(ChartError::UnknownNode(source.to_string()));
        }
        if !self.has_node(target) {
            return Err(ChartError::UnknownNode(target.to_string()));
        }
        let edge = ChartEdge {
            id: self.next_edge_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
        };
        self.edges.push(edge.clone());
        Ok(edge)
    }

    /// One past the highest numeric id in use. Non-numeric ids are ignored, so
    /// hand-written ids never collide with allocated ones; an id at the numeric
    /// ceiling falls back to the smallest unused decimal id.
    fn next_node_id(&self) -> String {
        let mut max = 0u128;
        for node in &self.nodes {
            if let Ok(value) = node.id.parse::<u128>() {
                max = max.max(value);
            }
        }
        if let Some(next) = max.checked_add(1) {
            return next.to_string();
        }
        let mut n = 1u128;
        loop {
            let candidate = n.to_string();
            if !self.has_node(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn next_edge_id(&self, source: &str, target: &str) -> String {
        let base = format!("e{source}-{target}");
        if !self.edges.iter().any(|edge| edge.id == base) {
            return base;
        }
        let mut n = 2u64;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.edges.iter().any(|edge| edge.id == candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn seed_node(id: &str, x: f64, y: f64, name: &str, title: &str, department: &str) -> ChartNode {
    ChartNode {
        id: id.to_string(),
        position: Position { x, y },
        data: NodeData::new(name, title, department),
    }
}

fn seed_edge(id: &str, source: &str, target: &str) -> ChartEdge {
    ChartEdge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
    }
}
