//! Lineage graph model: deduplicated nodes plus directed input/output edges.

pub mod builder;
pub mod index;

pub use builder::{BuildOptions, build_graph};
pub use index::{GraphIndex, GraphView, Reach};

use crate::meta::Metadata;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Job,
    Dataset,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Job => f.write_str("job"),
            NodeKind::Dataset => f.write_str("dataset"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub metadata: Metadata,
}

/// `input`: dataset -> job. `output`: job -> dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRole {
    Input,
    Output,
}

impl fmt::Display for EdgeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeRole::Input => f.write_str("input"),
            EdgeRole::Output => f.write_str("output"),
        }
    }
}

/// Edges are positional: repeated runs produce repeated edges, each with its
/// own `e<index>` id.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub role: EdgeRole,
}

pub fn job_id(name: &str) -> String {
    format!("job:{}", name)
}

pub fn dataset_id(namespace: &str, name: &str) -> String {
    format!("ds:{}.{}", namespace, name)
}

/// The graph for one load. Nodes and edges keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineageGraph {
    nodes: Vec<Node>,
    positions: HashMap<String, usize>,
    edges: Vec<Edge>,
    event_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub events: usize,
    pub jobs: usize,
    pub datasets: usize,
    pub input_edges: usize,
    pub output_edges: usize,
}

impl LineageGraph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.positions.get(id).map(|&i| &self.nodes[i])
    }

    pub fn totals(&self) -> Totals {
        let jobs = self.nodes.iter().filter(|n| n.kind == NodeKind::Job).count();
        let input_edges = self
            .edges
            .iter()
            .filter(|e| e.role == EdgeRole::Input)
            .count();
        Totals {
            events: self.event_count,
            jobs,
            datasets: self.nodes.len() - jobs,
            input_edges,
            output_edges: self.edges.len() - input_edges,
        }
    }

    /// Insert unless the id is already present. First occurrence wins.
    fn ensure_node(&mut self, node: Node) {
        if self.positions.contains_key(&node.id) {
            return;
        }
        self.positions.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    fn push_edge(&mut self, source: String, target: String, role: EdgeRole) {
        let id = format!("e{}", self.edges.len());
        self.edges.push(Edge {
            id,
            source,
            target,
            role,
        });
    }
}
