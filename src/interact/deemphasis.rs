use crate::graph::{GraphView, Reach};
use std::collections::BTreeSet;

/// Node and edge ids currently dimmed. Empty means nothing is dimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeEmphasis {
    nodes: BTreeSet<String>,
    edges: BTreeSet<String>,
}

impl DeEmphasis {
    /// Dim everything in `view`, then undim `keep`.
    pub fn emphasize_only(&mut self, view: &impl GraphView, keep: &Reach) {
        self.nodes = view
            .node_ids()
            .filter(|id| !keep.nodes.contains(*id))
            .map(str::to_string)
            .collect();
        self.edges = view
            .edge_ids()
            .filter(|id| !keep.edges.contains(*id))
            .map(str::to_string)
            .collect();
    }

    pub fn clear_all(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn is_node_dimmed(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn is_edge_dimmed(&self, id: &str) -> bool {
        self.edges.contains(id)
    }

    pub fn dimmed_nodes(&self) -> &BTreeSet<String> {
        &self.nodes
    }

    pub fn dimmed_edges(&self) -> &BTreeSet<String> {
        &self.edges
    }
}
