//! Interaction controller: hover highlight, detail panel, search filter.
//!
//! Purely reactive. Each pointer/keyboard event is handled to completion and
//! the only mutable state is the controller-owned de-emphasis set, the last
//! detail panel and the hit counter.

pub mod deemphasis;
pub mod panel;

pub use deemphasis::DeEmphasis;
pub use panel::DetailPanel;

use crate::graph::{GraphView, LineageGraph, Node, NodeKind, Reach};
use crate::meta;

use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionOptions {
    /// Job nodes open the detail panel too (datasets always do).
    pub clickable_jobs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty query: nothing dimmed, counter hidden.
    Cleared,
    /// Direct matches in graph order. Expanded lineage is not counted.
    Matched { hits: Vec<String> },
}

/// Lowercased text a query is matched against: label plus flattened metadata.
pub fn search_blob(node: &Node) -> String {
    let flat = meta::flatten(&node.metadata);
    if flat.is_empty() {
        node.label.to_lowercase()
    } else {
        format!("{} {}", node.label, flat).to_lowercase()
    }
}

pub fn hit_counter_text(count: usize) -> String {
    if count == 1 {
        "1 result".to_string()
    } else {
        format!("{} results", count)
    }
}

pub struct Controller<'g, V> {
    graph: &'g LineageGraph,
    view: V,
    options: InteractionOptions,
    dimmed: DeEmphasis,
    panel: Option<DetailPanel>,
    hit_count: Option<usize>,
}

impl<'g, V: GraphView> Controller<'g, V> {
    pub fn new(graph: &'g LineageGraph, view: V, options: InteractionOptions) -> Self {
        Self {
            graph,
            view,
            options,
            dimmed: DeEmphasis::default(),
            panel: None,
            hit_count: None,
        }
    }

    /// Keep `id` and its full upstream/downstream lineage lit, dim the rest.
    /// Unknown ids leave the state untouched.
    pub fn hover_enter(&mut self, id: &str) {
        if !self.view.contains(id) {
            debug!("hover on unknown node {}", id);
            return;
        }
        let keep = self.view.lineage(id);
        self.dimmed.emphasize_only(&self.view, &keep);
    }

    pub fn hover_leave(&mut self) {
        self.dimmed.clear_all();
    }

    pub fn is_clickable(&self, node: &Node) -> bool {
        match node.kind {
            NodeKind::Dataset => true,
            NodeKind::Job => self.options.clickable_jobs,
        }
    }

    /// Open the detail panel for `id`, replacing any previous one.
    /// Returns `None` (panel unchanged) when the node is not clickable.
    pub fn click(&mut self, id: &str) -> Option<&DetailPanel> {
        let node = self.graph.node(id)?;
        if !self.is_clickable(node) {
            return None;
        }
        self.panel = Some(DetailPanel::for_node(node));
        self.panel.as_ref()
    }

    pub fn search(&mut self, query: &str) -> SearchOutcome {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            self.dimmed.clear_all();
            self.hit_count = None;
            return SearchOutcome::Cleared;
        }

        let hits: Vec<String> = self
            .graph
            .nodes()
            .iter()
            .filter(|n| search_blob(n).contains(&q))
            .map(|n| n.id.clone())
            .collect();

        let mut keep = Reach::default();
        for id in &hits {
            keep.merge(self.view.lineage(id));
        }
        self.dimmed.emphasize_only(&self.view, &keep);
        self.hit_count = Some(hits.len());
        debug!("search {:?}: {} direct hits", q, hits.len());

        SearchOutcome::Matched { hits }
    }

    pub fn dimmed(&self) -> &DeEmphasis {
        &self.dimmed
    }

    pub fn panel(&self) -> Option<&DetailPanel> {
        self.panel.as_ref()
    }

    /// `None` while the counter display is cleared.
    pub fn hit_count(&self) -> Option<usize> {
        self.hit_count
    }

    /// Node ids currently lit, in graph order.
    pub fn lit_nodes(&self) -> Vec<&str> {
        self.view
            .node_ids()
            .filter(|id| !self.dimmed.is_node_dimmed(id))
            .collect()
    }
}
