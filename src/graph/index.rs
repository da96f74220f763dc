//! Traversal surface the interaction layer needs from the rendered graph.
//!
//! The browser viewer gets the same answers precomputed; in-process callers go
//! through [`GraphView`] so another traversal backend can be swapped in.

use crate::graph::LineageGraph;
use std::collections::{BTreeMap, BTreeSet};

/// Nodes and edges reached by a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reach {
    pub nodes: BTreeSet<String>,
    pub edges: BTreeSet<String>,
}

impl Reach {
    pub fn merge(&mut self, other: Reach) {
        self.nodes.extend(other.nodes);
        self.edges.extend(other.edges);
    }
}

pub trait GraphView {
    fn node_ids(&self) -> impl Iterator<Item = &str>;

    fn edge_ids(&self) -> impl Iterator<Item = &str>;

    fn contains(&self, id: &str) -> bool;

    /// Transitive upstream: every node with a path to `id`, and the edges on
    /// those paths.
    fn predecessors(&self, id: &str) -> Reach;

    /// Transitive downstream.
    fn successors(&self, id: &str) -> Reach;

    /// `id` with everything upstream and downstream of it. Empty for unknown ids.
    fn lineage(&self, id: &str) -> Reach {
        if !self.contains(id) {
            return Reach::default();
        }
        let mut reach = self.predecessors(id);
        reach.merge(self.successors(id));
        reach.nodes.insert(id.to_string());
        reach
    }
}

/// (edge id, neighbour id)
type Adjacency = BTreeMap<String, Vec<(String, String)>>;

/// Adjacency index over a built graph.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    nodes: Vec<String>,
    edges: Vec<String>,
    parents: Adjacency,
    children: Adjacency,
}

impl GraphIndex {
    pub fn new(graph: &LineageGraph) -> Self {
        let mut parents = Adjacency::new();
        let mut children = Adjacency::new();
        for e in graph.edges() {
            children
                .entry(e.source.clone())
                .or_default()
                .push((e.id.clone(), e.target.clone()));
            parents
                .entry(e.target.clone())
                .or_default()
                .push((e.id.clone(), e.source.clone()));
        }

        Self {
            nodes: graph.nodes().iter().map(|n| n.id.clone()).collect(),
            edges: graph.edges().iter().map(|e| e.id.clone()).collect(),
            parents,
            children,
        }
    }
}

/// Depth-first walk along one direction. Cycles terminate on the visited set.
fn walk(adjacency: &Adjacency, start: &str) -> Reach {
    let mut reach = Reach::default();
    let mut stack = vec![start.to_string()];
    let mut seen = BTreeSet::from([start.to_string()]);

    while let Some(cur) = stack.pop() {
        let Some(next) = adjacency.get(&cur) else {
            continue;
        };
        for (edge, neighbour) in next {
            reach.edges.insert(edge.clone());
            reach.nodes.insert(neighbour.clone());
            if seen.insert(neighbour.clone()) {
                stack.push(neighbour.clone());
            }
        }
    }

    reach
}

impl GraphView for GraphIndex {
    fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    fn edge_ids(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(String::as_str)
    }

    fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n == id)
    }

    fn predecessors(&self, id: &str) -> Reach {
        walk(&self.parents, id)
    }

    fn successors(&self, id: &str) -> Reach {
        walk(&self.children, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::parse::parse_events;
    use crate::graph::{BuildOptions, build_graph};
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// raw -> etl1 -> curated -> report_job -> report, plus side -> other_job.
    fn chain() -> GraphIndex {
        let events = parse_events(
            r#"[
            {"job": {"name": "etl1"}, "inputs": [{"namespace": "ns", "name": "raw"}],
             "outputs": [{"namespace": "ns", "name": "curated"}]},
            {"job": {"name": "report_job"}, "inputs": [{"namespace": "ns", "name": "curated"}],
             "outputs": [{"namespace": "ns", "name": "report"}]},
            {"job": {"name": "other_job"}, "inputs": [{"namespace": "ns", "name": "side"}]}
        ]"#,
            "test",
        )
        .unwrap();
        GraphIndex::new(&build_graph(&events, &BuildOptions::default()).unwrap())
    }

    #[test]
    fn predecessors_are_transitive() {
        let idx = chain();
        let up = idx.predecessors("ds:ns.report");
        assert_eq!(
            up.nodes,
            set(&["job:report_job", "ds:ns.curated", "job:etl1", "ds:ns.raw"])
        );
        assert_eq!(up.edges, set(&["e0", "e1", "e2", "e3"]));
    }

    #[test]
    fn successors_are_transitive() {
        let idx = chain();
        let down = idx.successors("ds:ns.raw");
        assert_eq!(
            down.nodes,
            set(&["job:etl1", "ds:ns.curated", "job:report_job", "ds:ns.report"])
        );
    }

    #[test]
    fn lineage_covers_both_directions_and_self() {
        let idx = chain();
        let reach = idx.lineage("ds:ns.curated");
        assert_eq!(
            reach.nodes,
            set(&[
                "ds:ns.curated",
                "job:etl1",
                "ds:ns.raw",
                "job:report_job",
                "ds:ns.report"
            ])
        );
        assert!(!reach.nodes.contains("ds:ns.side"));
        assert!(!reach.edges.contains("e4"));
    }

    #[test]
    fn unknown_node_has_empty_lineage() {
        assert_eq!(chain().lineage("ds:nope"), Reach::default());
    }

    #[test]
    fn cycles_terminate() {
        let events = parse_events(
            r#"[
            {"job": {"name": "a"}, "inputs": [{"namespace": "n", "name": "x"}],
             "outputs": [{"namespace": "n", "name": "y"}]},
            {"job": {"name": "b"}, "inputs": [{"namespace": "n", "name": "y"}],
             "outputs": [{"namespace": "n", "name": "x"}]}
        ]"#,
            "test",
        )
        .unwrap();
        let idx = GraphIndex::new(&build_graph(&events, &BuildOptions::default()).unwrap());
        let up = idx.predecessors("job:a");
        assert_eq!(up.nodes, set(&["ds:n.x", "job:b", "ds:n.y", "job:a"]));
    }
}
