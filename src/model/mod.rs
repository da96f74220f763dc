//! Viewer model: the built graph plus everything the browser needs to replay
//! the interaction controller without re-deriving it.

use crate::config::{LayoutOptions, ViewerConfig};
use crate::graph::{EdgeRole, GraphIndex, GraphView, LineageGraph, NodeKind, Totals};
use crate::interact::{self, Controller};
use crate::meta::Metadata;
use crate::render::{StyleRule, default_style_sheet};

use serde::Serialize;
use std::collections::BTreeMap;

/// Cytoscape element wrapper: `{ "data": { ... } }`.
#[derive(Debug, Clone, Serialize)]
pub struct Element<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: EdgeRole,
}

#[derive(Debug, Clone, Serialize)]
pub struct Elements {
    pub nodes: Vec<Element<NodeData>>,
    pub edges: Vec<Element<EdgeData>>,
}

/// Hover highlight set for one node.
#[derive(Debug, Clone, Serialize)]
pub struct LineageView {
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewerData {
    pub title: String,
    pub elements: Elements,
    pub style: Vec<StyleRule>,
    pub layout: LayoutOptions,

    /// node id -> nodes/edges kept lit while hovering it.
    pub lineage: BTreeMap<String, LineageView>,

    /// node id -> lowercased search blob.
    pub search: BTreeMap<String, String>,

    /// Rendered detail panels, only for clickable nodes.
    pub panels: BTreeMap<String, String>,

    pub totals: Totals,
}

pub fn build_viewer_data(graph: &LineageGraph, config: &ViewerConfig) -> ViewerData {
    let index = GraphIndex::new(graph);

    let nodes = graph
        .nodes()
        .iter()
        .map(|n| Element {
            data: NodeData {
                id: n.id.clone(),
                label: n.label.clone(),
                kind: n.kind,
                metadata: n.metadata.clone(),
            },
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|e| Element {
            data: EdgeData {
                id: e.id.clone(),
                source: e.source.clone(),
                target: e.target.clone(),
                label: e.role,
            },
        })
        .collect();

    let mut lineage = BTreeMap::new();
    let mut search = BTreeMap::new();
    for node in graph.nodes() {
        let reach = index.lineage(&node.id);
        lineage.insert(
            node.id.clone(),
            LineageView {
                nodes: reach.nodes.into_iter().collect(),
                edges: reach.edges.into_iter().collect(),
            },
        );
        search.insert(node.id.clone(), interact::search_blob(node));
    }

    let mut controller = Controller::new(graph, index, config.interaction_options());
    let mut panels = BTreeMap::new();
    for node in graph.nodes() {
        if let Some(panel) = controller.click(&node.id) {
            panels.insert(node.id.clone(), panel.to_html());
        }
    }

    ViewerData {
        title: config.title.clone(),
        elements: Elements { nodes, edges },
        style: default_style_sheet(),
        layout: config.layout.clone(),
        lineage,
        search,
        panels,
        totals: graph.totals(),
    }
}
