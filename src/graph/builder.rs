//! Events -> lineage graph.
//!
//! Per event: the job node, then each input (node + `input` edge), then each
//! output (node + `output` edge). This order fixes node insertion order, which
//! the renderer uses for layout tie-breaks.

use crate::event::{RawDataset, RawEvent};
use crate::graph::{EdgeRole, LineageGraph, Node, NodeKind, dataset_id, job_id};
use crate::meta::{self, Metadata};

use thiserror::Error;
use tracing::debug;

/// A malformed event aborts the whole build; no partial graph is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("event {index}: job name is missing")]
    MissingJobName { index: usize },

    #[error("event {index}: {side}[{position}] has no dataset name")]
    MissingDatasetName {
        index: usize,
        side: &'static str,
        position: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Job metadata key whose value replaces the job name as label.
    pub label_key: Option<String>,
}

pub fn build_graph(events: &[RawEvent], opts: &BuildOptions) -> Result<LineageGraph, BuildError> {
    let mut graph = LineageGraph::default();

    for (index, event) in events.iter().enumerate() {
        let job = event.job.as_ref();
        let name = job
            .and_then(|j| j.name.as_deref())
            .filter(|n| !n.is_empty())
            .ok_or(BuildError::MissingJobName { index })?;

        let metadata = meta::metadata_from_facets(job.and_then(|j| j.facets.as_ref()));
        let jid = job_id(name);
        graph.ensure_node(Node {
            id: jid.clone(),
            label: job_label(name, &metadata, opts),
            kind: NodeKind::Job,
            metadata,
        });

        for (position, input) in event.inputs().iter().enumerate() {
            let node = dataset_node(input).ok_or(BuildError::MissingDatasetName {
                index,
                side: "inputs",
                position,
            })?;
            let did = node.id.clone();
            graph.ensure_node(node);
            graph.push_edge(did, jid.clone(), EdgeRole::Input);
        }

        for (position, output) in event.outputs().iter().enumerate() {
            let node = dataset_node(output).ok_or(BuildError::MissingDatasetName {
                index,
                side: "outputs",
                position,
            })?;
            let did = node.id.clone();
            graph.ensure_node(node);
            graph.push_edge(jid.clone(), did, EdgeRole::Output);
        }
    }

    graph.event_count = events.len();
    debug!(
        "built lineage graph: {} nodes, {} edges from {} events",
        graph.nodes.len(),
        graph.edges.len(),
        events.len()
    );
    Ok(graph)
}

fn job_label(name: &str, metadata: &Metadata, opts: &BuildOptions) -> String {
    opts.label_key
        .as_deref()
        .and_then(|key| metadata.get(key))
        .filter(|v| !v.is_falsy())
        .map(|v| v.to_string())
        .unwrap_or_else(|| name.to_string())
}

fn dataset_node(ds: &RawDataset) -> Option<Node> {
    let name = ds.name.as_deref().filter(|n| !n.is_empty())?;
    let namespace = ds.namespace.as_deref().unwrap_or_default();
    Some(Node {
        id: dataset_id(namespace, name),
        label: name.to_string(),
        kind: NodeKind::Dataset,
        metadata: meta::metadata_from_facets(ds.facets.as_ref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::parse::parse_events;
    use crate::graph::Edge;
    use crate::meta::MetaValue;
    use pretty_assertions::assert_eq;

    fn build(text: &str) -> Result<LineageGraph, BuildError> {
        let events = parse_events(text, "test").unwrap();
        build_graph(&events, &BuildOptions::default())
    }

    fn edge(id: &str, source: &str, target: &str, role: EdgeRole) -> Edge {
        Edge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            role,
        }
    }

    fn ids(graph: &LineageGraph) -> Vec<&str> {
        graph.nodes().iter().map(|n| n.id.as_str()).collect()
    }

    const SCENARIO_A: &str = r#"[{"job": {"name": "etl1"},
        "inputs": [{"namespace": "ns", "name": "raw"}],
        "outputs": [{"namespace": "ns", "name": "curated"}]}]"#;

    #[test]
    fn single_event_graph() {
        let graph = build(SCENARIO_A).unwrap();
        assert_eq!(ids(&graph), vec!["job:etl1", "ds:ns.raw", "ds:ns.curated"]);
        assert_eq!(
            graph.edges(),
            &[
                edge("e0", "ds:ns.raw", "job:etl1", EdgeRole::Input),
                edge("e1", "job:etl1", "ds:ns.curated", EdgeRole::Output),
            ]
        );
        let raw = graph.node("ds:ns.raw").unwrap();
        assert_eq!(raw.label, "raw");
        assert_eq!(raw.kind, NodeKind::Dataset);
        assert_eq!(graph.node("job:etl1").unwrap().label, "etl1");
    }

    #[test]
    fn shared_output_is_one_node_with_two_edges() {
        let graph = build(
            r#"[
            {"job": {"name": "a"}, "outputs": [{"namespace": "ns", "name": "curated"}]},
            {"job": {"name": "b"}, "outputs": [{"namespace": "ns", "name": "curated"}]}
        ]"#,
        )
        .unwrap();
        assert_eq!(ids(&graph), vec!["job:a", "ds:ns.curated", "job:b"]);
        assert_eq!(
            graph.edges(),
            &[
                edge("e0", "job:a", "ds:ns.curated", EdgeRole::Output),
                edge("e1", "job:b", "ds:ns.curated", EdgeRole::Output),
            ]
        );
    }

    #[test]
    fn repeated_runs_keep_duplicate_edges_and_one_job() {
        let graph = build(&format!(
            "[{0},{0}]",
            r#"{"job": {"name": "etl1"}, "inputs": [{"namespace": "ns", "name": "raw"}]}"#
        ))
        .unwrap();
        assert_eq!(ids(&graph), vec!["job:etl1", "ds:ns.raw"]);
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.edges()[0].source, graph.edges()[1].source);
        assert_ne!(graph.edges()[0].id, graph.edges()[1].id);
    }

    #[test]
    fn dataset_used_as_input_and_output_is_deduplicated() {
        let graph = build(
            r#"[
            {"job": {"name": "load"}, "outputs": [{"namespace": "ns", "name": "raw"}]},
            {"job": {"name": "etl1"}, "inputs": [{"namespace": "ns", "name": "raw"}]}
        ]"#,
        )
        .unwrap();
        let raw_nodes = graph.nodes().iter().filter(|n| n.id == "ds:ns.raw").count();
        assert_eq!(raw_nodes, 1);
    }

    #[test]
    fn same_name_in_other_namespace_is_distinct() {
        let graph = build(
            r#"[{"job": {"name": "j"},
            "inputs": [{"namespace": "a", "name": "t"}, {"namespace": "b", "name": "t"}]}]"#,
        )
        .unwrap();
        assert_eq!(ids(&graph), vec!["job:j", "ds:a.t", "ds:b.t"]);
    }

    #[test]
    fn edge_count_matches_references() {
        let graph = build(
            r#"[
            {"job": {"name": "a"}, "inputs": [{"namespace": "n", "name": "x"}, {"namespace": "n", "name": "y"}],
             "outputs": [{"namespace": "n", "name": "z"}]},
            {"job": {"name": "b"}, "inputs": [{"namespace": "n", "name": "z"}]}
        ]"#,
        )
        .unwrap();
        let totals = graph.totals();
        assert_eq!(graph.edges().len(), 4);
        assert_eq!(totals.input_edges, 3);
        assert_eq!(totals.output_edges, 1);
        assert_eq!(totals.jobs, 2);
        assert_eq!(totals.datasets, 3);
        assert_eq!(totals.events, 2);
        for e in graph.edges() {
            let (src, dst) = (graph.node(&e.source).unwrap(), graph.node(&e.target).unwrap());
            match e.role {
                EdgeRole::Input => {
                    assert_eq!((src.kind, dst.kind), (NodeKind::Dataset, NodeKind::Job))
                }
                EdgeRole::Output => {
                    assert_eq!((src.kind, dst.kind), (NodeKind::Job, NodeKind::Dataset))
                }
            }
        }
    }

    #[test]
    fn build_is_deterministic() {
        let a = build(SCENARIO_A).unwrap();
        let b = build(SCENARIO_A).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_job_name_names_the_event() {
        let err = build(
            r#"[{"job": {"name": "ok"}}, {"job": {}, "inputs": [{"namespace": "n", "name": "x"}]}]"#,
        )
        .unwrap_err();
        assert_eq!(err, BuildError::MissingJobName { index: 1 });
        assert_eq!(err.to_string(), "event 1: job name is missing");
    }

    #[test]
    fn missing_job_object_and_empty_name_are_malformed() {
        assert_eq!(
            build(r#"[{"inputs": []}]"#).unwrap_err(),
            BuildError::MissingJobName { index: 0 }
        );
        assert_eq!(
            build(r#"[{"job": {"name": ""}}]"#).unwrap_err(),
            BuildError::MissingJobName { index: 0 }
        );
    }

    #[test]
    fn missing_dataset_name_names_event_and_position() {
        let err = build(
            r#"[{"job": {"name": "a"}}, {"job": {"name": "b"},
            "outputs": [{"namespace": "n", "name": "ok"}, {"namespace": "n"}]}]"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingDatasetName {
                index: 1,
                side: "outputs",
                position: 1
            }
        );
        assert_eq!(err.to_string(), "event 1: outputs[1] has no dataset name");
    }

    #[test]
    fn missing_namespace_is_empty() {
        let graph = build(r#"[{"job": {"name": "a"}, "inputs": [{"name": "x"}]}]"#).unwrap();
        assert!(graph.node("ds:.x").is_some());
    }

    #[test]
    fn first_occurrence_keeps_metadata() {
        let graph = build(
            r#"[
            {"job": {"name": "a"}, "outputs": [{"namespace": "n", "name": "t",
                "facets": {"metadata": {"meta": {"owner": "first"}}}}]},
            {"job": {"name": "b"}, "inputs": [{"namespace": "n", "name": "t",
                "facets": {"metadata": {"meta": {"owner": "second"}}}}]}
        ]"#,
        )
        .unwrap();
        assert_eq!(
            graph.node("ds:n.t").unwrap().metadata.get("owner"),
            Some(&MetaValue::Str("first".into()))
        );
    }

    #[test]
    fn label_key_overrides_job_label() {
        let events = parse_events(
            r#"[
            {"job": {"name": "etl_01", "facets": {"metadata": {"meta": {"naam": "Nightly load"}}}}},
            {"job": {"name": "etl_02", "facets": {"metadata": {"meta": {"naam": ""}}}}}
        ]"#,
            "test",
        )
        .unwrap();
        let opts = BuildOptions {
            label_key: Some("naam".into()),
        };
        let graph = build_graph(&events, &opts).unwrap();
        assert_eq!(graph.node("job:etl_01").unwrap().label, "Nightly load");
        assert_eq!(graph.node("job:etl_02").unwrap().label, "etl_02");

        let plain = build_graph(&events, &BuildOptions::default()).unwrap();
        assert_eq!(plain.node("job:etl_01").unwrap().label, "etl_01");
    }
}
