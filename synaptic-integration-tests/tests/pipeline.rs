use std::sync::Arc;

use serde::{Deserialize, Serialize};
use synaptic::diagnostics::{Diagnostic, MemorySink};
use synaptic::graph::{Graph, TemplateType};
use synaptic::layout::{layout_graph, EdgeKind, MapType, PositionedGraph};
use synaptic::palette;
use synaptic_genai::{ChunkOptions, ExtractionError, GraphExtractor};
use synaptic_test_utils::{
    four_node_graph, load_fixture_text, load_golden_json, update_golden_requested, write_golden,
    ScriptedProvider,
};

const DOCUMENT: &str = "documents/industrial_revolution.txt";
const SUMMARY_GOLDEN: &str = "industrial_revolution_summary.json";

fn chunk_options() -> ChunkOptions {
    ChunkOptions {
        max_chunk_chars: 500,
        overlap_chars: 80,
    }
}

fn chunk_reply(n: usize) -> String {
    load_fixture_text(&format!("responses/chunk_{n}.json")).expect("chunk reply fixture")
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GraphSummary {
    title: String,
    template: TemplateType,
    node_count: usize,
    edge_count: usize,
    max_depth: u32,
    root_edges: Vec<String>,
    cross_links: Vec<String>,
}

impl GraphSummary {
    fn of(graph: &Graph) -> Self {
        Self {
            title: graph.title.clone(),
            template: graph.template,
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            max_depth: graph.metadata.max_depth,
            root_edges: graph
                .edges
                .iter()
                .filter(|e| e.from == "root")
                .filter(|e| !graph.is_cross_link(e))
                .map(|e| e.id.clone())
                .collect(),
            cross_links: graph
                .edges
                .iter()
                .filter(|e| graph.is_cross_link(e))
                .map(|e| e.id.clone())
                .collect(),
        }
    }
}

fn assert_cross_links_match(graph: &Graph, positioned: &PositionedGraph) {
    for edge in &graph.edges {
        let Some(laid_out) = positioned.edge(&edge.id) else {
            continue;
        };
        assert_eq!(
            laid_out.is_cross_link,
            graph.is_cross_link(edge),
            "{} in {} layout",
            edge.id,
            positioned.map_type
        );
    }
}

#[tokio::test]
async fn test_chunked_document_pipeline() {
    let text = load_fixture_text(DOCUMENT).unwrap();
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply(chunk_reply(1))
            .reply(chunk_reply(2))
            .reply(chunk_reply(3)),
    );
    let sink = Arc::new(MemorySink::new());
    let extractor = GraphExtractor::new(provider.clone()).with_sink(sink.clone());

    let mut progress = Vec::new();
    let graph = extractor
        .extract_chunked(&text, &chunk_options(), |p| progress.push(p))
        .await
        .unwrap();

    assert_eq!(progress.len(), 3);
    assert!(progress.iter().all(|p| p.total == 3));
    assert_eq!(provider.remaining(), 0);
    for prompt in provider.prompts() {
        assert!(prompt.contains("at most 12 nodes"));
        assert!(prompt.contains("levels run from 0 to 3"));
    }
    assert!(sink.is_empty(), "unexpected diagnostics: {:?}", sink.diagnostics());

    let summary = GraphSummary::of(&graph);
    if update_golden_requested() {
        let mut bytes = serde_json::to_vec_pretty(&summary).unwrap();
        bytes.push(b'\n');
        write_golden(SUMMARY_GOLDEN, &bytes).unwrap();
    }
    let expected: GraphSummary = load_golden_json(SUMMARY_GOLDEN).unwrap();
    assert_eq!(summary, expected);

    // The edge without an id or relationship in chunk 3 gets defaults.
    let defaulted = graph
        .edges
        .iter()
        .find(|e| e.id == "chunk3_edge_0")
        .unwrap();
    assert_eq!(defaulted.relationship, "contains");
    assert!(graph.nodes.iter().all(|n| n.fidelity.is_some()));
    assert!(graph.verify_graph_integrity().is_ok());

    for map_type in MapType::ALL {
        let positioned = layout_graph(&graph, Some(map_type)).unwrap();
        assert_eq!(positioned.map_type, map_type);
        assert!(positioned.nodes.len() >= graph.nodes.len());
        assert_cross_links_match(&graph, &positioned);
    }
}

#[tokio::test]
async fn test_timeline_layout_of_extracted_document() {
    let text = load_fixture_text(DOCUMENT).unwrap();
    let provider = ScriptedProvider::new()
        .reply(chunk_reply(1))
        .reply(chunk_reply(2))
        .reply(chunk_reply(3));
    let graph = GraphExtractor::new(Arc::new(provider))
        .extract_chunked(&text, &chunk_options(), |_| {})
        .await
        .unwrap();

    let positioned = layout_graph(&graph, None).unwrap();
    assert_eq!(positioned.map_type, MapType::Timeline);

    let jenny = positioned.node("chunk1_jenny").unwrap();
    assert_eq!(jenny.data.label, "Spinning jenny 1764");
    assert!(jenny.data.date.is_some());
    assert!(positioned
        .node(&synaptic::layout::badge_id("chunk1_jenny"))
        .is_some());

    let axis = positioned
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Axis)
        .count();
    assert_eq!(axis, graph.nodes.len() - 1);
}

#[tokio::test]
async fn test_partial_chunk_failure_is_skipped() {
    let text = load_fixture_text(DOCUMENT).unwrap();
    let provider = ScriptedProvider::new()
        .reply(chunk_reply(1))
        .fail("rate limited")
        .reply(chunk_reply(3));
    let sink = Arc::new(MemorySink::new());
    let graph = GraphExtractor::new(Arc::new(provider))
        .with_sink(sink.clone())
        .extract_chunked(&text, &chunk_options(), |_| {})
        .await
        .unwrap();

    let failures: Vec<usize> = sink
        .diagnostics()
        .into_iter()
        .filter_map(|d| match d {
            Diagnostic::ChunkFailed { chunk_index, .. } => Some(chunk_index),
            _ => None,
        })
        .collect();
    assert_eq!(failures, vec![1]);

    // Surviving chunk graphs are numbered by merge position.
    assert!(graph.edges.iter().any(|e| e.id == "root_to_chunk2"));
    assert!(graph.edges.iter().all(|e| e.id != "root_to_chunk3"));
    assert_eq!(
        graph.get_node_by_id("chunk2_act").unwrap().label,
        "Factory Act 1833"
    );
}

#[tokio::test]
async fn test_oversized_levels_survive_merge_and_layout() {
    let text = load_fixture_text(DOCUMENT).unwrap();
    let provider = ScriptedProvider::new()
        .reply_json(&serde_json::json!({
            "title": "Runaway",
            "nodes": [
                {"id": "r", "label": "Runaway", "level": 0},
                {"id": "a", "label": "Anchor", "level": 1},
                {"id": "x", "label": "Loop start", "level": 2},
                {"id": "y", "label": "Loop end", "level": 99_999_999_999u64}
            ],
            "edges": [
                {"id": "e1", "from": "r", "to": "a"},
                {"id": "e2", "from": "x", "to": "y"},
                {"id": "e3", "from": "y", "to": "x"}
            ]
        }))
        .reply(chunk_reply(2))
        .reply(chunk_reply(3));
    let graph = GraphExtractor::new(Arc::new(provider))
        .extract_chunked(&text, &chunk_options(), |_| {})
        .await
        .unwrap();

    assert_eq!(graph.get_node_by_id("chunk1_y").unwrap().level, u32::MAX);
    assert_eq!(graph.root_nodes().len(), 1);
    for map_type in MapType::ALL {
        assert!(layout_graph(&graph, Some(map_type)).is_ok());
    }
}

#[tokio::test]
async fn test_every_chunk_failing_reports_last_error() {
    let text = load_fixture_text(DOCUMENT).unwrap();
    let provider = ScriptedProvider::new()
        .fail("offline")
        .fail("offline")
        .fail("still offline");
    let err = GraphExtractor::new(Arc::new(provider))
        .extract_chunked(&text, &chunk_options(), |_| {})
        .await
        .unwrap_err();

    match err {
        ExtractionError::AllChunksFailed {
            attempted,
            last_error,
        } => {
            assert_eq!(attempted, 3);
            assert!(last_error.contains("still offline"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_dangling_edge_is_reported_and_skipped_by_layout() {
    let provider = ScriptedProvider::new().reply_json(&serde_json::json!({
        "title": "Cells",
        "nodes": [
            {"id": "cell", "label": "Cell", "level": 0},
            {"id": "nucleus", "label": "Nucleus", "level": 1}
        ],
        "edges": [
            {"id": "e1", "from": "cell", "to": "nucleus", "relationship": "contains"},
            {"id": "e2", "from": "nucleus", "to": "ribosome", "relationship": "directs"}
        ]
    }));
    let sink = Arc::new(MemorySink::new());
    let graph = GraphExtractor::new(Arc::new(provider))
        .with_sink(sink.clone())
        .extract("Cells have a nucleus that directs the ribosome.")
        .await
        .unwrap();

    assert_eq!(graph.edges.len(), 2);
    assert_eq!(sink.dangling_edges(), vec!["e2"]);

    for map_type in MapType::ALL {
        let positioned = layout_graph(&graph, Some(map_type)).unwrap();
        assert!(positioned.edge("e1").is_some());
        assert!(positioned.edge("e2").is_none());
    }
}

#[test]
fn test_four_node_scenario_hierarchical() {
    let graph = four_node_graph();
    let positioned = layout_graph(&graph, Some(MapType::Hierarchical)).unwrap();

    let color = |id: &str| positioned.node(id).unwrap().data.branch_color.clone();
    assert_eq!(color("A"), palette::branch_color(0));
    assert_eq!(color("B"), palette::branch_color(1));
    assert_eq!(color("A1"), color("A"));
    assert_ne!(color("A"), color("B"));

    let root = positioned.node("root").unwrap();
    assert_eq!((root.x, root.y), (0.0, 0.0));
    assert!(positioned.edges.iter().all(|e| !e.is_cross_link));
}

#[test]
fn test_four_node_scenario_radial() {
    let graph = four_node_graph();
    let positioned = layout_graph(&graph, Some(MapType::Radial)).unwrap();

    let polar = |id: &str| {
        let node = positioned.node(id).unwrap();
        (node.y.atan2(node.x).to_degrees(), node.x.hypot(node.y))
    };

    let (a_angle, _) = polar("A");
    let (b_angle, _) = polar("B");
    let (a1_angle, a1_radius) = polar("A1");
    assert!((a_angle + 90.0).abs() < 1e-6);
    assert!((b_angle - 90.0).abs() < 1e-6);
    assert!((a1_angle + 90.0).abs() < 1e-6);
    assert!((a1_radius - 1131.37).abs() < 0.01);
    assert_eq!(
        positioned.node("A1").unwrap().data.branch_color,
        positioned.node("A").unwrap().data.branch_color
    );
}
