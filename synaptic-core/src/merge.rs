//! Merge independently extracted chunk graphs under one synthesized root.

use tracing::debug;

use crate::graph::{Category, Edge, Graph, Node};

#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Title for the merged graph and label of the synthesized root. Defaults to
    /// the first chunk graph's title.
    pub title: Option<String>,
    pub root_id: String,
    pub root_relationship: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            title: None,
            root_id: "root".to_string(),
            root_relationship: "includes".to_string(),
        }
    }
}

/// Namespace prefix for the `n`th (1-based) chunk graph.
pub fn chunk_prefix(n: usize) -> String {
    format!("chunk{}_", n)
}

fn former_root(graph: &Graph) -> Option<&Node> {
    graph
        .root()
        .or_else(|| graph.nodes.iter().min_by_key(|n| n.level))
}

/// Merge chunk graphs in order.
///
/// A single graph is returned unchanged. With several graphs every node is
/// pushed one level down, node and edge ids are prefixed with `chunk{n}_`, and
/// the synthesized root gets one edge to each chunk's former root. Graphs with
/// no nodes contribute nothing.
pub fn merge_graphs(mut graphs: Vec<Graph>, options: &MergeOptions) -> Graph {
    if graphs.len() == 1 {
        if let Some(graph) = graphs.pop() {
            return graph;
        }
    }

    let title = options
        .title
        .clone()
        .or_else(|| graphs.first().map(|g| g.title.clone()))
        .unwrap_or_else(|| "Document overview".to_string());

    let section_titles: Vec<&str> = graphs
        .iter()
        .filter(|g| !g.nodes.is_empty())
        .map(|g| g.title.as_str())
        .collect();

    let root = Node::new(options.root_id.clone(), title.clone(), 0)
        .with_category(Category::Concept)
        .with_description(format!(
            "Overview combining {} sections: {}",
            section_titles.len(),
            section_titles.join("; ")
        ));

    let mut nodes = vec![root];
    let mut edges = Vec::new();

    for (position, graph) in graphs.iter().enumerate() {
        let n = position + 1;
        let Some(anchor) = former_root(graph) else {
            debug!("Skipping empty chunk graph {}", n);
            continue;
        };
        let prefix = chunk_prefix(n);

        edges.push(Edge::new(
            format!("{}_to_chunk{}", options.root_id, n),
            options.root_id.clone(),
            format!("{}{}", prefix, anchor.id),
            options.root_relationship.clone(),
        ));

        nodes.extend(graph.nodes.iter().map(|node| Node {
            id: format!("{}{}", prefix, node.id),
            level: node.level.saturating_add(1),
            ..node.clone()
        }));

        edges.extend(graph.edges.iter().map(|edge| Edge {
            id: format!("{}{}", prefix, edge.id),
            from: format!("{}{}", prefix, edge.from),
            to: format!("{}{}", prefix, edge.to),
            relationship: edge.relationship.clone(),
        }));

        debug!(
            "Merged chunk {} ({} nodes, {} edges)",
            n,
            graph.nodes.len(),
            graph.edges.len()
        );
    }

    let template = graphs.first().map(|g| g.template).unwrap_or_default();
    Graph::new(title, nodes, edges).with_template(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TemplateType;

    fn chunk(title: &str, category: Category) -> Graph {
        Graph::new(
            title,
            vec![
                Node::new("root", title, 0),
                Node::new("a", "A", 1).with_category(category),
                Node::new("b", "B", 2),
            ],
            vec![
                Edge::new("edge_0", "root", "a", "contains"),
                Edge::new("edge_1", "a", "b", "contains"),
            ],
        )
    }

    #[test]
    fn test_single_graph_is_identity() {
        let g = chunk("Only", Category::Process).with_template(TemplateType::Timeline);
        let merged = merge_graphs(vec![g.clone()], &MergeOptions::default());
        assert_eq!(merged, g);
    }

    #[test]
    fn test_merge_structure() {
        let graphs = vec![
            chunk("Part one", Category::Process),
            chunk("Part two", Category::Example),
            chunk("Part three", Category::Data),
        ];
        let merged = merge_graphs(
            graphs,
            &MergeOptions {
                title: Some("Biology".into()),
                ..Default::default()
            },
        );

        let roots = merged.root_nodes();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].label, "Biology");
        let from_root = merged.edges.iter().filter(|e| e.from == "root").count();
        assert_eq!(from_root, 3);

        assert_eq!(merged.get_node_by_id("chunk2_root").map(|n| n.level), Some(1));
        assert_eq!(merged.get_node_by_id("chunk3_b").map(|n| n.level), Some(3));
        assert_eq!(merged.metadata.max_depth, 3);
        assert_eq!(merged.metadata.total_nodes, 10);

        let edge = merged
            .edges
            .iter()
            .find(|e| e.id == "chunk1_edge_1")
            .unwrap();
        assert_eq!((edge.from.as_str(), edge.to.as_str()), ("chunk1_a", "chunk1_b"));

        for category in ["process", "example", "data"] {
            assert!(merged.metadata.categories.iter().any(|c| c == category));
        }
        assert!(merged.dangling_edges().is_empty());
        assert!(merged.orphan_nodes().is_empty());
    }

    #[test]
    fn test_ids_unique_after_merge() {
        let merged = merge_graphs(
            vec![chunk("x", Category::Concept), chunk("y", Category::Concept)],
            &MergeOptions::default(),
        );
        let mut ids: Vec<&str> = merged.nodes.iter().map(|n| n.id.as_str()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(merged.title, "x");
    }

    #[test]
    fn test_rootless_chunk_links_shallowest_node() {
        let rootless = Graph::new(
            "rootless",
            vec![Node::new("deep", "Deep", 2), Node::new("top", "Top", 1)],
            vec![],
        );
        let merged = merge_graphs(
            vec![chunk("a", Category::Concept), rootless],
            &MergeOptions::default(),
        );
        assert!(merged
            .edges
            .iter()
            .any(|e| e.from == "root" && e.to == "chunk2_top"));
    }

    #[test]
    fn test_empty_chunk_contributes_nothing() {
        let merged = merge_graphs(
            vec![
                chunk("a", Category::Concept),
                Graph::new("empty", vec![], vec![]),
                chunk("c", Category::Concept),
            ],
            &MergeOptions::default(),
        );
        assert_eq!(merged.edges.iter().filter(|e| e.from == "root").count(), 2);
        assert!(merged.get_node_by_id("chunk3_a").is_some());
    }

    #[test]
    fn test_maximal_level_saturates_instead_of_wrapping() {
        let deep = Graph::new(
            "deep",
            vec![Node::new("r", "R", 0), Node::new("z", "Z", u32::MAX)],
            vec![Edge::new("e1", "r", "z", "contains")],
        );
        let merged = merge_graphs(
            vec![deep, chunk("b", Category::Concept)],
            &MergeOptions::default(),
        );
        assert_eq!(merged.get_node_by_id("chunk1_z").map(|n| n.level), Some(u32::MAX));
        assert_eq!(merged.root_nodes().len(), 1);
    }
}
