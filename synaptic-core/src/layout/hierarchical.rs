//! Left-to-right tree layout, shared by the hierarchical and concept map types.
//!
//! Columns are levels and each column is centered vertically. The two map types
//! differ only in how loudly cross-links are drawn.

use std::collections::BTreeMap;

use crate::branch::BranchResolver;
use crate::errors::LayoutResult;
use crate::graph::{Edge, Graph, Node};
use crate::palette;

use super::style::{node_color, topic_visual};
use super::{
    node_data, proposition, require_root, resolve_endpoints, EdgeKind, LayoutConfig, NodeKind,
    Positioned, PositionedEdge, PositionedNode, RouteHint,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossLinkEmphasis {
    /// Tree view: cross-links stand out but the hierarchy stays primary
    Measured,
    /// Concept map: cross-links are the point of the diagram
    Maximal,
}

pub(super) fn layout(
    graph: &Graph,
    config: &LayoutConfig,
    emphasis: CrossLinkEmphasis,
) -> LayoutResult<Positioned> {
    require_root(graph)?;
    let branches = BranchResolver::new(graph);

    let mut columns: BTreeMap<u32, Vec<&Node>> = BTreeMap::new();
    for node in &graph.nodes {
        columns.entry(node.level).or_default().push(node);
    }

    let mut nodes = Vec::with_capacity(graph.nodes.len());
    for (level, members) in &columns {
        let center = (members.len() as f64 - 1.0) / 2.0;
        for (idx, node) in members.iter().enumerate() {
            let branch = branches.branch_index_of(&node.id);
            let color = node_color(node.level, branch);
            nodes.push(PositionedNode {
                id: node.id.clone(),
                x: *level as f64 * config.horizontal_spacing,
                y: (idx as f64 - center) * config.vertical_spacing,
                visual: topic_visual(&node.label, node.level, color),
                data: node_data(node, branch, color, NodeKind::Topic),
            });
        }
    }

    let index = graph.node_index();
    let edges = resolve_endpoints(graph, &index)
        .into_iter()
        .map(|(edge, from, to)| style_edge(edge, from, to, emphasis))
        .collect();

    Ok((nodes, edges))
}

fn style_edge(edge: &Edge, from: &Node, to: &Node, emphasis: CrossLinkEmphasis) -> PositionedEdge {
    let is_cross_link = from.level.abs_diff(to.level) > 1;
    let base = PositionedEdge {
        id: edge.id.clone(),
        from: edge.from.clone(),
        to: edge.to.clone(),
        is_cross_link,
        kind: EdgeKind::Hierarchy,
        route_hint: RouteHint::Smoothstep,
        stroke_width: 2.0,
        stroke_color: palette::EDGE_COLOR.to_string(),
        dash_pattern: None,
        arrow_size: 12.0,
        animated: false,
        label: edge.relationship.clone(),
        label_weight: 400,
        tooltip: proposition(from, edge, to),
    };

    if !is_cross_link {
        return match emphasis {
            CrossLinkEmphasis::Measured => base,
            CrossLinkEmphasis::Maximal => PositionedEdge {
                stroke_width: 1.5,
                stroke_color: palette::MUTED_EDGE_COLOR.to_string(),
                ..base
            },
        };
    }

    let tooltip = format!(
        "{}. Cross-link: synthesizes a level {} idea with a level {} idea from another part of the map.",
        base.tooltip, from.level, to.level
    );

    match emphasis {
        CrossLinkEmphasis::Measured => PositionedEdge {
            kind: EdgeKind::CrossLink,
            route_hint: RouteHint::Bezier,
            stroke_width: 3.0,
            stroke_color: palette::CROSS_LINK_COLOR.to_string(),
            dash_pattern: Some("8 4".to_string()),
            arrow_size: 18.0,
            label_weight: 600,
            tooltip,
            ..base
        },
        CrossLinkEmphasis::Maximal => PositionedEdge {
            kind: EdgeKind::CrossLink,
            route_hint: RouteHint::Bezier,
            stroke_width: 5.0,
            stroke_color: palette::CONCEPT_ACCENT.to_string(),
            dash_pattern: Some("10 5".to_string()),
            arrow_size: 26.0,
            animated: true,
            label_weight: 800,
            tooltip,
            ..base
        },
    }
}
