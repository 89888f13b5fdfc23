//! Top-to-bottom process layout. Each level is one step; nodes sharing a level
//! are laid out side by side as parallel lanes.

use std::collections::BTreeMap;

use crate::branch::BranchResolver;
use crate::errors::LayoutResult;
use crate::graph::{Category, Graph, Node};
use crate::palette;

use super::style::{estimate_width, node_color};
use super::{
    node_data, proposition, require_root, resolve_endpoints, EdgeKind, LayoutConfig, NodeKind,
    NodeShape, NodeVisual, Positioned, PositionedEdge, PositionedNode, RouteHint,
};

const START_COLOR: &str = "#10b981";
const END_COLOR: &str = "#ef4444";
const PROCESS_COLOR: &str = "#3b82f6";
const DECISION_COLOR: &str = "#f59e0b";
const CONNECTOR_COLOR: &str = "#64748b";

/// Principles and questions branch the flow.
pub fn is_decision(node: &Node) -> bool {
    node.category == Category::Principle || node.label.trim_end().ends_with('?')
}

fn step_kind(node: &Node, first_level: u32, last_level: u32) -> NodeKind {
    if node.level == first_level {
        NodeKind::Start
    } else if node.level == last_level {
        NodeKind::End
    } else if is_decision(node) {
        NodeKind::Decision
    } else {
        NodeKind::Process
    }
}

fn step_visual(node: &Node, kind: NodeKind, step: usize) -> NodeVisual {
    let (fill, shape, rotation, radius, badge) = match kind {
        NodeKind::Start => (START_COLOR, NodeShape::Pill, 0.0, 999.0, "START".to_string()),
        NodeKind::End => (END_COLOR, NodeShape::Pill, 0.0, 999.0, "END".to_string()),
        NodeKind::Decision => (
            DECISION_COLOR,
            NodeShape::Diamond,
            45.0,
            4.0,
            format!("Step {}", step + 1),
        ),
        _ => (
            PROCESS_COLOR,
            NodeShape::Rectangle,
            0.0,
            4.0,
            format!("Step {}", step + 1),
        ),
    };
    let terminal = matches!(kind, NodeKind::Start | NodeKind::End);
    let font_size = if terminal { 16.0 } else { 14.0 };
    let padding = 12.0;

    NodeVisual {
        fill_style: fill.to_string(),
        border_color: fill.to_string(),
        border_width: 2.0,
        text_color: palette::text_color_for(fill).to_string(),
        font_size,
        font_weight: if terminal { 700 } else { 500 },
        padding,
        shape_radius: radius,
        shadow_depth: if terminal { 3 } else { 1 },
        shape,
        rotation,
        width: estimate_width(&node.label, font_size, padding),
        label: node.label.clone(),
        badge: Some(badge),
    }
}

pub(super) fn layout(graph: &Graph, config: &LayoutConfig) -> LayoutResult<Positioned> {
    require_root(graph)?;
    let branches = BranchResolver::new(graph);

    let mut steps: BTreeMap<u32, Vec<&Node>> = BTreeMap::new();
    for node in &graph.nodes {
        steps.entry(node.level).or_default().push(node);
    }
    let first_level = steps.keys().next().copied().unwrap_or(0);
    let last_level = steps.keys().next_back().copied().unwrap_or(0);

    let mut nodes = Vec::with_capacity(graph.nodes.len());
    for (step, members) in steps.values().enumerate() {
        let center = (members.len() as f64 - 1.0) / 2.0;
        for (lane, node) in members.iter().enumerate() {
            let kind = step_kind(node, first_level, last_level);
            let branch = branches.branch_index_of(&node.id);
            nodes.push(PositionedNode {
                id: node.id.clone(),
                x: (lane as f64 - center) * config.flowchart_lane_spacing,
                y: step as f64 * config.flowchart_step_spacing,
                visual: step_visual(node, kind, step),
                data: node_data(node, branch, node_color(node.level, branch), kind),
            });
        }
    }

    let index = graph.node_index();
    let edges = resolve_endpoints(graph, &index)
        .into_iter()
        .map(|(edge, from, to)| PositionedEdge {
            id: edge.id.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            is_cross_link: from.level.abs_diff(to.level) > 1,
            kind: EdgeKind::Sequence,
            route_hint: RouteHint::Smoothstep,
            stroke_width: 2.0,
            stroke_color: CONNECTOR_COLOR.to_string(),
            dash_pattern: None,
            arrow_size: 14.0,
            animated: false,
            label: edge.relationship.clone(),
            label_weight: 500,
            tooltip: proposition(from, edge, to),
        })
        .collect();

    Ok((nodes, edges))
}
