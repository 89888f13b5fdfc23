//! Radial (sunburst) layout.
//!
//! The root sits at the origin. Level-1 nodes are spread evenly around the
//! circle starting at 12 o'clock, and deeper nodes fan out around their
//! branch's angle on rings whose radius grows superlinearly with level.

use std::f64::consts::{FRAC_PI_2, TAU};

use indexmap::IndexMap;
use tracing::debug;

use crate::branch::BranchResolver;
use crate::errors::LayoutResult;
use crate::graph::{Edge, Graph, Node};
use crate::palette;

use super::style::{estimate_width, level_style, node_color, topic_visual};
use super::{
    node_data, proposition, require_root, resolve_endpoints, EdgeKind, LayoutConfig, NodeKind,
    NodeShape, Positioned, PositionedEdge, PositionedNode, RouteHint,
};

/// Radius of the ring for `level`.
pub fn ring_radius(level: u32, config: &LayoutConfig) -> f64 {
    config.radial_base_radius * (level as f64).powf(config.radial_exponent)
}

/// Angle of level-1 node `index` out of `count`, in radians.
pub fn branch_angle(index: usize, count: usize) -> f64 {
    -FRAC_PI_2 + index as f64 * TAU / count.max(1) as f64
}

/// Angular spread for a group of siblings on one ring.
fn group_spread(members: &[&Node], radius: f64, config: &LayoutConfig) -> f64 {
    let needed: f64 = members
        .iter()
        .map(|n| {
            let style = level_style(n.level);
            estimate_width(&n.label, style.font_size, style.padding) + config.radial_node_gap
        })
        .sum();
    let spread = if radius > 0.0 { needed / radius } else { 0.0 };
    spread.clamp(
        config.radial_min_spread.to_radians(),
        config.radial_max_spread.to_radians(),
    )
}

pub(super) fn layout(graph: &Graph, config: &LayoutConfig) -> LayoutResult<Positioned> {
    let root = require_root(graph)?;
    let branches = BranchResolver::new(graph);
    let level_one = graph.level_one_nodes();

    let mut placed: Vec<(&Node, usize, f64, f64)> = Vec::with_capacity(graph.nodes.len());

    if level_one.is_empty() {
        // No branches to anchor on: everything else goes on one ring.
        let others: Vec<&Node> = graph.nodes.iter().filter(|n| n.id != root.id).collect();
        debug!("No level-1 nodes; placing {} nodes on a single ring", others.len());
        placed.push((root, 0, 0.0, 0.0));
        for (idx, node) in others.iter().enumerate() {
            let angle = branch_angle(idx, others.len());
            let r = config.radial_base_radius;
            placed.push((node, 0, r * angle.cos(), r * angle.sin()));
        }
    } else {
        let branch_count = level_one.len();
        let mut groups: IndexMap<(usize, u32), Vec<&Node>> = IndexMap::new();
        for node in &graph.nodes {
            if node.level == 0 {
                placed.push((node, 0, 0.0, 0.0));
                continue;
            }
            let branch = branches.branch_index_of(&node.id);
            groups.entry((branch, node.level)).or_default().push(node);
        }

        for ((branch, level), members) in &groups {
            let radius = ring_radius(*level, config);
            let center = branch_angle(*branch, branch_count);
            if *level == 1 {
                // Level-1 nodes own their branch angle.
                for node in members {
                    placed.push((node, *branch, radius * center.cos(), radius * center.sin()));
                }
                continue;
            }

            let count = members.len();
            let spread = group_spread(members, radius, config);
            for (idx, node) in members.iter().enumerate() {
                let angle = if count == 1 {
                    center
                } else {
                    center - spread / 2.0 + idx as f64 * spread / (count - 1) as f64
                };
                placed.push((node, *branch, radius * angle.cos(), radius * angle.sin()));
            }
        }
    }

    let nodes = placed
        .into_iter()
        .map(|(node, branch, x, y)| {
            let color = node_color(node.level, branch);
            let mut visual = topic_visual(&node.label, node.level, color);
            if node.level == 0 {
                visual.shape = NodeShape::Circle;
            }
            PositionedNode {
                id: node.id.clone(),
                x,
                y,
                visual,
                data: node_data(node, branch, color, NodeKind::Topic),
            }
        })
        .collect();

    let index = graph.node_index();
    let edges = resolve_endpoints(graph, &index)
        .into_iter()
        .map(|(edge, from, to)| style_edge(edge, from, to, &branches))
        .collect();

    Ok((nodes, edges))
}

fn style_edge(edge: &Edge, from: &Node, to: &Node, branches: &BranchResolver<'_>) -> PositionedEdge {
    let is_cross_link = from.level.abs_diff(to.level) > 1;
    let tooltip = proposition(from, edge, to);
    if is_cross_link {
        PositionedEdge {
            id: edge.id.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            is_cross_link,
            kind: EdgeKind::CrossLink,
            route_hint: RouteHint::Bezier,
            stroke_width: 2.5,
            stroke_color: palette::CROSS_LINK_COLOR.to_string(),
            dash_pattern: Some("6 4".to_string()),
            arrow_size: 16.0,
            animated: false,
            label: edge.relationship.clone(),
            label_weight: 600,
            tooltip: format!("{}. Cross-link between rings {} and {}.", tooltip, from.level, to.level),
        }
    } else {
        PositionedEdge {
            id: edge.id.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            is_cross_link,
            kind: EdgeKind::Hierarchy,
            route_hint: RouteHint::Straight,
            stroke_width: 2.0,
            stroke_color: palette::tint(
                node_color(to.level, branches.branch_index_of(&to.id)),
                0.3,
            ),
            dash_pattern: None,
            arrow_size: 10.0,
            animated: false,
            label: edge.relationship.clone(),
            label_weight: 400,
            tooltip,
        }
    }
}
