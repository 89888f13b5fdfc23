//! Horizontal timeline. Events are ordered by level, then by their position in
//! the node list, and spaced evenly along one axis. Labels containing a date get
//! a badge above the card. No root is required.

use crate::branch::BranchResolver;
use crate::dates;
use crate::graph::{Graph, Node, RESERVED_ID_PREFIX};
use crate::palette;

use super::style::{estimate_width, node_color};
use super::{
    node_data, proposition, resolve_endpoints, EdgeKind, LayoutConfig, NodeKind, NodeShape,
    NodeVisual, Positioned, PositionedEdge, PositionedNode, RouteHint,
};

const CARD_FONT: f64 = 14.0;
const CARD_PADDING: f64 = 14.0;
const BADGE_FONT: f64 = 12.0;
const BADGE_PADDING: f64 = 6.0;

pub fn badge_id(node_id: &str) -> String {
    format!("{RESERVED_ID_PREFIX}date/{node_id}")
}

fn connector_id(node_id: &str) -> String {
    format!("{RESERVED_ID_PREFIX}date-link/{node_id}")
}

fn axis_id(index: usize) -> String {
    format!("{RESERVED_ID_PREFIX}axis/{index}")
}

fn card_visual(label: &str, color: &str, date: Option<&str>) -> NodeVisual {
    NodeVisual {
        fill_style: palette::tint(color, 0.85),
        border_color: color.to_string(),
        border_width: 2.0,
        text_color: palette::TEXT_DARK.to_string(),
        font_size: CARD_FONT,
        font_weight: 600,
        padding: CARD_PADDING,
        shape_radius: 10.0,
        shadow_depth: 2,
        shape: NodeShape::RoundedRect,
        rotation: 0.0,
        width: estimate_width(label, CARD_FONT, CARD_PADDING),
        label: label.to_string(),
        badge: date.map(str::to_string),
    }
}

fn badge_visual(text: &str, color: &str) -> NodeVisual {
    NodeVisual {
        fill_style: color.to_string(),
        border_color: color.to_string(),
        border_width: 0.0,
        text_color: palette::text_color_for(color).to_string(),
        font_size: BADGE_FONT,
        font_weight: 700,
        padding: BADGE_PADDING,
        shape_radius: 999.0,
        shadow_depth: 1,
        shape: NodeShape::Pill,
        rotation: 0.0,
        width: estimate_width(text, BADGE_FONT, BADGE_PADDING),
        label: text.to_string(),
        badge: None,
    }
}

fn plain_edge(id: String, from: &str, to: &str, kind: EdgeKind, color: &str) -> PositionedEdge {
    PositionedEdge {
        id,
        from: from.to_string(),
        to: to.to_string(),
        is_cross_link: false,
        kind,
        route_hint: RouteHint::Straight,
        stroke_width: 3.0,
        stroke_color: color.to_string(),
        dash_pattern: None,
        arrow_size: 0.0,
        animated: false,
        label: String::new(),
        label_weight: 400,
        tooltip: String::new(),
    }
}

pub(super) fn layout(graph: &Graph, config: &LayoutConfig) -> Positioned {
    let branches = BranchResolver::new(graph);

    let mut order: Vec<(usize, &Node)> = graph.nodes.iter().enumerate().collect();
    order.sort_by_key(|(idx, node)| (node.level, *idx));
    let count = order.len();

    let mut nodes = Vec::with_capacity(count * 2);
    let mut edges = Vec::with_capacity(count * 2 + graph.edges.len());
    let mut colors = Vec::with_capacity(count);

    for (position, (_, node)) in order.iter().enumerate() {
        let color = palette::gradient_at(palette::BRAND_START, palette::BRAND_END, position, count);
        let x = position as f64 * config.timeline_spacing;
        let date = dates::extract_date(&node.label);
        let branch = branches.branch_index_of(&node.id);

        let (label, date_text) = match &date {
            Some(found) => (found.remainder.as_str(), Some(found.text.as_str())),
            None => (node.label.as_str(), None),
        };

        let mut data = node_data(node, branch, node_color(node.level, branch), NodeKind::Event);
        data.date = date_text.map(str::to_string);

        nodes.push(PositionedNode {
            id: node.id.clone(),
            x,
            y: 0.0,
            visual: card_visual(label, &color, date_text),
            data,
        });

        if let Some(text) = date_text {
            let id = badge_id(&node.id);
            let mut badge_data = node_data(node, branch, &color, NodeKind::DateBadge);
            badge_data.label = text.to_string();
            badge_data.date = Some(text.to_string());
            nodes.push(PositionedNode {
                id: id.clone(),
                x,
                y: -config.timeline_badge_offset,
                visual: badge_visual(text, &color),
                data: badge_data,
            });

            let mut connector = plain_edge(
                connector_id(&node.id),
                &id,
                &node.id,
                EdgeKind::DateConnector,
                &color,
            );
            connector.stroke_width = 1.5;
            connector.dash_pattern = Some("4 4".to_string());
            connector.tooltip = format!("{} dated {}", label, text);
            edges.push(connector);
        }

        colors.push(color);
    }

    for (i, pair) in order.windows(2).enumerate() {
        let (a, b) = (pair[0].1, pair[1].1);
        let mut axis = plain_edge(axis_id(i), &a.id, &b.id, EdgeKind::Axis, &colors[i]);
        axis.tooltip = format!("{} precedes {}", a.label, b.label);
        edges.push(axis);
    }

    let index = graph.node_index();
    edges.extend(resolve_endpoints(graph, &index).into_iter().map(|(edge, from, to)| {
        PositionedEdge {
            id: edge.id.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            is_cross_link: from.level.abs_diff(to.level) > 1,
            kind: EdgeKind::Relationship,
            route_hint: RouteHint::Bezier,
            stroke_width: 1.5,
            stroke_color: palette::EDGE_COLOR.to_string(),
            dash_pattern: Some("6 3".to_string()),
            arrow_size: 10.0,
            animated: false,
            label: edge.relationship.clone(),
            label_weight: 400,
            tooltip: proposition(from, edge, to),
        }
    }));

    (nodes, edges)
}
