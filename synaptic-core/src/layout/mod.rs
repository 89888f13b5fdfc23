//! Layout engine: turns a leveled concept graph into positioned, styled nodes
//! and edges for one of five visual idioms.
//!
//! Layout is a pure function of the graph, the map type and the
//! [`LayoutConfig`]. The input graph is never modified and a fresh
//! [`PositionedGraph`] is built on every call.

mod flowchart;
mod hierarchical;
mod radial;
pub mod style;
mod timeline;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{LayoutError, LayoutResult};
use crate::fidelity::{self, FidelityBadge};
use crate::graph::{Category, Edge, Graph, Node, TemplateType};

pub use hierarchical::CrossLinkEmphasis;
pub use timeline::badge_id;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    Hierarchical,
    Radial,
    Concept,
    Flowchart,
    Timeline,
}

impl MapType {
    pub const ALL: [MapType; 5] = [
        MapType::Hierarchical,
        MapType::Radial,
        MapType::Concept,
        MapType::Flowchart,
        MapType::Timeline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapType::Hierarchical => "hierarchical",
            MapType::Radial => "radial",
            MapType::Concept => "concept",
            MapType::Flowchart => "flowchart",
            MapType::Timeline => "timeline",
        }
    }
}

impl From<TemplateType> for MapType {
    /// Matrix content has no dedicated geometry and is drawn as a tree.
    fn from(template: TemplateType) -> Self {
        match template {
            TemplateType::Hierarchical | TemplateType::Matrix => MapType::Hierarchical,
            TemplateType::Concept => MapType::Concept,
            TemplateType::Flowchart => MapType::Flowchart,
            TemplateType::Timeline => MapType::Timeline,
        }
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hierarchical" | "tree" => Ok(MapType::Hierarchical),
            "radial" | "sunburst" => Ok(MapType::Radial),
            "concept" | "network" => Ok(MapType::Concept),
            "flowchart" | "flow" => Ok(MapType::Flowchart),
            "timeline" => Ok(MapType::Timeline),
            _ => Err(format!("unknown map type '{s}'")),
        }
    }
}

/// Tunable geometry. None of these values are load-bearing beyond keeping
/// nodes apart.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub radial_base_radius: f64,
    pub radial_exponent: f64,
    /// Degrees
    pub radial_min_spread: f64,
    /// Degrees
    pub radial_max_spread: f64,
    /// Gap added to each estimated node width when sizing a radial spread
    pub radial_node_gap: f64,
    pub flowchart_step_spacing: f64,
    pub flowchart_lane_spacing: f64,
    pub timeline_spacing: f64,
    pub timeline_badge_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 320.0,
            vertical_spacing: 110.0,
            radial_base_radius: 400.0,
            radial_exponent: 1.5,
            radial_min_spread: 10.0,
            radial_max_spread: 90.0,
            radial_node_gap: 24.0,
            flowchart_step_spacing: 160.0,
            flowchart_lane_spacing: 260.0,
            timeline_spacing: 300.0,
            timeline_badge_offset: 110.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NodeShape {
    RoundedRect,
    Rectangle,
    Pill,
    Diamond,
    Circle,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Topic,
    Start,
    End,
    Process,
    Decision,
    Event,
    DateBadge,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeVisual {
    pub fill_style: String,
    pub border_color: String,
    pub border_width: f64,
    pub text_color: String,
    pub font_size: f64,
    pub font_weight: u16,
    pub padding: f64,
    pub shape_radius: f64,
    pub shadow_depth: u8,
    pub shape: NodeShape,
    /// Degrees
    pub rotation: f64,
    pub width: f64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub label: String,
    pub description: String,
    pub category: Category,
    pub level: u32,
    pub branch: usize,
    pub branch_color: String,
    pub fidelity: u8,
    pub fidelity_badge: FidelityBadge,
    pub fidelity_color: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub visual: NodeVisual,
    pub data: NodeData,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RouteHint {
    Straight,
    Smoothstep,
    Bezier,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    Hierarchy,
    CrossLink,
    Sequence,
    Axis,
    DateConnector,
    Relationship,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionedEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub is_cross_link: bool,
    pub kind: EdgeKind,
    pub route_hint: RouteHint,
    pub stroke_width: f64,
    pub stroke_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_pattern: Option<String>,
    pub arrow_size: f64,
    pub animated: bool,
    pub label: String,
    pub label_weight: u16,
    pub tooltip: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionedGraph {
    pub map_type: MapType,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
}

impl PositionedGraph {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&PositionedEdge> {
        self.edges.iter().find(|e| e.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `graph` using `map_type`, or the graph's own template when none
    /// is given.
    pub fn layout(&self, graph: &Graph, map_type: Option<MapType>) -> LayoutResult<PositionedGraph> {
        let map_type = map_type.unwrap_or_else(|| MapType::from(graph.template));
        let positioned = match map_type {
            MapType::Hierarchical => {
                hierarchical::layout(graph, &self.config, CrossLinkEmphasis::Measured)?
            }
            MapType::Concept => {
                hierarchical::layout(graph, &self.config, CrossLinkEmphasis::Maximal)?
            }
            MapType::Radial => radial::layout(graph, &self.config)?,
            MapType::Flowchart => flowchart::layout(graph, &self.config)?,
            MapType::Timeline => timeline::layout(graph, &self.config),
        };

        debug!(
            "Laid out {} nodes and {} edges as {}",
            positioned.0.len(),
            positioned.1.len(),
            map_type
        );

        Ok(PositionedGraph {
            map_type,
            nodes: positioned.0,
            edges: positioned.1,
        })
    }
}

/// Lay out with the default configuration.
pub fn layout_graph(graph: &Graph, map_type: Option<MapType>) -> LayoutResult<PositionedGraph> {
    LayoutEngine::default().layout(graph, map_type)
}

pub(crate) type Positioned = (Vec<PositionedNode>, Vec<PositionedEdge>);

/// The unique level-0 node. When a generator emitted several, the first wins.
pub(crate) fn require_root(graph: &Graph) -> LayoutResult<&Node> {
    let roots = graph.root_nodes();
    match roots.as_slice() {
        [] => Err(LayoutError::NoRootNode),
        [root] => Ok(*root),
        [root, rest @ ..] => {
            warn!(
                root = %root.id,
                "Graph has {} extra level-0 nodes; using the first as root",
                rest.len()
            );
            Ok(*root)
        }
    }
}

/// "A {relationship} B"
pub(crate) fn proposition(from: &Node, edge: &Edge, to: &Node) -> String {
    format!("{} {} {}", from.label, edge.relationship, to.label)
}

/// Resolve both endpoints, dropping edges that reference unknown nodes.
pub(crate) fn resolve_endpoints<'a>(
    graph: &'a Graph,
    index: &std::collections::HashMap<&str, &'a Node>,
) -> Vec<(&'a Edge, &'a Node, &'a Node)> {
    graph
        .edges
        .iter()
        .filter_map(|edge| {
            match (index.get(edge.from.as_str()), index.get(edge.to.as_str())) {
                (Some(from), Some(to)) => Some((edge, *from, *to)),
                _ => {
                    debug!(edge = %edge.id, "Skipping dangling edge in layout");
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn node_data(node: &Node, branch: usize, branch_color: &str, kind: NodeKind) -> NodeData {
    let score = fidelity::score(node);
    let badge = fidelity::badge(score);
    NodeData {
        label: node.label.clone(),
        description: node.description.clone(),
        category: node.category,
        level: node.level,
        branch,
        branch_color: branch_color.to_string(),
        fidelity: score,
        fidelity_badge: badge,
        fidelity_color: badge.color().to_string(),
        kind,
        date: None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::graph::{Edge, Graph, Node};

    /// root -> A, root -> B, A -> A1
    pub fn four_node_graph() -> Graph {
        Graph::new(
            "Scenario",
            vec![
                Node::new("root", "Root", 0),
                Node::new("A", "Alpha", 1),
                Node::new("B", "Beta", 1),
                Node::new("A1", "Alpha One", 2),
            ],
            vec![
                Edge::new("e1", "root", "A", "includes"),
                Edge::new("e2", "root", "B", "includes"),
                Edge::new("e3", "A", "A1", "explains"),
            ],
        )
    }

    /// Three branches, four levels, two cross-links and one dangling edge.
    pub fn rich_graph() -> Graph {
        Graph::new(
            "Rich",
            vec![
                Node::new("root", "Ecology", 0),
                Node::new("p", "Producers", 1),
                Node::new("c", "Consumers", 1),
                Node::new("d", "Decomposers", 1),
                Node::new("p1", "Plants", 2),
                Node::new("p2", "Algae", 2),
                Node::new("c1", "Herbivores", 2),
                Node::new("p1a", "Photosynthesis", 3),
                Node::new("p1a1", "Chlorophyll", 4),
            ],
            vec![
                Edge::new("e1", "root", "p", "includes"),
                Edge::new("e2", "root", "c", "includes"),
                Edge::new("e3", "root", "d", "includes"),
                Edge::new("e4", "p", "p1", "includes"),
                Edge::new("e5", "p", "p2", "includes"),
                Edge::new("e6", "c", "c1", "includes"),
                Edge::new("e7", "p1", "p1a", "performs"),
                Edge::new("e8", "p1a", "p1a1", "requires"),
                Edge::new("x1", "c", "p1a", "depends on"),
                Edge::new("x2", "root", "p1a1", "highlights"),
                Edge::new("ghost", "d", "missing", "recycles"),
            ],
        )
    }
}
