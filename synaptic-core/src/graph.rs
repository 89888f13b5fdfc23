use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Ids starting with this prefix belong to elements that layouts synthesize
/// (date badges, axis edges). Extracted graphs may not use them.
pub const RESERVED_ID_PREFIX: &str = "@synaptic/";

pub fn is_reserved_id(id: &str) -> bool {
    id.starts_with(RESERVED_ID_PREFIX)
}

/// Kind of concept a node represents.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Concept,
    Principle,
    Process,
    Technique,
    Example,
    Data,
    Definition,
    Outcome,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Concept,
        Category::Principle,
        Category::Process,
        Category::Technique,
        Category::Example,
        Category::Data,
        Category::Definition,
        Category::Outcome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Concept => "concept",
            Category::Principle => "principle",
            Category::Process => "process",
            Category::Technique => "technique",
            Category::Example => "example",
            Category::Data => "data",
            Category::Definition => "definition",
            Category::Outcome => "outcome",
        }
    }

    /// Parse a generator-supplied category, falling back to `Concept` for
    /// anything unrecognised.
    pub fn from_str_lossy(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Visual idiom recommended for a graph's content.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    #[default]
    Hierarchical,
    Concept,
    Flowchart,
    Timeline,
    Matrix,
}

impl TemplateType {
    pub const ALL: [TemplateType; 5] = [
        TemplateType::Hierarchical,
        TemplateType::Concept,
        TemplateType::Flowchart,
        TemplateType::Timeline,
        TemplateType::Matrix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Hierarchical => "hierarchical",
            TemplateType::Concept => "concept",
            TemplateType::Flowchart => "flowchart",
            TemplateType::Timeline => "timeline",
            TemplateType::Matrix => "matrix",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hierarchical" | "hierarchy" | "tree" => Ok(TemplateType::Hierarchical),
            "concept" | "network" | "concept-map" => Ok(TemplateType::Concept),
            "flowchart" | "flow" => Ok(TemplateType::Flowchart),
            "timeline" => Ok(TemplateType::Timeline),
            "matrix" | "comparison" => Ok(TemplateType::Matrix),
            _ => Err(format!("unknown template '{s}'")),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub level: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<u8>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            level,
            description: String::new(),
            category: Category::default(),
            fidelity: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn is_root(&self) -> bool {
        self.level == 0
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub relationship: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            relationship: relationship.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub total_nodes: usize,
    pub max_depth: u32,
    pub categories: Vec<String>,
}

impl GraphMetadata {
    /// Derive metadata from the node list. Counts reported by a generator are
    /// never trusted.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let categories: IndexSet<&'static str> =
            nodes.iter().map(|n| n.category.as_str()).collect();
        Self {
            total_nodes: nodes.len(),
            max_depth: nodes.iter().map(|n| n.level).max().unwrap_or(0),
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub title: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub template: TemplateType,
    #[serde(default)]
    pub metadata: GraphMetadata,
}

impl Graph {
    pub fn new(title: impl Into<String>, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let metadata = GraphMetadata::from_nodes(&nodes);
        Self {
            title: title.into(),
            nodes,
            edges,
            template: TemplateType::default(),
            metadata,
        }
    }

    pub fn with_template(mut self, template: TemplateType) -> Self {
        self.template = template;
        self
    }

    pub fn recompute_metadata(&mut self) {
        self.metadata = GraphMetadata::from_nodes(&self.nodes);
    }

    pub fn get_node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_index(&self) -> HashMap<&str, &Node> {
        self.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
    }

    /// First node at level 0, in node order.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root())
    }

    pub fn root_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.is_root()).collect()
    }

    /// Level-1 nodes in node order. Their positions define branch indices.
    pub fn level_one_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.level == 1).collect()
    }

    pub fn level_of(&self, id: &str) -> Option<u32> {
        self.get_node_by_id(id).map(|n| n.level)
    }

    pub fn get_children(&self, parent_id: &str) -> Vec<&Node> {
        let index = self.node_index();
        self.edges
            .iter()
            .filter(|e| e.from == parent_id)
            .filter_map(|e| index.get(e.to.as_str()).copied())
            .collect()
    }

    /// Edges whose endpoints differ in level by more than one. Edges with an
    /// unknown endpoint are never cross-links.
    pub fn is_cross_link(&self, edge: &Edge) -> bool {
        match (self.level_of(&edge.from), self.level_of(&edge.to)) {
            (Some(from), Some(to)) => from.abs_diff(to) > 1,
            _ => false,
        }
    }

    /// Edges referencing a node id that does not exist.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.from.as_str()) || !ids.contains(e.to.as_str()))
            .collect()
    }

    /// Nodes that cannot be reached from the root by following edges forward.
    /// Without a root nothing is reachable, so every non-root node is reported.
    pub fn orphan_nodes(&self) -> Vec<&Node> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            adjacency
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
        }

        let mut reachable: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = self.root().map(|r| r.id.as_str()).into_iter().collect();
        while let Some(id) = queue.pop_front() {
            if !reachable.insert(id) {
                continue;
            }
            if let Some(next) = adjacency.get(id) {
                queue.extend(next.iter().copied().filter(|n| !reachable.contains(n)));
            }
        }

        self.nodes
            .iter()
            .filter(|n| !n.is_root() && !reachable.contains(n.id.as_str()))
            .collect()
    }

    pub fn verify_graph_integrity(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match self.root_nodes().len() {
            0 => errors.push("Graph has no node at level 0".to_string()),
            1 => {}
            n => errors.push(format!("Graph has {} nodes at level 0, expected 1", n)),
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                errors.push(format!("Duplicate node id {:?}", node.id));
            }
        }

        let reserved = self
            .nodes
            .iter()
            .map(|n| &n.id)
            .chain(self.edges.iter().map(|e| &e.id))
            .filter(|id| is_reserved_id(id));
        for id in reserved {
            errors.push(format!("Id {:?} uses the reserved prefix {}", id, RESERVED_ID_PREFIX));
        }

        for edge in self.dangling_edges() {
            errors.push(format!(
                "Edge id:[{}] references unknown node ({:?} -> {:?})",
                edge.id, edge.from, edge.to
            ));
        }

        for node in self.orphan_nodes() {
            errors.push(format!(
                "Node id:[{}] {:?} is not reachable from the root",
                node.id, node.label
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn stats(&self) -> String {
        format!(
            "Nodes: {}, Edges: {}, Max depth: {}",
            self.nodes.len(),
            self.edges.len(),
            self.metadata.max_depth
        )
    }
}
