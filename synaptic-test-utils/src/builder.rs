use synaptic::graph::{Category, Edge, Graph, Node, TemplateType};

/// Fluent construction of leveled graphs. Child levels are derived from the
/// parent, and edge ids are numbered in insertion order.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    title: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    template: TemplateType,
}

impl GraphBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            template: TemplateType::default(),
        }
    }

    pub fn root(mut self, id: &str, label: &str) -> Self {
        self.nodes.push(Node::new(id, label, 0));
        self
    }

    /// Add `id` one level below `parent`, linked with "includes".
    pub fn child(self, parent: &str, id: &str, label: &str) -> Self {
        self.child_with(parent, id, label, "includes")
    }

    pub fn child_with(mut self, parent: &str, id: &str, label: &str, relationship: &str) -> Self {
        let level = self.level_of(parent).map_or(1, |l| l + 1);
        self.nodes.push(Node::new(id, label, level));
        self.link(parent, id, relationship)
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn link(mut self, from: &str, to: &str, relationship: &str) -> Self {
        let id = format!("e{}", self.edges.len() + 1);
        self.edges.push(Edge::new(id, from, to, relationship));
        self
    }

    pub fn describe(mut self, id: &str, description: &str) -> Self {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.description = description.to_string();
        }
        self
    }

    pub fn categorize(mut self, id: &str, category: Category) -> Self {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.category = category;
        }
        self
    }

    pub fn template(mut self, template: TemplateType) -> Self {
        self.template = template;
        self
    }

    pub fn build(self) -> Graph {
        Graph::new(self.title, self.nodes, self.edges).with_template(self.template)
    }

    fn level_of(&self, id: &str) -> Option<u32> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.level)
    }
}

/// root -> A, root -> B, A -> A1
pub fn four_node_graph() -> Graph {
    GraphBuilder::new("Scenario")
        .root("root", "Root")
        .child("root", "A", "Alpha")
        .child("root", "B", "Beta")
        .child("A", "A1", "Alpha One")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_follow_parents() {
        let graph = GraphBuilder::new("t")
            .root("r", "R")
            .child("r", "a", "A")
            .child("a", "b", "B")
            .link("r", "b", "summarizes")
            .categorize("b", Category::Example)
            .build();

        assert_eq!(graph.level_of("b"), Some(2));
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.edges[2].id, "e3");
        assert!(graph.is_cross_link(&graph.edges[2]));
        assert_eq!(graph.get_node_by_id("b").unwrap().category, Category::Example);
        assert_eq!(graph.metadata.max_depth, 2);
    }

    #[test]
    fn test_four_node_graph_shape() {
        let graph = four_node_graph();
        assert_eq!(graph.nodes.len(), 4);
        assert!(graph.verify_graph_integrity().is_ok());
    }
}
