//! Branch membership: which level-1 subtree each node belongs to.
//!
//! Level-1 nodes are numbered in node order. Any deeper node inherits the index
//! of the first level-1 node found by walking incoming edges upward. A walk
//! longer than the node count must revisit a node, so it stops there and cyclic
//! edge data always terminates.

use std::collections::HashMap;

use crate::graph::{Graph, Node};

pub struct BranchResolver<'a> {
    level_one: HashMap<&'a str, usize>,
    parent: HashMap<&'a str, &'a str>,
    levels: HashMap<&'a str, u32>,
    max_steps: usize,
}

impl<'a> BranchResolver<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        let levels: HashMap<&str, u32> = graph
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.level))
            .collect();

        let level_one = graph
            .level_one_nodes()
            .into_iter()
            .enumerate()
            .map(|(idx, n)| (n.id.as_str(), idx))
            .collect();

        // First incoming edge wins; edges from unknown nodes lead nowhere.
        let mut parent = HashMap::new();
        for edge in &graph.edges {
            if levels.contains_key(edge.from.as_str()) {
                parent.entry(edge.to.as_str()).or_insert(edge.from.as_str());
            }
        }

        // Levels come from model output and are not a safe bound.
        let max_steps = graph.nodes.len();

        Self {
            level_one,
            parent,
            levels,
            max_steps,
        }
    }

    pub fn branch_count(&self) -> usize {
        self.level_one.len()
    }

    /// Id of the level-1 ancestor of `node_id` (itself when it is level 1).
    pub fn level_one_ancestor(&self, node_id: &str) -> Option<&'a str> {
        let mut current = *self.levels.get_key_value(node_id)?.0;
        for _ in 0..=self.max_steps {
            if self.level_one.contains_key(current) {
                return Some(current);
            }
            if self.levels.get(current) == Some(&0) {
                return None;
            }
            current = *self.parent.get(current)?;
        }
        None
    }

    /// Branch index for `node_id`; 0 when no level-1 ancestor exists.
    pub fn branch_index_of(&self, node_id: &str) -> usize {
        self.level_one_ancestor(node_id)
            .and_then(|id| self.level_one.get(id).copied())
            .unwrap_or(0)
    }
}

/// One-shot convenience; build a [`BranchResolver`] when resolving many nodes.
pub fn branch_index_of(node: &Node, graph: &Graph) -> usize {
    BranchResolver::new(graph).branch_index_of(&node.id)
}
