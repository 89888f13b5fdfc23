//! Heuristic confidence that a node is grounded in the source document.
//!
//! The score is built from four signals: description richness (0-40), level
//! proximity to the root (10-30), category presence (15) and label length
//! (0-15). A node that already carries a `fidelity` value keeps it.

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, Node};

const LEVEL_POINTS_ROOT: u32 = 30;
const LEVEL_POINTS_STEP: u32 = 5;
const LEVEL_POINTS_FLOOR: u32 = 10;
const CATEGORY_POINTS: u32 = 15;

fn description_points(description: &str) -> u32 {
    match description.trim().chars().count() {
        0 => 0,
        1..=19 => 10,
        20..=49 => 20,
        50..=99 => 30,
        _ => 40,
    }
}

fn level_points(level: u32) -> u32 {
    LEVEL_POINTS_ROOT
        .saturating_sub(level.saturating_mul(LEVEL_POINTS_STEP))
        .max(LEVEL_POINTS_FLOOR)
}

fn label_points(label: &str) -> u32 {
    match label.trim().chars().count() {
        0 => 0,
        1..=3 => 5,
        4..=40 => 15,
        _ => 10,
    }
}

/// Score a node in `[0, 100]`. Precomputed scores are returned unchanged.
pub fn score(node: &Node) -> u8 {
    if let Some(fidelity) = node.fidelity {
        return fidelity.min(100);
    }

    let total = description_points(&node.description)
        + level_points(node.level)
        + CATEGORY_POINTS
        + label_points(&node.label);

    total.min(100) as u8
}

/// Fill in `fidelity` on every node of `graph` that lacks one.
pub fn annotate(graph: &mut Graph) {
    for node in &mut graph.nodes {
        if node.fidelity.is_none() {
            node.fidelity = Some(score(node));
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FidelityBadge {
    Strong,
    Moderate,
    Weak,
    Minimal,
}

impl FidelityBadge {
    pub fn label(&self) -> &'static str {
        match self {
            FidelityBadge::Strong => "Strong",
            FidelityBadge::Moderate => "Moderate",
            FidelityBadge::Weak => "Weak",
            FidelityBadge::Minimal => "Minimal",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            FidelityBadge::Strong => "#10b981",
            FidelityBadge::Moderate => "#3b82f6",
            FidelityBadge::Weak => "#f59e0b",
            FidelityBadge::Minimal => "#ef4444",
        }
    }
}

pub fn badge(score: u8) -> FidelityBadge {
    match score {
        85..=u8::MAX => FidelityBadge::Strong,
        70..=84 => FidelityBadge::Moderate,
        50..=69 => FidelityBadge::Weak,
        _ => FidelityBadge::Minimal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Category;

    #[test]
    fn test_rich_root_scores_full_marks() {
        let node = Node::new("root", "Cellular Respiration", 0)
            .with_description("x".repeat(120));
        assert_eq!(score(&node), 100);
        assert_eq!(badge(score(&node)), FidelityBadge::Strong);
    }

    #[test]
    fn test_level_points_floor() {
        assert_eq!(level_points(0), 30);
        assert_eq!(level_points(1), 25);
        assert_eq!(level_points(4), 10);
        assert_eq!(level_points(9), 10);
        assert_eq!(level_points(u32::MAX), 10);
    }

    #[test]
    fn test_sparse_deep_node() {
        let node = Node::new("n", "ATP", 5).with_category(Category::Data);
        // no description, floor level points, category, short label
        assert_eq!(score(&node), 10 + 15 + 5);
        assert_eq!(badge(score(&node)), FidelityBadge::Minimal);
    }

    #[test]
    fn test_description_buckets() {
        assert_eq!(description_points(""), 0);
        assert_eq!(description_points("   "), 0);
        assert_eq!(description_points("short"), 10);
        assert_eq!(description_points(&"a".repeat(20)), 20);
        assert_eq!(description_points(&"a".repeat(99)), 30);
        assert_eq!(description_points(&"a".repeat(100)), 40);
    }

    #[test]
    fn test_precomputed_fidelity_is_kept() {
        let mut node = Node::new("n", "Label", 3);
        node.fidelity = Some(42);
        assert_eq!(score(&node), 42);
        assert_eq!(score(&node), 42);
    }

    #[test]
    fn test_score_always_in_range() {
        for level in 0..12 {
            for len in [0usize, 3, 25, 80, 400] {
                let node = Node::new("n", "l".repeat(len), level).with_description("d".repeat(len));
                assert!(score(&node) <= 100);
            }
        }
    }

    #[test]
    fn test_annotate_memoizes() {
        let mut graph = Graph::new(
            "g",
            vec![Node::new("r", "Root", 0), {
                let mut n = Node::new("a", "A", 1);
                n.fidelity = Some(7);
                n
            }],
            vec![],
        );
        annotate(&mut graph);
        assert_eq!(graph.nodes[0].fidelity, Some(score(&Node::new("r", "Root", 0))));
        assert_eq!(graph.nodes[1].fidelity, Some(7));
    }

    #[test]
    fn test_badge_bands() {
        assert_eq!(badge(100), FidelityBadge::Strong);
        assert_eq!(badge(85), FidelityBadge::Strong);
        assert_eq!(badge(84), FidelityBadge::Moderate);
        assert_eq!(badge(70), FidelityBadge::Moderate);
        assert_eq!(badge(69), FidelityBadge::Weak);
        assert_eq!(badge(50), FidelityBadge::Weak);
        assert_eq!(badge(49), FidelityBadge::Minimal);
        assert_eq!(FidelityBadge::Weak.label(), "Weak");
        assert_ne!(FidelityBadge::Strong.color(), FidelityBadge::Minimal.color());
    }
}
