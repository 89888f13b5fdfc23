//! Level-indexed visual styling shared by the tree-shaped layouts.
//!
//! Emphasis decreases monotonically with depth: level 0 gets the largest font,
//! padding, corner radius, border and shadow; everything from level 4 down
//! shares the smallest bucket.

use crate::palette;

use super::{NodeShape, NodeVisual};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelStyle {
    pub font_size: f64,
    pub font_weight: u16,
    pub padding: f64,
    pub shape_radius: f64,
    pub border_width: f64,
    pub shadow_depth: u8,
    /// How far the branch color is mixed toward white for the fill
    pub tint: f64,
}

const LEVEL_STYLES: [LevelStyle; 5] = [
    LevelStyle {
        font_size: 22.0,
        font_weight: 700,
        padding: 20.0,
        shape_radius: 16.0,
        border_width: 3.0,
        shadow_depth: 4,
        tint: 0.0,
    },
    LevelStyle {
        font_size: 18.0,
        font_weight: 600,
        padding: 16.0,
        shape_radius: 12.0,
        border_width: 2.5,
        shadow_depth: 3,
        tint: 0.0,
    },
    LevelStyle {
        font_size: 15.0,
        font_weight: 500,
        padding: 12.0,
        shape_radius: 10.0,
        border_width: 2.0,
        shadow_depth: 2,
        tint: 0.45,
    },
    LevelStyle {
        font_size: 13.0,
        font_weight: 400,
        padding: 10.0,
        shape_radius: 8.0,
        border_width: 1.5,
        shadow_depth: 1,
        tint: 0.65,
    },
    LevelStyle {
        font_size: 12.0,
        font_weight: 400,
        padding: 8.0,
        shape_radius: 6.0,
        border_width: 1.0,
        shadow_depth: 0,
        tint: 0.8,
    },
];

pub fn level_style(level: u32) -> LevelStyle {
    LEVEL_STYLES[(level as usize).min(LEVEL_STYLES.len() - 1)]
}

const MIN_NODE_WIDTH: f64 = 80.0;
const MAX_NODE_WIDTH: f64 = 280.0;
const CHAR_WIDTH_RATIO: f64 = 0.6;

/// Rough rendered width of a label; long labels wrap at the max width.
pub fn estimate_width(label: &str, font_size: f64, padding: f64) -> f64 {
    let chars = label.chars().count() as f64;
    (chars * font_size * CHAR_WIDTH_RATIO + 2.0 * padding).clamp(MIN_NODE_WIDTH, MAX_NODE_WIDTH)
}

/// Color identifying a node's branch; the root has its own.
pub fn node_color(level: u32, branch: usize) -> &'static str {
    if level == 0 {
        palette::ROOT_COLOR
    } else {
        palette::branch_color(branch)
    }
}

/// Visual for a topic node at `level` drawn in `branch_color`.
pub fn topic_visual(label: &str, level: u32, branch_color: &str) -> NodeVisual {
    let style = level_style(level);
    let (fill, border) = if level == 0 {
        (palette::ROOT_COLOR.to_string(), palette::ROOT_COLOR.to_string())
    } else {
        (palette::tint(branch_color, style.tint), branch_color.to_string())
    };

    NodeVisual {
        text_color: palette::text_color_for(&fill).to_string(),
        fill_style: fill,
        border_color: border,
        border_width: style.border_width,
        font_size: style.font_size,
        font_weight: style.font_weight,
        padding: style.padding,
        shape_radius: style.shape_radius,
        shadow_depth: style.shadow_depth,
        shape: NodeShape::RoundedRect,
        rotation: 0.0,
        width: estimate_width(label, style.font_size, style.padding),
        label: label.to_string(),
        badge: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_decreases_with_depth() {
        for level in 0..5 {
            let (a, b) = (level_style(level), level_style(level + 1));
            assert!(a.font_size >= b.font_size);
            assert!(a.padding >= b.padding);
            assert!(a.shape_radius >= b.shape_radius);
            assert!(a.border_width >= b.border_width);
            assert!(a.shadow_depth >= b.shadow_depth);
        }
        assert_eq!(level_style(9), level_style(4));
    }

    #[test]
    fn test_width_is_clamped() {
        assert_eq!(estimate_width("", 12.0, 8.0), MIN_NODE_WIDTH);
        assert_eq!(estimate_width(&"x".repeat(200), 22.0, 20.0), MAX_NODE_WIDTH);
        let mid = estimate_width("Photosynthesis", 15.0, 12.0);
        assert!((mid - (14.0 * 15.0 * 0.6 + 24.0)).abs() < 1e-9);
    }

    #[test]
    fn test_root_visual_uses_root_color() {
        let root = topic_visual("Root", 0, "#3b82f6");
        assert_eq!(root.fill_style, palette::ROOT_COLOR);
        assert_eq!(root.text_color, palette::TEXT_LIGHT);

        let deep = topic_visual("Leaf", 3, "#3b82f6");
        assert_eq!(deep.border_color, "#3b82f6");
        assert_ne!(deep.fill_style, "#3b82f6");
    }
}
