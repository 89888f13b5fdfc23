//! Colors shared by the layout algorithms.

use std::fmt;

/// Per-branch colors, cycled when there are more branches than entries.
pub const BRANCH_COLORS: [&str; 10] = [
    "#3b82f6", "#10b981", "#f59e0b", "#8b5cf6", "#ef4444", "#06b6d4", "#ec4899", "#84cc16",
    "#f97316", "#6366f1",
];

pub const ROOT_COLOR: &str = "#1e293b";
pub const TEXT_DARK: &str = "#0f172a";
pub const TEXT_LIGHT: &str = "#ffffff";
pub const EDGE_COLOR: &str = "#94a3b8";
pub const MUTED_EDGE_COLOR: &str = "#cbd5e1";

/// Cross-link strokes: measured in tree views, loudest in concept maps.
pub const CROSS_LINK_COLOR: &str = "#e11d48";
pub const CONCEPT_ACCENT: &str = "#ff0080";

/// Timeline gradient anchors.
pub const BRAND_START: &str = "#6366f1";
pub const BRAND_END: &str = "#ec4899";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation per channel; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Relative luminance in `[0, 1]` (sRGB weights, no gamma).
    pub fn luminance(self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub fn branch_color(branch: usize) -> &'static str {
    BRANCH_COLORS[branch % BRANCH_COLORS.len()]
}

/// Mix `hex` toward white by `amount` (0 keeps the color, 1 is white).
pub fn tint(hex: &str, amount: f64) -> String {
    match Rgb::from_hex(hex) {
        Some(rgb) => rgb.lerp(Rgb::WHITE, amount).to_hex(),
        None => hex.to_string(),
    }
}

/// Readable text color for a given fill.
pub fn text_color_for(fill: &str) -> &'static str {
    match Rgb::from_hex(fill) {
        Some(rgb) if rgb.luminance() > 0.6 => TEXT_DARK,
        _ => TEXT_LIGHT,
    }
}

/// Color at position `index` of `count` along the gradient from `start` to `end`.
pub fn gradient_at(start: &str, end: &str, index: usize, count: usize) -> String {
    let (Some(from), Some(to)) = (Rgb::from_hex(start), Rgb::from_hex(end)) else {
        return start.to_string();
    };
    let t = if count > 1 {
        index as f64 / (count - 1) as f64
    } else {
        0.0
    };
    from.lerp(to, t).to_hex()
}
