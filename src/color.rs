use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            // Start at the dashboard blue (#1f77b4 sits near 205°).
            let hue = 205.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: post type → Color32
// ---------------------------------------------------------------------------

/// Maps post types to distinct colours for the scatter legend.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(post_types: &[String]) -> Self {
        let palette = generate_palette(post_types.len());
        ColorMap {
            mapping: post_types.iter().cloned().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    /// Colour for a post type; untyped posts and unknown types get grey.
    pub fn color_for(&self, post_type: Option<&str>) -> Color32 {
        post_type
            .and_then(|t| self.mapping.get(t))
            .copied()
            .unwrap_or(self.default_color)
    }
}
