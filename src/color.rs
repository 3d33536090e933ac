use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// formatted as CSS hex strings.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → colour
// ---------------------------------------------------------------------------

/// Colour used for labels the map was not built with.
pub const DEFAULT_COLOR: &str = "#808080";

/// Maps category labels (sites, booster categories) to distinct colours.
/// Built once from the full table so a label keeps its colour across filters.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, String>,
}

impl ColorMap {
    /// Build a colour map from labels in display order.
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .iter()
            .zip(palette)
            .map(|(label, color)| (label.as_ref().to_string(), color))
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> String {
        self.mapping
            .get(label)
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct_hex() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        for c in &colors {
            assert!(c.starts_with('#') && c.len() == 7, "{c}");
        }
        let mut dedup = colors.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_label_gets_default() {
        let map = ColorMap::new(&["FT", "B4"]);
        assert_ne!(map.color_for("FT"), map.color_for("B4"));
        assert_eq!(map.color_for("B5"), DEFAULT_COLOR);
    }
}
