use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::query::Expense;

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
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Single-hue ramp from light to saturated, for continuous scales.
pub fn sequential(hue: f32, t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let hsl = Hsl::new(hue, 0.35 + 0.55 * t, 0.85 - 0.45 * t);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Category colours
// ---------------------------------------------------------------------------

/// Maps the categories of one column (countries, continents) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the column's unique values.
    pub fn new(categories: &BTreeSet<String>) -> Self {
        let palette = generate_palette(categories.len());
        let mapping = categories.iter().cloned().zip(palette).collect();
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given category.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// Fixed colours so every expense chart agrees.
pub fn expense_color(expense: Expense) -> Color32 {
    match expense {
        Expense::Meal => Color32::from_rgb(0x1f, 0x77, 0xb4),
        Expense::Coffee => Color32::from_rgb(0xff, 0x7f, 0x0e),
        Expense::Beer => Color32::from_rgb(0x2c, 0xa0, 0x2c),
        Expense::Taxi => Color32::from_rgb(0xd6, 0x27, 0x28),
        Expense::DailyRent => Color32::from_rgb(0x94, 0x67, 0xbd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colors() {
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        let unique: BTreeSet<_> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 6);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_category_gets_default_color() {
        let cats: BTreeSet<String> = ["Spain", "Thailand"].iter().map(|s| s.to_string()).collect();
        let map = ColorMap::new(&cats);
        assert_ne!(map.color_for("Spain"), map.color_for("Thailand"));
        assert_eq!(map.color_for("Atlantis"), Color32::GRAY);
    }

    #[test]
    fn sequential_darkens_with_value() {
        let light = sequential(30.0, 0.0);
        let dark = sequential(30.0, 1.0);
        let lum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(lum(light) > lum(dark));
    }
}
