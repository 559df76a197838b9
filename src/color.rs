use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Rgb – renderer-agnostic color
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// `#rrggbb`, the form chart renderers take.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const GRAY: Rgb = Rgb::new(128, 128, 128);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Rgb::new(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed palette used for first-appearance assignment; cycles when a column
/// has more categories than entries.
const CATEGORY_PALETTE: [Rgb; 8] = [
    Rgb::new(31, 119, 180),
    Rgb::new(255, 127, 14),
    Rgb::new(44, 160, 44),
    Rgb::new(214, 39, 40),
    Rgb::new(148, 103, 189),
    Rgb::new(140, 86, 75),
    Rgb::new(227, 119, 194),
    Rgb::new(23, 190, 207),
];

// ---------------------------------------------------------------------------
// Color mapping: category value → Rgb
// ---------------------------------------------------------------------------

/// Maps a categorical column's values to colours, deterministically across
/// runs. Unrecognized categories fall back to the default colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<String, Rgb>,
    default_color: Rgb,
}

impl ColorMap {
    /// A fixed palette keyed by known category names.
    pub fn from_categories<I>(column: &str, pairs: I, default_color: Rgb) -> Self
    where
        I: IntoIterator<Item = (String, Rgb)>,
    {
        ColorMap {
            column: column.to_string(),
            mapping: pairs.into_iter().collect(),
            default_color,
        }
    }

    /// Index-based assignment: each distinct value takes the next palette
    /// entry by position of first appearance, cycling past the end.
    pub fn by_appearance<'a, I>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut mapping = BTreeMap::new();
        let mut next = 0usize;
        for value in values {
            if !mapping.contains_key(value) {
                let color = CATEGORY_PALETTE[next % CATEGORY_PALETTE.len()];
                mapping.insert(value.to_string(), color);
                next += 1;
            }
        }
        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: GRAY,
        }
    }

    /// The fixed daily-attendance mapping: present green, absent red,
    /// loaned amber; anything else gray.
    pub fn attendance() -> Self {
        ColorMap::from_categories(
            crate::data::model::columns::ATTENDANCE,
            [
                ("PRESENT".to_string(), Rgb::new(44, 160, 44)),
                ("ABSENT".to_string(), Rgb::new(214, 39, 40)),
                ("LOANED".to_string(), Rgb::new(255, 127, 14)),
            ],
            GRAY,
        )
    }

    /// Look up the colour for a category value.
    pub fn color_for(&self, value: &str) -> Rgb {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// The fallback colour for unrecognized categories and uncategorized
    /// nodes. Distinct from `color_for("")`: an empty string may be a real
    /// category when the source column has missing values.
    pub fn default_color(&self) -> Rgb {
        self.default_color
    }

    /// Legend entries (value label → colour) for the host UI.
    pub fn legend_entries(&self) -> Vec<(String, Rgb)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.clone(), *c))
            .collect()
    }
}
