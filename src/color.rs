use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::chart::spec::ColorScale;

/// Fill for regions that have geometry but no value.
pub const NO_DATA: Color32 = Color32::from_rgb(0xd9, 0xd9, 0xd9);

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
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Categorical colors: series name → Color32
// ---------------------------------------------------------------------------

/// Maps series names (countries) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign palette colours to `names` in the given order.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        let palette = generate_palette(names.len());
        let mapping = names
            .into_iter()
            .zip(palette)
            .map(|(name, c)| (name.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping
            .get(name)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous colors
// ---------------------------------------------------------------------------

impl ColorScale {
    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorScale::Blues => &[
                (0xf7, 0xfb, 0xff),
                (0xc6, 0xdb, 0xef),
                (0x6b, 0xae, 0xd6),
                (0x21, 0x71, 0xb5),
                (0x08, 0x30, 0x6b),
            ],
            ColorScale::Plasma => &[
                (0x0d, 0x08, 0x87),
                (0x7e, 0x03, 0xa8),
                (0xcc, 0x47, 0x78),
                (0xf8, 0x95, 0x40),
                (0xf0, 0xf9, 0x21),
            ],
        }
    }

    /// Colour at position `t` in `[0, 1]`, interpolated in linear sRGB.
    pub fn sample(self, t: f64) -> Color32 {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t as f32 * (stops.len() - 1) as f32;
        let idx = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - idx as f32;

        let linear = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
            Srgb::new(r, g, b).into_format::<f32>().into_linear()
        };
        let mixed = linear(stops[idx]).mix(linear(stops[idx + 1]), frac);
        to_color32(Srgb::from_linear(mixed))
    }

    /// Colour for `value` within `domain`. A zero-width domain maps to the
    /// top of the scale.
    pub fn color_for(self, value: f64, domain: (f64, f64)) -> Color32 {
        let (lo, hi) = domain;
        let span = hi - lo;
        let t = if span.abs() < f64::EPSILON {
            1.0
        } else {
            (value - lo) / span
        };
        self.sample(t)
    }
}
