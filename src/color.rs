use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Lighten, Srgb};

use crate::data::model::Bucket;

// ---------------------------------------------------------------------------
// Fixed bucket palette
// ---------------------------------------------------------------------------

/// Hex colour of each bucket, as used in every chart and legend.
pub fn bucket_hex(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Inc => "#1F77B4",
        Bucket::Bjp => "#FF7F0E",
        Bucket::Jds => "#2CA02C",
        Bucket::Others => "#7F7F7F",
    }
}

fn parse_hex(hex: &str) -> Srgb<u8> {
    hex.parse::<Srgb<u8>>().unwrap_or(Srgb::new(127, 127, 127))
}

fn to_color32(rgb: Srgb<u8>) -> Color32 {
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Colour for a bucket.
pub fn bucket_color(bucket: Bucket) -> Color32 {
    to_color32(parse_hex(bucket_hex(bucket)))
}

/// Paler shade of the bucket colour, used for the statewide bars next to the
/// filtered ones.
pub fn bucket_color_muted(bucket: Bucket) -> Color32 {
    let rgb: Srgb = parse_hex(bucket_hex(bucket)).into_format();
    let hsl: Hsl = rgb.into_color();
    let lighter: Srgb = hsl.lighten(0.35).into_color();
    to_color32(lighter.into_format())
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.45);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb.into_format())
        })
        .collect()
}

/// Distinct colour per region, stable for a given region set.
#[derive(Debug, Clone, Default)]
pub struct RegionColors {
    mapping: BTreeMap<String, Color32>,
}

impl RegionColors {
    pub fn new<'a>(regions: impl IntoIterator<Item = &'a String>) -> Self {
        let regions: Vec<&String> = regions.into_iter().collect();
        let mapping = regions
            .iter()
            .zip(generate_palette(regions.len()))
            .map(|(r, c)| ((*r).clone(), c))
            .collect();
        RegionColors { mapping }
    }

    pub fn color_for(&self, region: &str) -> Color32 {
        self.mapping.get(region).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_colors_match_hex() {
        assert_eq!(bucket_color(Bucket::Inc), Color32::from_rgb(0x1F, 0x77, 0xB4));
        assert_eq!(bucket_color(Bucket::Others), Color32::from_rgb(0x7F, 0x7F, 0x7F));
    }

    #[test]
    fn muted_shade_is_lighter() {
        for bucket in Bucket::DISPLAY_ORDER {
            let base = bucket_color(bucket);
            let muted = bucket_color_muted(bucket);
            let luma = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
            assert!(luma(muted) > luma(base), "{bucket}");
        }
    }

    #[test]
    fn region_colors_are_distinct() {
        let regions: Vec<String> = ["Central", "Coastal", "Kalyana"].iter().map(|s| s.to_string()).collect();
        let colors = RegionColors::new(&regions);
        assert_ne!(colors.color_for("Central"), colors.color_for("Coastal"));
        assert_eq!(colors.color_for("Nowhere"), Color32::GRAY);
        assert!(generate_palette(0).is_empty());
    }
}
