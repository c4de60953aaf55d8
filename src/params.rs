//! Live-tunable viewer parameters.
//!
//! [`Params`] is owned by the viewer. The particle system reads it on rebuild
//! and every frame; only the viewer (via the control panel or keyboard)
//! writes it. [`ParamChange`] tells the viewer which lifecycle call an edit
//! needs: count and seed are baked into the buffers and require a rebuild,
//! the palette only needs a recolor, and everything else is picked up live.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::palette::Palette;

/// Point count range offered by the panel.
pub const COUNT_RANGE: RangeInclusive<u32> = 500..=80_000;
/// Step for the point count slider.
pub const COUNT_STEP: u32 = 500;
/// Point size range.
pub const SIZE_RANGE: RangeInclusive<f32> = 0.1..=5.0;
/// Animation speed range.
pub const SPEED_RANGE: RangeInclusive<f32> = 0.0..=3.0;
/// Turbulence magnitude range.
pub const TURBULENCE_RANGE: RangeInclusive<f32> = 0.0..=6.0;
/// Bloom strength range.
pub const BLOOM_STRENGTH_RANGE: RangeInclusive<f32> = 0.0..=3.0;
/// Camera distance range offered by the panel.
pub const CAMERA_DISTANCE_RANGE: RangeInclusive<f32> = 3.0..=60.0;
/// Vertical field of view range, in degrees.
pub const FOV_RANGE: RangeInclusive<f32> = 20.0..=120.0;
/// Upper bound (exclusive) for randomized seeds.
pub const SEED_LIMIT: u32 = 100_000;

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Number of points in the cloud.
    pub count: u32,
    /// Point sprite size factor.
    pub size: f32,
    /// How fast the noise field scrolls.
    pub speed: f32,
    /// Displacement magnitude.
    pub turbulence: f32,
    /// Gradient palette.
    pub palette: Palette,
    /// Seed for point placement and noise character.
    pub seed: u32,
    /// Whether the bloom pass runs.
    pub bloom: bool,
    /// Bloom intensity.
    pub bloom_strength: f32,
    /// Background color (sRGB).
    pub bg_color: [u8; 3],
    /// Camera distance from the origin.
    pub camera_distance: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Whether the camera slowly orbits on its own.
    pub auto_rotate: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            count: 15_000,
            size: 0.6,
            speed: 0.4,
            turbulence: 1.5,
            palette: Palette::Galaxy,
            seed: 0,
            bloom: true,
            bloom_strength: 1.2,
            bg_color: [0x00, 0x08, 0x14],
            camera_distance: 22.0,
            fov: 60.0,
            auto_rotate: true,
        }
    }
}

/// Which lifecycle call a parameter edit requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamChange {
    /// Nothing the particle system needs to act on.
    None,
    /// Picked up by the next per-frame update.
    Live,
    /// Colors must be reassigned.
    Recolor,
    /// Buffers must be regenerated.
    Rebuild,
}

impl Params {
    /// Default parameters with a freshly randomized seed.
    pub fn with_random_seed() -> Self {
        Self {
            seed: random_seed(),
            ..Self::default()
        }
    }

    /// Copy with every numeric field clamped into its panel range.
    pub fn clamped(&self) -> Self {
        Self {
            count: self.count.clamp(*COUNT_RANGE.start(), *COUNT_RANGE.end()),
            size: clamp_to(self.size, &SIZE_RANGE),
            speed: clamp_to(self.speed, &SPEED_RANGE),
            turbulence: clamp_to(self.turbulence, &TURBULENCE_RANGE),
            bloom_strength: clamp_to(self.bloom_strength, &BLOOM_STRENGTH_RANGE),
            camera_distance: clamp_to(self.camera_distance, &CAMERA_DISTANCE_RANGE),
            fov: clamp_to(self.fov, &FOV_RANGE),
            ..self.clone()
        }
    }

    /// Classify the edit from `previous` to `self`.
    pub fn change_from(&self, previous: &Params) -> ParamChange {
        if self.count != previous.count || self.seed != previous.seed {
            ParamChange::Rebuild
        } else if self.palette != previous.palette {
            ParamChange::Recolor
        } else if self != previous {
            ParamChange::Live
        } else {
            ParamChange::None
        }
    }

    /// Background color converted to linear RGB.
    pub fn bg_color_linear(&self) -> [f32; 3] {
        self.bg_color.map(srgb_to_linear)
    }
}

/// A random seed in `[0, SEED_LIMIT)`.
pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(0..SEED_LIMIT)
}

/// Parse a `#RRGGBB` (or `RRGGBB`) hex color.
pub fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let hex = text.strip_prefix('#').unwrap_or(text);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    value.clamp(*range.start(), *range.end())
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_ranges() {
        let params = Params::default();
        assert_eq!(params.clamped(), params);
    }

    #[test]
    fn test_clamped_pulls_values_into_range() {
        let params = Params {
            count: 10,
            size: 9.0,
            speed: -1.0,
            turbulence: 100.0,
            fov: 5.0,
            ..Params::default()
        }
        .clamped();
        assert_eq!(params.count, 500);
        assert_eq!(params.size, 5.0);
        assert_eq!(params.speed, 0.0);
        assert_eq!(params.turbulence, 6.0);
        assert_eq!(params.fov, 20.0);
    }

    #[test]
    fn test_change_classification() {
        let base = Params::default();

        let count = Params { count: 2000, ..base.clone() };
        assert_eq!(count.change_from(&base), ParamChange::Rebuild);

        let seed = Params { seed: 17, ..base.clone() };
        assert_eq!(seed.change_from(&base), ParamChange::Rebuild);

        let palette = Params { palette: Palette::Fire, ..base.clone() };
        assert_eq!(palette.change_from(&base), ParamChange::Recolor);

        let size = Params { size: 1.0, ..base.clone() };
        assert_eq!(size.change_from(&base), ParamChange::Live);

        assert_eq!(base.change_from(&base.clone()), ParamChange::None);
    }

    #[test]
    fn test_rebuild_wins_over_recolor() {
        let base = Params::default();
        let both = Params { seed: 3, palette: Palette::Neon, ..base.clone() };
        assert_eq!(both.change_from(&base), ParamChange::Rebuild);
    }

    #[test]
    fn test_random_seed_in_range() {
        for _ in 0..100 {
            assert!(random_seed() < SEED_LIMIT);
        }
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#000814"), Some([0x00, 0x08, 0x14]));
        assert_eq!(parse_hex_color("ff8000"), Some([0xff, 0x80, 0x00]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_bg_color_linear() {
        let params = Params { bg_color: [255, 0, 128], ..Params::default() };
        let [r, g, b] = params.bg_color_linear();
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!(g, 0.0);
        assert!(b > 0.2 && b < 0.23);
    }
}
