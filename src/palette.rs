//! Named gradient palettes.
//!
//! Every palette is an ordered set of three RGB stops. Colors are sampled by
//! piecewise-linear interpolation across the stops:
//!
//! ```ignore
//! use nebula::palette::{palette_color, Palette};
//!
//! let mid = Palette::Fire.color(0.5);      // exactly the middle stop
//! let same = palette_color("fire", 0.5);   // lookup by name
//! let fallback = palette_color("nope", 0.5); // unknown names use galaxy
//! ```

use std::fmt;

use glam::Vec3;

/// Pre-defined color palettes for the particle cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Palette {
    /// Violet to blue to white (default).
    #[default]
    Galaxy,
    /// Red to orange to yellow.
    Fire,
    /// Deep blue to teal to cyan.
    Ocean,
    /// Green to magenta to pink.
    Neon,
    /// White fading to slate.
    Mono,
    /// Red-orange to amber to purple.
    Sunset,
}

impl Palette {
    /// All palettes, in the order they are offered in the control panel.
    pub const ALL: [Palette; 6] = [
        Palette::Galaxy,
        Palette::Fire,
        Palette::Ocean,
        Palette::Neon,
        Palette::Mono,
        Palette::Sunset,
    ];

    /// Lowercase name used in the panel and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Palette::Galaxy => "galaxy",
            Palette::Fire => "fire",
            Palette::Ocean => "ocean",
            Palette::Neon => "neon",
            Palette::Mono => "mono",
            Palette::Sunset => "sunset",
        }
    }

    /// Look up a palette by name, returning `None` for unknown names.
    pub fn try_from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Look up a palette by name. Unknown names resolve to [`Palette::Galaxy`].
    pub fn from_name(name: &str) -> Self {
        Self::try_from_name(name).unwrap_or_default()
    }

    /// The palette's color stops.
    pub fn stops(self) -> [Vec3; 3] {
        match self {
            Palette::Galaxy => [
                Vec3::new(0.50, 0.20, 1.00),
                Vec3::new(0.30, 0.50, 1.00),
                Vec3::new(1.00, 1.00, 1.00),
            ],
            Palette::Fire => [
                Vec3::new(1.00, 0.05, 0.00),
                Vec3::new(1.00, 0.50, 0.00),
                Vec3::new(1.00, 0.95, 0.20),
            ],
            Palette::Ocean => [
                Vec3::new(0.00, 0.40, 0.85),
                Vec3::new(0.00, 0.80, 0.70),
                Vec3::new(0.30, 1.00, 1.00),
            ],
            Palette::Neon => [
                Vec3::new(0.00, 1.00, 0.50),
                Vec3::new(0.90, 0.00, 1.00),
                Vec3::new(1.00, 0.00, 0.50),
            ],
            Palette::Mono => [
                Vec3::new(1.00, 1.00, 1.00),
                Vec3::new(0.60, 0.60, 0.65),
                Vec3::new(0.30, 0.30, 0.35),
            ],
            Palette::Sunset => [
                Vec3::new(1.00, 0.25, 0.10),
                Vec3::new(1.00, 0.60, 0.00),
                Vec3::new(0.60, 0.10, 0.60),
            ],
        }
    }

    /// Sample the gradient at `t` in `[0, 1]`.
    pub fn color(self, t: f32) -> Vec3 {
        interpolate_stops(&self.stops(), t)
    }

    /// The next palette in panel order, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Piecewise-linear interpolation across ordered color stops.
///
/// `t` is scaled by `stops.len() - 1`; the segment index is the floor of the
/// scaled value clamped to `[0, len - 2]`, and the fractional remainder blends
/// between the segment's two stops. `t = 1.0` lands exactly on the last stop.
///
/// Fewer than two stops degrade gracefully: one stop is returned as-is and an
/// empty slice yields black.
pub fn interpolate_stops(stops: &[Vec3], t: f32) -> Vec3 {
    match stops.len() {
        0 => Vec3::ZERO,
        1 => stops[0],
        len => {
            let scaled = t * (len - 1) as f32;
            let i = (scaled.floor() as i64).clamp(0, len as i64 - 2) as usize;
            let s = scaled - i as f32;
            // a * (1 - s) + b * s is exact at both ends of the segment
            let color = stops[i] * (1.0 - s) + stops[i + 1] * s;
            color.clamp(Vec3::ZERO, Vec3::ONE)
        }
    }
}

/// Sample a palette by name. Unknown names fall back to the default palette.
pub fn palette_color(name: &str, t: f32) -> Vec3 {
    Palette::from_name(name).color(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_endpoints_are_exact_stops() {
        for palette in Palette::ALL {
            let stops = palette.stops();
            assert_eq!(palette.color(0.0), stops[0], "{palette} at t=0");
            assert_eq!(palette.color(1.0), stops[2], "{palette} at t=1");
        }
    }

    #[test]
    fn test_fire_midpoint_is_middle_stop() {
        assert_eq!(palette_color("fire", 0.5), Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_colors_stay_in_unit_range() {
        let mut rng = rand::thread_rng();
        for palette in Palette::ALL {
            for _ in 0..500 {
                let t: f32 = rng.gen_range(0.0..=1.0);
                let c = palette.color(t);
                assert!(c.cmpge(Vec3::ZERO).all() && c.cmple(Vec3::ONE).all(), "{palette} t={t} -> {c}");
            }
        }
    }

    #[test]
    fn test_unknown_name_falls_back_to_galaxy() {
        for t in [0.0, 0.13, 0.5, 0.77, 1.0] {
            assert_eq!(palette_color("plasma", t), Palette::Galaxy.color(t));
            assert_eq!(palette_color("", t), palette_color("galaxy", t));
        }
        assert_eq!(Palette::try_from_name("Fire"), None);
    }

    #[test]
    fn test_interpolation_is_linear_within_segment() {
        let c = Palette::Galaxy.color(0.25);
        let expected = Vec3::new(0.4, 0.35, 1.0);
        assert!((c - expected).length() < 1e-6);
    }

    #[test]
    fn test_out_of_range_t_clamps_segment() {
        for t in [-0.5, 1.5, 2.0] {
            let c = Palette::Ocean.color(t);
            assert!(c.cmple(Vec3::ONE).all() && c.cmpge(Vec3::ZERO).all(), "t={t} -> {c}");
        }
    }

    #[test]
    fn test_degenerate_stop_lists() {
        assert_eq!(interpolate_stops(&[], 0.5), Vec3::ZERO);
        let only = Vec3::new(0.2, 0.4, 0.6);
        assert_eq!(interpolate_stops(&[only], 0.9), only);
    }

    #[test]
    fn test_names_round_trip_and_cycle() {
        for palette in Palette::ALL {
            assert_eq!(Palette::from_name(palette.name()), palette);
        }
        assert_eq!(Palette::Sunset.next(), Palette::Galaxy);
        assert_eq!(Palette::Galaxy.next(), Palette::Fire);
    }
}
