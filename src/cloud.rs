//! Point cloud generation.
//!
//! A [`PointField`] holds two parallel buffers: rest positions distributed
//! uniformly through a sphere, and per-point colors taken from a palette
//! gradient in generation order.

use std::f64::consts::TAU;

use glam::Vec3;

use crate::palette::Palette;
use crate::rng::Mulberry32;

/// Radius of the sphere the points are placed in.
pub const MAX_RADIUS: f32 = 8.0;

/// CPU-side position and color buffers for the particle cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct PointField {
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
}

impl PointField {
    /// Generate `count` points from `seed`, colored by `palette`.
    ///
    /// Each point consumes three draws in a fixed order: azimuth, polar angle
    /// (via `acos` of a value in `[-1, 1]` so the poles are not over-sampled)
    /// and radius (via cube root so density is uniform through the volume).
    pub fn generate(count: u32, palette: Palette, seed: u32) -> Self {
        let mut rng = Mulberry32::new(seed);
        let radius = MAX_RADIUS as f64;

        let positions = (0..count)
            .map(|_| {
                let theta = rng.next_f64() * TAU;
                let phi = (2.0 * rng.next_f64() - 1.0).acos();
                let r = radius * rng.next_f64().cbrt();

                Vec3::new(
                    (r * phi.sin() * theta.cos()) as f32,
                    (r * phi.sin() * theta.sin()) as f32,
                    (r * phi.cos()) as f32,
                )
            })
            .collect();

        let colors = (0..count).map(|i| gradient_color(palette, i, count)).collect();

        Self { positions, colors }
    }

    /// Reassign every color from `palette` without touching positions.
    pub fn recolor(&mut self, palette: Palette) {
        let count = self.colors.len() as u32;
        for (i, color) in self.colors.iter_mut().enumerate() {
            *color = gradient_color(palette, i as u32, count);
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Rest positions, one per point.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Colors, one per point.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Positions as a flat `[x0, y0, z0, x1, ...]` slice of length `3 * len`.
    pub fn position_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat `[r0, g0, b0, r1, ...]` slice of length `3 * len`.
    pub fn color_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Color for point `index` of `count`: the palette sampled at `index / count`.
fn gradient_color(palette: Palette, index: u32, count: u32) -> Vec3 {
    palette.color(index as f32 / count as f32)
}
