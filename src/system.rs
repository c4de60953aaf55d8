//! Particle system lifecycle.
//!
//! [`ParticleSystem`] owns the CPU point buffers and the uniform record and
//! exposes the three lifecycle entry points. It never touches the GPU
//! directly: it records what changed (a new buffer generation, or colors
//! needing re-upload) and the renderer consumes those flags when it syncs.

use std::time::Instant;

use tracing::debug;

use crate::cloud::PointField;
use crate::params::Params;
use crate::uniforms::CloudUniforms;

/// The particle cloud's CPU state.
#[derive(Debug)]
pub struct ParticleSystem {
    field: PointField,
    uniforms: CloudUniforms,
    generation: u64,
    colors_dirty: bool,
}

impl ParticleSystem {
    /// Build the initial point buffers from `params`.
    pub fn new(params: &Params) -> Self {
        Self {
            field: generate(params),
            uniforms: CloudUniforms::from_params(params, 0.0),
            generation: 0,
            colors_dirty: false,
        }
    }

    /// Regenerate positions and colors from scratch.
    ///
    /// Call when `count` or `seed` changes. The previous buffers are dropped
    /// and the generation counter advances so the renderer replaces its GPU
    /// copies.
    pub fn rebuild(&mut self, params: &Params) {
        self.field = generate(params);
        self.uniforms.set(params, self.uniforms.time);
        self.generation += 1;
        self.colors_dirty = false;
    }

    /// Reassign colors in place from the current palette.
    ///
    /// Positions are untouched. The existing point count is kept even if
    /// `params.count` has since changed; that needs a [`rebuild`](Self::rebuild).
    pub fn update_colors(&mut self, params: &Params) {
        let start = Instant::now();
        self.field.recolor(params.palette);
        self.colors_dirty = true;
        debug!(
            palette = %params.palette,
            points = self.field.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "recolored particle cloud"
        );
    }

    /// Push the current parameters and elapsed time into the uniform record.
    ///
    /// Called once per frame. Does not allocate.
    pub fn update(&mut self, params: &Params, time: f32) {
        self.uniforms.set(params, time);
    }

    pub fn field(&self) -> &PointField {
        &self.field
    }

    pub fn uniforms(&self) -> &CloudUniforms {
        &self.uniforms
    }

    /// Incremented on every rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of points currently generated.
    pub fn point_count(&self) -> u32 {
        self.field.len() as u32
    }

    /// Whether colors changed since the last [`take_colors_dirty`](Self::take_colors_dirty).
    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Clear and return the color re-upload flag.
    pub fn take_colors_dirty(&mut self) -> bool {
        std::mem::take(&mut self.colors_dirty)
    }
}

fn generate(params: &Params) -> PointField {
    let start = Instant::now();
    // Buffers are sized at generation time; an empty cloud is never built.
    let count = params.count.max(1);
    let field = PointField::generate(count, params.palette, params.seed);
    debug!(
        count,
        seed = params.seed,
        palette = %params.palette,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "generated particle cloud"
    );
    field
}
