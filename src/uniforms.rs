//! Uniform records shared with the point shader.
//!
//! Both structs mirror WGSL declarations in [`crate::shader::POINTS_WGSL`]
//! field for field, including explicit padding to 16-byte multiples.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::params::{Params, SEED_LIMIT};

/// Per-frame values driving the displacement and sprite size.
///
/// Derived entirely from [`Params`] plus elapsed time.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CloudUniforms {
    /// Elapsed seconds.
    pub time: f32,
    /// Noise scroll speed.
    pub speed: f32,
    /// Displacement magnitude.
    pub turbulence: f32,
    /// Sprite size factor.
    pub size: f32,
    /// Seed folded into `[0, SEED_LIMIT)` as a float; offsets the noise field.
    pub seed: f32,
    _padding: [f32; 3],
}

impl CloudUniforms {
    /// Build the record from parameters and elapsed time.
    pub fn from_params(params: &Params, time: f32) -> Self {
        Self {
            time,
            speed: params.speed,
            turbulence: params.turbulence,
            size: params.size,
            seed: noise_seed(params.seed),
            _padding: [0.0; 3],
        }
    }

    /// Overwrite every field in place.
    pub fn set(&mut self, params: &Params, time: f32) {
        *self = Self::from_params(params, time);
    }
}

/// The seed as the shader sees it.
///
/// Large seeds are folded below [`SEED_LIMIT`]: past about 2^24 an f32 lattice
/// coordinate has no fractional part and the hash degenerates to a constant.
pub fn noise_seed(seed: u32) -> f32 {
    (seed % SEED_LIMIT) as f32
}

/// View, projection and viewport size in framebuffer pixels.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub viewport: [f32; 2],
    _padding: [f32; 2],
}

impl CameraUniforms {
    pub fn new(view: Mat4, proj: Mat4, width: u32, height: u32) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            viewport: [width.max(1) as f32, height.max(1) as f32],
            _padding: [0.0; 2],
        }
    }
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, 1, 1)
    }
}
