//! # Nebula
//!
//! An interactive, GPU-rendered particle cloud.
//!
//! Tens of thousands of points are scattered through a sphere with a seeded
//! generator, colored along a three-stop gradient palette, and animated on
//! the GPU by displacing each point with time-scrolling fractal value noise.
//! Sprites blend additively into an HDR target that is bloomed and tone
//! mapped onto the screen.
//!
//! ## Quick Start
//!
//! ```ignore
//! use nebula::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     Viewer::new()
//!         .with_count(30_000)
//!         .with_seed(42)
//!         .with_palette(Palette::Sunset)
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Generation
//!
//! [`cloud::PointField::generate`] is a pure function of `(count, palette,
//! seed)`: the same inputs always produce bit-identical buffers. The
//! [`rng::Mulberry32`] generator drives placement; [`palette::Palette`]
//! supplies the colors.
//!
//! ### Lifecycle
//!
//! [`system::ParticleSystem`] exposes three operations:
//!
//! - `rebuild` when the point count or seed changes
//! - `update_colors` when only the palette changes
//! - `update` once per frame to refresh the shader uniforms
//!
//! The system itself never touches the GPU. The renderer in [`gpu`] picks up
//! the changes on its next frame.
//!
//! ### Animation
//!
//! Motion is computed entirely in [`shader::POINTS_WGSL`]. The [`noise`]
//! module mirrors that math on the CPU for inspection and tests.
//!
//! ## Controls
//!
//! Drag to orbit and scroll to zoom. `R` randomizes the seed, `P` cycles the
//! palette, `B` toggles bloom, `A` toggles auto-rotate, `Space` pauses and
//! `Escape` quits. With the `egui` feature (on by default) a control panel
//! exposes every parameter.

pub mod cloud;
pub mod error;
pub mod gpu;
pub mod input;
pub mod noise;
pub mod palette;
#[cfg(feature = "egui")]
pub mod panel;
pub mod params;
pub mod rng;
pub mod shader;
pub mod system;
pub mod time;
pub mod uniforms;
pub mod viewer;

pub use glam::Vec3;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use nebula::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cloud::PointField;
    pub use crate::error::{GpuError, ViewerError};
    pub use crate::input::{Input, KeyCode, MouseButton, Shortcut};
    pub use crate::palette::Palette;
    pub use crate::params::Params;
    pub use crate::rng::Mulberry32;
    pub use crate::system::ParticleSystem;
    pub use crate::time::Time;
    pub use crate::viewer::Viewer;
    pub use crate::Vec3;
    #[cfg(feature = "egui")]
    pub use egui;
}
