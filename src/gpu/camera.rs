//! Orbit camera for the 3D cloud view.
//!
//! Left-drag and wheel input are queued as deltas and eased in over several
//! frames by [`OrbitCamera::update`], so motion keeps gliding briefly after
//! the mouse stops.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Mat4, Vec2, Vec3};

use crate::uniforms::CameraUniforms;

/// Near clip plane.
pub const NEAR: f32 = 0.1;
/// Far clip plane.
pub const FAR: f32 = 1000.0;
/// Fraction of the pending rotation applied per frame.
pub const DAMPING: f32 = 0.05;
/// Auto-rotate speed; one orbit takes `60 / AUTO_ROTATE_SPEED` seconds.
pub const AUTO_ROTATE_SPEED: f32 = 0.3;
/// Closest zoom.
pub const MIN_DISTANCE: f32 = 3.0;
/// Farthest zoom.
pub const MAX_DISTANCE: f32 = 100.0;
/// Height of the initial eye position above the orbit plane.
pub const INITIAL_HEIGHT: f32 = 4.0;

const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;
const ZOOM_STEP: f32 = 0.95;

/// Damped orbit camera around a target point.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Spin slowly around the target when idle.
    pub auto_rotate: bool,
    yaw_delta: f32,
    pitch_delta: f32,
}

impl OrbitCamera {
    /// Camera looking at the origin from `(0, INITIAL_HEIGHT, distance)`.
    pub fn new(distance: f32, fov: f32) -> Self {
        let distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        Self {
            yaw: 0.0,
            pitch: (INITIAL_HEIGHT / distance).atan(),
            distance,
            target: Vec3::ZERO,
            fov,
            auto_rotate: true,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection for the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect.max(1e-4), NEAR, FAR)
    }

    /// Uniform record for a `width` x `height` framebuffer.
    pub fn uniforms(&self, width: u32, height: u32) -> CameraUniforms {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        CameraUniforms::new(self.view_matrix(), self.projection(aspect), width, height)
    }

    /// Queue an orbit from a drag of `delta` pixels in a viewport
    /// `viewport_height` pixels tall. A full-height drag turns one revolution.
    pub fn drag(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.yaw_delta -= TAU * delta.x / height;
        self.pitch_delta += TAU * delta.y / height;
    }

    /// Zoom by `lines` wheel notches. Positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.set_distance(self.distance * ZOOM_STEP.powf(lines));
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advance damping and auto-rotation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.auto_rotate {
            self.yaw_delta -= TAU / 60.0 * AUTO_ROTATE_SPEED * dt;
        }

        self.yaw += self.yaw_delta * DAMPING;
        self.pitch = (self.pitch + self.pitch_delta * DAMPING).clamp(-MAX_PITCH, MAX_PITCH);

        self.yaw_delta *= 1.0 - DAMPING;
        self.pitch_delta *= 1.0 - DAMPING;
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(22.0, 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let camera = OrbitCamera::new(22.0, 60.0);
        let pos = camera.position();
        assert!(pos.x.abs() < 1e-5);
        assert!((pos.y / pos.z - INITIAL_HEIGHT / 22.0).abs() < 1e-5);
        assert!((pos.length() - 22.0).abs() < 1e-4);
    }

    #[test]
    fn test_distance_is_clamped() {
        let mut camera = OrbitCamera::new(1.0, 60.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        for _ in 0..500 {
            camera.zoom(-1.0);
        }
        assert_eq!(camera.distance, MAX_DISTANCE);
        camera.zoom(1.0);
        assert!(camera.distance < MAX_DISTANCE);
    }

    #[test]
    fn test_drag_is_damped() {
        let mut camera = OrbitCamera::new(22.0, 60.0);
        camera.auto_rotate = false;
        camera.drag(Vec2::new(100.0, 0.0), 800.0);

        let target = -TAU * 100.0 / 800.0;
        camera.update(0.016);
        let first = camera.yaw;
        assert!((first - target * DAMPING).abs() < 1e-6);

        for _ in 0..2000 {
            camera.update(0.016);
        }
        assert!((camera.yaw - target).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_stays_off_the_poles() {
        let mut camera = OrbitCamera::new(22.0, 60.0);
        camera.drag(Vec2::new(0.0, 10_000.0), 100.0);
        for _ in 0..500 {
            camera.update(0.016);
        }
        assert!(camera.pitch < FRAC_PI_2);
        assert!(camera.view_matrix().is_finite());
    }

    #[test]
    fn test_auto_rotate_spins() {
        let mut camera = OrbitCamera::new(22.0, 60.0);
        let yaw = camera.yaw;
        camera.update(1.0 / 60.0);
        assert!(camera.yaw < yaw);

        let mut still = OrbitCamera::new(22.0, 60.0);
        still.auto_rotate = false;
        still.update(1.0 / 60.0);
        assert_eq!(still.yaw, 0.0);
    }

    #[test]
    fn test_uniforms_viewport() {
        let camera = OrbitCamera::default();
        let uniforms = camera.uniforms(1280, 720);
        assert_eq!(uniforms.viewport, [1280.0, 720.0]);
    }
}
