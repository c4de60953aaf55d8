//! CPU reference of the per-point displacement and sprite math.
//!
//! These functions mirror [`crate::shader::POINTS_WGSL`] in f32 so the
//! algorithm can be tested and inspected without a GPU. Results agree with
//! the shader up to floating-point differences between devices.

use glam::{Vec2, Vec3};

/// Scale applied to rest positions before sampling noise.
pub const NOISE_SCALE: f32 = 0.3;
/// Scale applied to `time * speed` when scrolling the noise field.
pub const TIME_SCALE: f32 = 0.1;
/// Number of fBm octaves.
pub const OCTAVES: usize = 4;
/// Per-axis coordinate offsets decorrelating the three displacement channels.
/// The seed is added on z.
pub const AXIS_OFFSETS: [Vec2; 3] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(43.7, 17.3),
    Vec2::new(-13.1, 31.7),
];
/// Tuned constant relating the size parameter to sprite pixels.
pub const SIZE_SCALE: f32 = 300.0;
/// Smallest sprite diameter in pixels.
pub const MIN_POINT_SIZE: f32 = 0.5;
/// Largest sprite diameter in pixels.
pub const MAX_POINT_SIZE: f32 = 64.0;

fn fract(x: f32) -> f32 {
    x - x.floor()
}

fn fract3(v: Vec3) -> Vec3 {
    v - v.floor()
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// GLSL/WGSL `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Deterministic lattice hash in `[0, 1)`.
pub fn hash(p: Vec3) -> f32 {
    let p = fract3(p * 0.3183099 + Vec3::splat(0.1)) * 17.0;
    fract(p.x * p.y * p.z * (p.x + p.y + p.z))
}

/// Trilinear value noise over the integer lattice, eased with `3t² − 2t³`.
pub fn value_noise(p: Vec3) -> f32 {
    let i = p.floor();
    let f = fract3(p);
    let f = f * f * (Vec3::splat(3.0) - 2.0 * f);

    let corner = |x: f32, y: f32, z: f32| hash(i + Vec3::new(x, y, z));

    mix(
        mix(
            mix(corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), f.x),
            mix(corner(0.0, 1.0, 0.0), corner(1.0, 1.0, 0.0), f.x),
            f.y,
        ),
        mix(
            mix(corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0), f.x),
            mix(corner(0.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), f.x),
            f.y,
        ),
        f.z,
    )
}

/// Fractal sum of [`value_noise`], one channel per axis, each in `(-1, 1)`.
pub fn fbm3(p: Vec3, seed: f32) -> Vec3 {
    let mut p = p;
    let mut v = Vec3::ZERO;
    let mut amp = 0.5;
    for _ in 0..OCTAVES {
        let channel = |offset: Vec2| value_noise(p + offset.extend(seed)) * 2.0 - 1.0;
        v += amp * Vec3::new(
            channel(AXIS_OFFSETS[0]),
            channel(AXIS_OFFSETS[1]),
            channel(AXIS_OFFSETS[2]),
        );
        p *= 2.0;
        amp *= 0.5;
    }
    v
}

/// Displaced position of a point at `rest` after `time` seconds.
pub fn displace(rest: Vec3, time: f32, speed: f32, turbulence: f32, seed: f32) -> Vec3 {
    let noise_pos = rest * NOISE_SCALE + Vec3::splat(time * speed * TIME_SCALE);
    rest + fbm3(noise_pos, seed) * turbulence
}

/// Sprite diameter in pixels for a point at `view_z` (negative in front of
/// the camera).
pub fn point_size(size: f32, view_z: f32) -> f32 {
    (size * SIZE_SCALE / -view_z).clamp(MIN_POINT_SIZE, MAX_POINT_SIZE)
}

/// Sprite alpha at `uv` in `[0, 1]²`, or `None` where the fragment is discarded.
pub fn sprite_alpha(uv: Vec2) -> Option<f32> {
    let d = uv.distance(Vec2::splat(0.5));
    if d > 0.5 {
        None
    } else {
        Some(1.0 - smoothstep(0.15, 0.5, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_point(rng: &mut impl Rng, extent: f32) -> Vec3 {
        Vec3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    #[test]
    fn test_hash_in_unit_interval() {
        let mut rng = rand::thread_rng();
        for _ in 0..5000 {
            let h = hash(random_point(&mut rng, 1000.0));
            assert!((0.0..1.0).contains(&h), "hash out of range: {h}");
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let p = Vec3::new(3.0, -7.0, 12.0);
        assert_eq!(hash(p), hash(p));
    }

    #[test]
    fn test_value_noise_hits_lattice_hashes() {
        for p in [Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 5.0, -6.0)] {
            assert_eq!(value_noise(p), hash(p));
        }
    }

    #[test]
    fn test_value_noise_bounded_and_continuous() {
        let mut rng = rand::thread_rng();
        for _ in 0..2000 {
            let p = random_point(&mut rng, 50.0);
            let n = value_noise(p);
            assert!((0.0..=1.0).contains(&n));
            let nearby = value_noise(p + Vec3::splat(1e-3));
            assert!((n - nearby).abs() < 0.05);
        }
    }

    #[test]
    fn test_fbm_amplitude_bound() {
        // Amplitudes 0.5 + 0.25 + 0.125 + 0.0625
        let bound = 0.9375;
        let mut rng = rand::thread_rng();
        for _ in 0..2000 {
            let v = fbm3(random_point(&mut rng, 20.0), rng.gen_range(0.0..100_000.0));
            assert!(v.abs().max_element() <= bound + 1e-5, "{v}");
        }
    }

    #[test]
    fn test_fbm_axes_are_decorrelated() {
        let p = Vec3::new(1.37, -2.11, 0.42);
        let v = fbm3(p, 12.0);
        assert_ne!(v.x, v.y);
        assert_ne!(v.y, v.z);
    }

    #[test]
    fn test_zero_turbulence_keeps_rest_position() {
        let rest = Vec3::new(2.0, -3.0, 4.5);
        assert_eq!(displace(rest, 17.0, 1.0, 0.0, 99.0), rest);
    }

    #[test]
    fn test_zero_speed_is_static() {
        let rest = Vec3::new(-1.0, 0.5, 6.0);
        let a = displace(rest, 0.0, 0.0, 1.5, 5.0);
        let b = displace(rest, 120.0, 0.0, 1.5, 5.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_displacement_scales_with_turbulence() {
        let rest = Vec3::new(0.3, 1.7, -2.2);
        let one = displace(rest, 2.0, 0.4, 1.0, 7.0) - rest;
        let three = displace(rest, 2.0, 0.4, 3.0, 7.0) - rest;
        assert!((three - one * 3.0).length() < 1e-4);
    }

    #[test]
    fn test_point_size_attenuation_and_bounds() {
        assert!((point_size(0.6, -22.0) - 0.6 * 300.0 / 22.0).abs() < 1e-5);
        assert_eq!(point_size(5.0, -0.1), MAX_POINT_SIZE);
        assert_eq!(point_size(0.1, -1000.0), MIN_POINT_SIZE);
        // Behind the camera the raw value is negative and clamps to the minimum
        assert_eq!(point_size(1.0, 5.0), MIN_POINT_SIZE);
    }

    #[test]
    fn test_sprite_alpha_profile() {
        assert_eq!(sprite_alpha(Vec2::splat(0.5)), Some(1.0));
        assert_eq!(sprite_alpha(Vec2::new(0.5, 0.6)), Some(1.0));
        assert_eq!(sprite_alpha(Vec2::new(0.0, 0.0)), None);
        let edge = sprite_alpha(Vec2::new(1.0, 0.5)).unwrap();
        assert!(edge.abs() < 1e-6);
        let mid = sprite_alpha(Vec2::new(0.5 + 0.325, 0.5)).unwrap();
        assert!(mid > 0.0 && mid < 1.0);
    }
}
