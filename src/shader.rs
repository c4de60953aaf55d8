//! WGSL source for the particle cloud.
//!
//! The vertex stage displaces each rest position by a 4-octave value-noise
//! fBm that scrolls through space over time, then expands an instanced quad
//! into a screen-space sprite whose size shrinks with view depth. The
//! fragment stage cuts a soft-edged disc out of the quad.
//!
//! [`crate::noise`] is a CPU mirror of the same functions.

/// Entry point of the vertex stage.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point of the fragment stage.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Vertex + fragment shader for the point sprites.
///
/// Bindings: group 0 binding 0 is [`crate::uniforms::CameraUniforms`],
/// binding 1 is [`crate::uniforms::CloudUniforms`]. Vertex buffer 0 holds rest
/// positions and buffer 1 holds colors, both per instance.
pub const POINTS_WGSL: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    viewport: vec2<f32>,
    _pad: vec2<f32>,
};

struct Cloud {
    time: f32,
    speed: f32,
    turbulence: f32,
    size: f32,
    seed: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(0) @binding(1) var<uniform> cloud: Cloud;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

// Lattice hash in [0, 1)
fn hash13(p_in: vec3<f32>) -> f32 {
    var p = fract(p_in * 0.3183099 + 0.1);
    p = p * 17.0;
    return fract(p.x * p.y * p.z * (p.x + p.y + p.z));
}

// Trilinear value noise with smoothstep easing
fn value_noise3(p: vec3<f32>) -> f32 {
    let i = floor(p);
    var f = fract(p);
    f = f * f * (3.0 - 2.0 * f);

    let n000 = hash13(i);
    let n100 = hash13(i + vec3<f32>(1.0, 0.0, 0.0));
    let n010 = hash13(i + vec3<f32>(0.0, 1.0, 0.0));
    let n110 = hash13(i + vec3<f32>(1.0, 1.0, 0.0));
    let n001 = hash13(i + vec3<f32>(0.0, 0.0, 1.0));
    let n101 = hash13(i + vec3<f32>(1.0, 0.0, 1.0));
    let n011 = hash13(i + vec3<f32>(0.0, 1.0, 1.0));
    let n111 = hash13(i + vec3<f32>(1.0, 1.0, 1.0));

    return mix(
        mix(mix(n000, n100, f.x), mix(n010, n110, f.x), f.y),
        mix(mix(n001, n101, f.x), mix(n011, n111, f.x), f.y),
        f.z
    );
}

// 4-octave fBm, one decorrelated channel per axis
fn fbm3(p_in: vec3<f32>, seed: f32) -> vec3<f32> {
    var p = p_in;
    var v = vec3<f32>(0.0);
    var amp = 0.5;
    for (var octave = 0; octave < 4; octave = octave + 1) {
        v.x += amp * (value_noise3(p + vec3<f32>(0.0, 0.0, seed)) * 2.0 - 1.0);
        v.y += amp * (value_noise3(p + vec3<f32>(43.7, 17.3, seed)) * 2.0 - 1.0);
        v.z += amp * (value_noise3(p + vec3<f32>(-13.1, 31.7, seed)) * 2.0 - 1.0);
        p = p * 2.0;
        amp = amp * 0.5;
    }
    return v;
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let corner = quad_vertices[vertex_index];

    let noise_pos = position * 0.3 + vec3<f32>(cloud.time * cloud.speed * 0.1);
    let offset = fbm3(noise_pos, cloud.seed) * cloud.turbulence;
    let displaced = position + offset;

    let view_pos = camera.view * vec4<f32>(displaced, 1.0);
    let point_size = clamp(cloud.size * 300.0 / -view_pos.z, 0.5, 64.0);

    // point_size is a diameter in pixels; NDC spans 2 units per viewport
    var clip_pos = camera.proj * view_pos;
    let ndc_offset = corner * point_size / camera.viewport;
    clip_pos = vec4<f32>(clip_pos.xy + ndc_offset * clip_pos.w, clip_pos.zw);

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = color;
    out.uv = corner * 0.5 + 0.5;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = distance(in.uv, vec2<f32>(0.5, 0.5));
    if d > 0.5 {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.15, 0.5, d);
    return vec4<f32>(in.color, alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_wgsl(code: &str) -> Result<naga::Module, String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(module)
    }

    #[test]
    fn test_points_shader_validates() {
        if let Err(e) = validate_wgsl(POINTS_WGSL) {
            panic!("{e}");
        }
    }

    #[test]
    fn test_entry_points_present() {
        let module = validate_wgsl(POINTS_WGSL).unwrap();
        let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&VERTEX_ENTRY));
        assert!(names.contains(&FRAGMENT_ENTRY));
    }

    #[test]
    fn test_constants_match_cpu_mirror() {
        for offset in crate::noise::AXIS_OFFSETS {
            let literal = format!("vec3<f32>({:?}, {:?}, seed)", offset.x, offset.y);
            assert!(POINTS_WGSL.contains(&literal), "missing {literal}");
        }
        assert!(POINTS_WGSL.contains("position * 0.3"));
        assert!(POINTS_WGSL.contains("cloud.time * cloud.speed * 0.1"));
        assert!(POINTS_WGSL.contains("clamp(cloud.size * 300.0 / -view_pos.z, 0.5, 64.0)"));
        assert!(POINTS_WGSL.contains("smoothstep(0.15, 0.5, d)"));
    }
}
