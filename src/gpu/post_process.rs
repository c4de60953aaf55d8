//! HDR scene target, bloom and tone-mapped composite.
//!
//! The cloud is drawn into an `Rgba16Float` target. Bloom builds a chain of
//! half-resolution mips: the first level is a soft-thresholded 13-tap
//! downsample of the scene, each further level a 13-tap downsample of the
//! previous one. The chain is then walked back up with a 3x3 tent filter,
//! each coarse level added onto the finer one. The composite pass adds the
//! top bloom level to the scene, applies ACES filmic tone mapping and writes
//! to the swapchain.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::params::Params;

/// Format of the scene and bloom targets.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Number of bloom mip levels.
pub const BLOOM_MIPS: usize = 5;
/// Brightness above which pixels contribute to bloom.
pub const BLOOM_THRESHOLD: f32 = 0.1;
/// Width of the soft knee, as a fraction of the threshold.
pub const BLOOM_SOFT_KNEE: f32 = 0.5;
/// Weight of each coarser level as it is folded into the finer one.
pub const BLOOM_RADIUS: f32 = 0.5;
/// Tone mapping exposure.
pub const EXPOSURE: f32 = 1.0;

/// Uniforms shared by the bloom and composite passes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PostUniforms {
    pub threshold: f32,
    pub knee: f32,
    pub radius: f32,
    pub strength: f32,
    pub exposure: f32,
    /// 1.0 when bloom is composited, 0.0 otherwise.
    pub bloom: f32,
    _padding: [f32; 2],
}

impl PostUniforms {
    pub fn from_params(params: &Params) -> Self {
        Self {
            threshold: BLOOM_THRESHOLD,
            knee: BLOOM_THRESHOLD * BLOOM_SOFT_KNEE,
            radius: BLOOM_RADIUS,
            strength: params.bloom_strength,
            exposure: EXPOSURE,
            bloom: if params.bloom { 1.0 } else { 0.0 },
            _padding: [0.0; 2],
        }
    }
}

/// Bloom chain: prefilter, 13-tap downsample and tent upsample.
pub const BLOOM_WGSL: &str = r#"
struct Post {
    threshold: f32,
    knee: f32,
    radius: f32,
    strength: f32,
    exposure: f32,
    bloom: f32,
    _pad0: f32,
    _pad1: f32,
};

@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;
@group(0) @binding(2) var<uniform> post: Post;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    out.uv = uvs[vertex_index];
    return out;
}

fn tap(uv: vec2<f32>) -> vec3<f32> {
    return textureSample(src_texture, src_sampler, uv).rgb;
}

fn downsample13(uv: vec2<f32>) -> vec3<f32> {
    let t = 1.0 / vec2<f32>(textureDimensions(src_texture));

    let a = tap(uv + t * vec2<f32>(-2.0, -2.0));
    let b = tap(uv + t * vec2<f32>( 0.0, -2.0));
    let c = tap(uv + t * vec2<f32>( 2.0, -2.0));
    let d = tap(uv + t * vec2<f32>(-2.0,  0.0));
    let e = tap(uv);
    let f = tap(uv + t * vec2<f32>( 2.0,  0.0));
    let g = tap(uv + t * vec2<f32>(-2.0,  2.0));
    let h = tap(uv + t * vec2<f32>( 0.0,  2.0));
    let i = tap(uv + t * vec2<f32>( 2.0,  2.0));
    let j = tap(uv + t * vec2<f32>(-1.0, -1.0));
    let k = tap(uv + t * vec2<f32>( 1.0, -1.0));
    let l = tap(uv + t * vec2<f32>(-1.0,  1.0));
    let m = tap(uv + t * vec2<f32>( 1.0,  1.0));

    return e * 0.125
        + (a + c + g + i) * 0.03125
        + (b + d + f + h) * 0.0625
        + (j + k + l + m) * 0.125;
}

fn soft_threshold(color: vec3<f32>) -> vec3<f32> {
    let brightness = max(color.r, max(color.g, color.b));
    var soft = clamp(brightness - post.threshold + post.knee, 0.0, 2.0 * post.knee);
    soft = soft * soft / (4.0 * post.knee + 1e-5);
    let contribution = max(soft, brightness - post.threshold) / max(brightness, 1e-5);
    return color * contribution;
}

@fragment
fn fs_prefilter(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(soft_threshold(downsample13(in.uv)), 1.0);
}

@fragment
fn fs_downsample(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(downsample13(in.uv), 1.0);
}

@fragment
fn fs_upsample(in: VertexOutput) -> @location(0) vec4<f32> {
    let t = 1.0 / vec2<f32>(textureDimensions(src_texture));

    var sum = tap(in.uv + t * vec2<f32>(-1.0, -1.0));
    sum += tap(in.uv + t * vec2<f32>( 0.0, -1.0)) * 2.0;
    sum += tap(in.uv + t * vec2<f32>( 1.0, -1.0));
    sum += tap(in.uv + t * vec2<f32>(-1.0,  0.0)) * 2.0;
    sum += tap(in.uv) * 4.0;
    sum += tap(in.uv + t * vec2<f32>( 1.0,  0.0)) * 2.0;
    sum += tap(in.uv + t * vec2<f32>(-1.0,  1.0));
    sum += tap(in.uv + t * vec2<f32>( 0.0,  1.0)) * 2.0;
    sum += tap(in.uv + t * vec2<f32>( 1.0,  1.0));

    return vec4<f32>(sum / 16.0 * post.radius, 1.0);
}
"#;

/// Scene + bloom composite with ACES tone mapping.
pub const COMPOSITE_WGSL: &str = r#"
struct Post {
    threshold: f32,
    knee: f32,
    radius: f32,
    strength: f32,
    exposure: f32,
    bloom: f32,
    _pad0: f32,
    _pad1: f32,
};

@group(0) @binding(0) var scene_texture: texture_2d<f32>;
@group(0) @binding(1) var bloom_texture: texture_2d<f32>;
@group(0) @binding(2) var linear_sampler: sampler;
@group(0) @binding(3) var<uniform> post: Post;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    out.uv = uvs[vertex_index];
    return out;
}

// Narkowicz fit of the ACES filmic curve
fn aces(x: vec3<f32>) -> vec3<f32> {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;
    return clamp((x * (a * x + b)) / (x * (c * x + d) + e), vec3<f32>(0.0), vec3<f32>(1.0));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let scene = textureSample(scene_texture, linear_sampler, in.uv).rgb;
    let bloom = textureSample(bloom_texture, linear_sampler, in.uv).rgb;
    let hdr = (scene + bloom * post.strength * post.bloom) * post.exposure;
    return vec4<f32>(aces(hdr), 1.0);
}
"#;

/// CPU mirror of the composite's ACES curve, per channel.
pub fn aces_filmic(x: f32) -> f32 {
    let (a, b, c, d, e) = (2.51, 0.03, 2.43, 0.59, 0.14);
    ((x * (a * x + b)) / (x * (c * x + d) + e)).clamp(0.0, 1.0)
}

/// CPU mirror of the prefilter's soft threshold.
pub fn soft_threshold(color: Vec3, threshold: f32, knee: f32) -> Vec3 {
    let brightness = color.max_element();
    let soft = (brightness - threshold + knee).clamp(0.0, 2.0 * knee);
    let soft = soft * soft / (4.0 * knee + 1e-5);
    let contribution = soft.max(brightness - threshold) / brightness.max(1e-5);
    color * contribution
}

/// Size of bloom level `level` for a `width` x `height` scene.
pub fn bloom_mip_size(width: u32, height: u32, level: usize) -> (u32, u32) {
    let shift = level as u32 + 1;
    ((width >> shift).max(1), (height >> shift).max(1))
}

/// Size-dependent textures and the bind groups that read them.
struct Targets {
    scene_view: wgpu::TextureView,
    bloom_views: Vec<wgpu::TextureView>,
    prefilter: wgpu::BindGroup,
    /// `downsample[i]` reads level `i` and writes level `i + 1`.
    downsample: Vec<wgpu::BindGroup>,
    /// `upsample[i]` reads level `i + 1` and adds into level `i`.
    upsample: Vec<wgpu::BindGroup>,
    composite: wgpu::BindGroup,
}

/// Offscreen HDR rendering with bloom.
pub struct PostProcess {
    sampler: wgpu::Sampler,
    uniform_buffer: wgpu::Buffer,
    bloom_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,
    prefilter_pipeline: wgpu::RenderPipeline,
    downsample_pipeline: wgpu::RenderPipeline,
    upsample_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    targets: Targets,
}

impl PostProcess {
    /// Create pipelines and size-dependent targets.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Bloom Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Post Uniform Buffer"),
            size: std::mem::size_of::<PostUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bloom_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Bind Group Layout"),
            entries: &[texture_entry(0), sampler_entry(1), uniform_entry(2)],
        });
        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                sampler_entry(2),
                uniform_entry(3),
            ],
        });

        let bloom_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Bloom Shader"),
            source: wgpu::ShaderSource::Wgsl(BLOOM_WGSL.into()),
        });
        let composite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Composite Shader"),
            source: wgpu::ShaderSource::Wgsl(COMPOSITE_WGSL.into()),
        });

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::REPLACE,
        };

        let prefilter_pipeline = fullscreen_pipeline(
            device,
            "Bloom Prefilter Pipeline",
            &bloom_layout,
            &bloom_shader,
            "fs_prefilter",
            HDR_FORMAT,
            None,
        );
        let downsample_pipeline = fullscreen_pipeline(
            device,
            "Bloom Downsample Pipeline",
            &bloom_layout,
            &bloom_shader,
            "fs_downsample",
            HDR_FORMAT,
            None,
        );
        let upsample_pipeline = fullscreen_pipeline(
            device,
            "Bloom Upsample Pipeline",
            &bloom_layout,
            &bloom_shader,
            "fs_upsample",
            HDR_FORMAT,
            Some(additive),
        );
        let composite_pipeline = fullscreen_pipeline(
            device,
            "Composite Pipeline",
            &composite_layout,
            &composite_shader,
            "fs_main",
            surface_format,
            None,
        );

        let targets = Targets::new(
            device,
            &bloom_layout,
            &composite_layout,
            &sampler,
            &uniform_buffer,
            width,
            height,
        );

        Self {
            sampler,
            uniform_buffer,
            bloom_layout,
            composite_layout,
            prefilter_pipeline,
            downsample_pipeline,
            upsample_pipeline,
            composite_pipeline,
            targets,
        }
    }

    /// Recreate the scene and bloom textures after window resize.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.targets = Targets::new(
            device,
            &self.bloom_layout,
            &self.composite_layout,
            &self.sampler,
            &self.uniform_buffer,
            width,
            height,
        );
    }

    /// HDR texture the scene is drawn into.
    pub fn scene_view(&self) -> &wgpu::TextureView {
        &self.targets.scene_view
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &PostUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Record the bloom chain (when enabled) and the composite into `output`.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView, bloom: bool) {
        if bloom {
            let targets = &self.targets;
            fullscreen_pass(
                encoder,
                "Bloom Prefilter",
                &targets.bloom_views[0],
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                &self.prefilter_pipeline,
                &targets.prefilter,
            );
            for (level, bind_group) in targets.downsample.iter().enumerate() {
                fullscreen_pass(
                    encoder,
                    "Bloom Downsample",
                    &targets.bloom_views[level + 1],
                    wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    &self.downsample_pipeline,
                    bind_group,
                );
            }
            for (level, bind_group) in targets.upsample.iter().enumerate().rev() {
                fullscreen_pass(
                    encoder,
                    "Bloom Upsample",
                    &targets.bloom_views[level],
                    wgpu::LoadOp::Load,
                    &self.upsample_pipeline,
                    bind_group,
                );
            }
        }

        fullscreen_pass(
            encoder,
            "Composite",
            output,
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            &self.composite_pipeline,
            &self.targets.composite,
        );
    }
}

impl Targets {
    fn new(
        device: &wgpu::Device,
        bloom_layout: &wgpu::BindGroupLayout,
        composite_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        uniform_buffer: &wgpu::Buffer,
        width: u32,
        height: u32,
    ) -> Self {
        let scene_view = create_hdr_view(device, "HDR Scene Texture", width.max(1), height.max(1));
        let bloom_views: Vec<wgpu::TextureView> = (0..BLOOM_MIPS)
            .map(|level| {
                let (w, h) = bloom_mip_size(width, height, level);
                create_hdr_view(device, &format!("Bloom Mip {}", level), w, h)
            })
            .collect();

        let bloom_group = |label: &str, source: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: bloom_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                ],
            })
        };

        let prefilter = bloom_group("Bloom Prefilter Bind Group", &scene_view);
        let downsample = bloom_views[..BLOOM_MIPS - 1]
            .iter()
            .map(|view| bloom_group("Bloom Downsample Bind Group", view))
            .collect();
        let upsample = bloom_views[1..]
            .iter()
            .map(|view| bloom_group("Bloom Upsample Bind Group", view))
            .collect();

        let composite = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Bind Group"),
            layout: composite_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&bloom_views[0]),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            scene_view,
            bloom_views,
            prefilter,
            downsample,
            upsample,
            composite,
        }
    }
}

fn create_hdr_view(device: &wgpu::Device, label: &str, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn fullscreen_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn fullscreen_pass(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

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

    fn entry_names(module: &naga::Module) -> Vec<&str> {
        module.entry_points.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_bloom_shader_validates() {
        let module = validate_wgsl(BLOOM_WGSL).unwrap_or_else(|e| panic!("{e}"));
        let names = entry_names(&module);
        for entry in ["vs_main", "fs_prefilter", "fs_downsample", "fs_upsample"] {
            assert!(names.contains(&entry), "missing {entry}");
        }
    }

    #[test]
    fn test_composite_shader_validates() {
        let module = validate_wgsl(COMPOSITE_WGSL).unwrap_or_else(|e| panic!("{e}"));
        let names = entry_names(&module);
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }

    #[test]
    fn test_post_uniforms_layout() {
        assert_eq!(std::mem::size_of::<PostUniforms>(), 32);
    }

    #[test]
    fn test_post_uniforms_follow_params() {
        let mut params = Params::default();
        let on = PostUniforms::from_params(&params);
        assert_eq!(on.bloom, 1.0);
        assert_eq!(on.strength, 1.2);
        assert_eq!(on.threshold, BLOOM_THRESHOLD);
        assert_eq!(on.radius, BLOOM_RADIUS);

        params.bloom = false;
        params.bloom_strength = 2.5;
        let off = PostUniforms::from_params(&params);
        assert_eq!(off.bloom, 0.0);
        assert_eq!(off.strength, 2.5);
    }

    #[test]
    fn test_aces_curve() {
        assert_eq!(aces_filmic(0.0), 0.0);
        assert_eq!(aces_filmic(100.0), 1.0);
        let mut last = 0.0;
        for i in 1..200 {
            let y = aces_filmic(i as f32 * 0.05);
            assert!(y >= last);
            last = y;
        }
    }

    #[test]
    fn test_soft_threshold() {
        let knee = BLOOM_THRESHOLD * BLOOM_SOFT_KNEE;
        // Well below the knee contributes nothing
        assert_eq!(soft_threshold(Vec3::splat(0.01), BLOOM_THRESHOLD, knee), Vec3::ZERO);
        // Bright pixels lose roughly the threshold
        let bright = soft_threshold(Vec3::new(2.0, 1.0, 0.5), BLOOM_THRESHOLD, knee);
        assert!((bright.x - 1.9).abs() < 1e-3);
        // Inside the knee the response is partial
        let mid = soft_threshold(Vec3::splat(0.1), BLOOM_THRESHOLD, knee);
        assert!(mid.x > 0.0 && mid.x < 0.1);
    }

    #[test]
    fn test_bloom_mip_sizes() {
        assert_eq!(bloom_mip_size(1280, 720, 0), (640, 360));
        assert_eq!(bloom_mip_size(1280, 720, 4), (40, 22));
        assert_eq!(bloom_mip_size(3, 3, 4), (1, 1));
    }
}
