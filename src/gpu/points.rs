//! GPU side of the particle cloud.
//!
//! Holds the instanced vertex buffers, uniform buffers and the sprite
//! pipeline, and mirrors a [`ParticleSystem`] onto them in [`sync`].
//!
//! [`sync`]: PointCloudRenderer::sync

use tracing::debug;
use wgpu::util::DeviceExt;

use crate::cloud::PointField;
use crate::shader::{FRAGMENT_ENTRY, POINTS_WGSL, VERTEX_ENTRY};
use crate::system::ParticleSystem;
use crate::uniforms::CameraUniforms;

/// Vertices emitted per sprite quad.
pub const VERTICES_PER_POINT: u32 = 6;

/// Additive blending for glowing sprites: color `src * src_alpha + dst`,
/// alpha `src + dst`.
pub const ADDITIVE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

const VEC3_STRIDE: wgpu::BufferAddress = 12;

struct PointBuffers {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    count: u32,
}

impl PointBuffers {
    fn upload(device: &wgpu::Device, field: &PointField) -> Self {
        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Positions"),
            contents: bytemuck::cast_slice(field.position_floats()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Colors"),
            contents: bytemuck::cast_slice(field.color_floats()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            positions,
            colors,
            count: field.len() as u32,
        }
    }

    fn destroy(&self) {
        self.positions.destroy();
        self.colors.destroy();
    }
}

/// Renders a [`ParticleSystem`] as additive point sprites.
pub struct PointCloudRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    cloud_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    buffers: PointBuffers,
    generation: u64,
}

impl PointCloudRenderer {
    /// Create the pipeline and upload the system's current buffers.
    ///
    /// `target_format` is the format of the texture the sprites are drawn
    /// into (the HDR scene target).
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        system: &ParticleSystem,
    ) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::bytes_of(&CameraUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let cloud_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cloud Uniform Buffer"),
            contents: bytemuck::bytes_of(system.uniforms()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Point Cloud Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX),
                uniform_entry(1, wgpu::ShaderStages::VERTEX),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point Cloud Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: cloud_buffer.as_entire_binding(),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Cloud Shader"),
            source: wgpu::ShaderSource::Wgsl(POINTS_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Cloud Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Cloud Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: VEC3_STRIDE,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3, // rest position
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: VEC3_STRIDE,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3, // color
                        }],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(ADDITIVE_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Sprites are order-independent under additive blending
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_buffer,
            cloud_buffer,
            bind_group,
            buffers: PointBuffers::upload(device, system.field()),
            generation: system.generation(),
        }
    }

    /// Bring the GPU copies up to date with `system`.
    ///
    /// A new generation replaces both vertex buffers; the old ones are
    /// destroyed before the new ones are used. Dirty colors are rewritten in
    /// place. The cloud uniforms are written every call.
    pub fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, system: &mut ParticleSystem) {
        if system.generation() != self.generation {
            let replacement = PointBuffers::upload(device, system.field());
            let previous = std::mem::replace(&mut self.buffers, replacement);
            previous.destroy();
            self.generation = system.generation();
            // Fresh buffers already carry the current colors
            system.take_colors_dirty();
            debug!(
                generation = self.generation,
                points = self.buffers.count,
                "replaced point buffers"
            );
        } else if system.take_colors_dirty() {
            queue.write_buffer(
                &self.buffers.colors,
                0,
                bytemuck::cast_slice(system.field().color_floats()),
            );
        }

        queue.write_buffer(&self.cloud_buffer, 0, bytemuck::bytes_of(system.uniforms()));
    }

    /// Upload the camera matrices and viewport.
    pub fn write_camera(&self, queue: &wgpu::Queue, camera: &CameraUniforms) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(camera));
    }

    /// Record the sprite draw into an open render pass.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.buffers.positions.slice(..));
        render_pass.set_vertex_buffer(1, self.buffers.colors.slice(..));
        render_pass.draw(0..VERTICES_PER_POINT, 0..self.buffers.count);
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
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

    #[test]
    fn test_vec3_stride_matches_field_layout() {
        assert_eq!(VEC3_STRIDE as usize, std::mem::size_of::<glam::Vec3>());
    }

    #[test]
    fn test_additive_blend_factors() {
        assert_eq!(ADDITIVE_BLEND.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(ADDITIVE_BLEND.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(ADDITIVE_BLEND.alpha.src_factor, wgpu::BlendFactor::One);
        assert_eq!(ADDITIVE_BLEND.alpha.dst_factor, wgpu::BlendFactor::One);
    }
}
