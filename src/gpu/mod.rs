//! GPU device, surface and per-frame rendering.
//!
//! A frame is encoded in a fixed order: sprites into the HDR scene target,
//! the bloom chain, the tone-mapped composite onto the swapchain, and, with
//! the `egui` feature, the control panel on top.

pub mod camera;
#[cfg(feature = "egui")]
pub mod egui_integration;
pub mod points;
pub mod post_process;

use std::sync::Arc;

use tracing::info;
use winit::window::Window;

pub use camera::OrbitCamera;
#[cfg(feature = "egui")]
pub use egui_integration::{EguiFrameOutput, EguiIntegration};
pub use points::PointCloudRenderer;
pub use post_process::{PostProcess, PostUniforms};

use crate::error::GpuError;
use crate::params::Params;
use crate::system::ParticleSystem;

/// Everything the viewer needs to put a frame on screen.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    points: PointCloudRenderer,
    post: PostProcess,
    #[cfg(feature = "egui")]
    egui: EguiIntegration,
}

impl GpuState {
    /// Set up the device and surface for `window` and upload `system`.
    pub async fn new(window: Arc<Window>, system: &ParticleSystem) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "selected GPU adapter"
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoAdapter)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        info!(
            format = ?config.format,
            width = config.width,
            height = config.height,
            "configured surface"
        );

        let points = PointCloudRenderer::new(&device, post_process::HDR_FORMAT, system);
        let post = PostProcess::new(&device, config.format, config.width, config.height);

        #[cfg(feature = "egui")]
        let egui = EguiIntegration::new(&device, config.format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            points,
            post,
            #[cfg(feature = "egui")]
            egui,
        })
    }

    /// Reconfigure the surface and recreate size-dependent targets.
    ///
    /// Zero-sized windows (minimized) are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.post.resize(&self.device, new_size.width, new_size.height);
        }
    }

    /// Reconfigure the surface at its current size after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    #[cfg(feature = "egui")]
    pub fn egui(&self) -> &EguiIntegration {
        &self.egui
    }

    #[cfg(feature = "egui")]
    pub fn egui_mut(&mut self) -> &mut EguiIntegration {
        &mut self.egui
    }

    /// Sync `system` to the GPU and draw one frame.
    pub fn render(
        &mut self,
        system: &mut ParticleSystem,
        camera: &OrbitCamera,
        params: &Params,
        #[cfg(feature = "egui")] ui: Option<&EguiFrameOutput>,
    ) -> Result<(), wgpu::SurfaceError> {
        self.points.sync(&self.device, &self.queue, system);
        self.points
            .write_camera(&self.queue, &camera.uniforms(self.config.width, self.config.height));
        self.post
            .write_uniforms(&self.queue, &PostUniforms::from_params(params));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b] = params.bg_color_linear();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.post.scene_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.points.draw(&mut render_pass);
        }

        self.post.encode(&mut encoder, &view, params.bloom);

        #[cfg(feature = "egui")]
        if let Some(ui) = ui {
            self.egui.render(
                &self.device,
                &self.queue,
                &mut encoder,
                &view,
                ui,
                [self.config.width, self.config.height],
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
