//! Viewer builder and runner.
//!
//! [`Viewer`] collects the startup configuration; [`Viewer::run`] opens the
//! window and drives the frame loop. The loop owns the [`Params`] record and
//! is the only place that calls the particle system's lifecycle operations:
//! panel and keyboard edits are compared against the last applied
//! parameters and routed to `rebuild`, `update_colors`, or nothing, and
//! `update` runs every frame.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::ViewerError;
use crate::gpu::{GpuState, OrbitCamera};
use crate::input::{Input, Shortcut};
#[cfg(feature = "egui")]
use crate::panel::ControlPanel;
use crate::palette::Palette;
use crate::params::{self, ParamChange, Params};
use crate::system::ParticleSystem;
use crate::time::Time;

/// A particle cloud viewer.
///
/// Use method chaining to configure, then call `.run()` to start.
///
/// ```ignore
/// use nebula::prelude::*;
///
/// Viewer::new()
///     .with_count(30_000)
///     .with_palette(Palette::Ocean)
///     .run()?;
/// ```
#[derive(Debug, Clone)]
pub struct Viewer {
    params: Params,
    title: String,
    window_size: (u32, u32),
}

impl Viewer {
    /// Default parameters with a random seed.
    pub fn new() -> Self {
        Self {
            params: Params::with_random_seed(),
            title: "Nebula".to_string(),
            window_size: (1280, 720),
        }
    }

    /// Replace all parameters. Values are clamped to the panel ranges.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params.clamped();
        self
    }

    /// Set the number of points.
    pub fn with_count(mut self, count: u32) -> Self {
        self.params.count = count;
        self.params = self.params.clamped();
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.params.seed = seed;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.params.palette = palette;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    /// The parameters the viewer will start with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        info!(
            count = self.params.count,
            seed = self.params.seed,
            palette = %self.params.palette,
            bloom = self.params.bloom,
            "starting viewer"
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    title: String,
    window_size: (u32, u32),
    params: Params,
    /// Parameters as of the last lifecycle dispatch.
    applied: Params,
    system: ParticleSystem,
    camera: OrbitCamera,
    time: Time,
    input: Input,
    #[cfg(feature = "egui")]
    panel: ControlPanel,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    error: Option<ViewerError>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        let params = viewer.params;
        let mut camera = OrbitCamera::new(params.camera_distance, params.fov);
        camera.auto_rotate = params.auto_rotate;

        Self {
            title: viewer.title,
            window_size: viewer.window_size,
            system: ParticleSystem::new(&params),
            camera,
            time: Time::new(),
            input: Input::new(),
            #[cfg(feature = "egui")]
            panel: ControlPanel::new(&params),
            applied: params.clone(),
            params,
            window: None,
            gpu: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        error!(error = %err, "viewer initialization failed");
        self.error = Some(err);
        event_loop.exit();
    }

    fn apply_shortcut(&mut self, event_loop: &ActiveEventLoop, shortcut: Shortcut) {
        match shortcut {
            Shortcut::RandomizeSeed => self.params.seed = params::random_seed(),
            Shortcut::NextPalette => self.params.palette = self.params.palette.next(),
            Shortcut::ToggleBloom => self.params.bloom = !self.params.bloom,
            Shortcut::ToggleAutoRotate => self.params.auto_rotate = !self.params.auto_rotate,
            Shortcut::TogglePause => {
                self.time.toggle_pause();
                debug!(paused = self.time.is_paused(), "toggled pause");
            }
            Shortcut::Quit => event_loop.exit(),
        }
    }

    /// Route parameter edits since the last frame to the particle system and
    /// the camera.
    fn apply_params(&mut self) {
        match self.params.change_from(&self.applied) {
            ParamChange::Rebuild => self.system.rebuild(&self.params),
            ParamChange::Recolor => self.system.update_colors(&self.params),
            ParamChange::Live | ParamChange::None => {}
        }

        if self.params.camera_distance != self.applied.camera_distance {
            self.camera.set_distance(self.params.camera_distance);
        }
        self.camera.fov = self.params.fov;
        self.camera.auto_rotate = self.params.auto_rotate;

        self.applied = self.params.clone();
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (elapsed, delta) = self.time.update();

        let shortcuts: Vec<Shortcut> = self.input.shortcuts().collect();
        for shortcut in shortcuts {
            self.apply_shortcut(event_loop, shortcut);
        }

        let viewport_height = self.gpu.as_ref().map_or(1, |gpu| gpu.height()) as f32;
        self.camera.drag(self.input.drag_delta(), viewport_height);
        if self.input.scroll_delta() != 0.0 {
            self.camera.zoom(self.input.scroll_delta());
            self.params.camera_distance = self.camera.distance;
            self.applied.camera_distance = self.camera.distance;
        }
        self.input.begin_frame();

        #[cfg(feature = "egui")]
        let ui = match (self.gpu.as_mut(), self.window.as_ref()) {
            (Some(gpu), Some(window)) => {
                let fps = self.time.fps();
                let panel = &mut self.panel;
                let params = &mut self.params;
                Some(gpu.egui_mut().run(window, |ctx| panel.show(ctx, params, fps)))
            }
            _ => None,
        };

        self.apply_params();
        self.camera.update(delta);
        self.system.update(&self.params, elapsed);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        #[cfg(feature = "egui")]
        let result = gpu.render(&mut self.system, &self.camera, &self.params, ui.as_ref());
        #[cfg(not(feature = "egui"))]
        let result = gpu.render(&mut self.system, &self.camera, &self.params);

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost or outdated, reconfiguring");
                gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => warn!(error = %e, "skipping frame"),
        }
    }
}

/// Press or release state of a key or mouse button event.
fn element_state(event: &WindowEvent) -> Option<ElementState> {
    match event {
        WindowEvent::MouseInput { state, .. } => Some(*state),
        WindowEvent::KeyboardInput { event, .. } => Some(event.state),
        _ => None,
    }
}

/// Whether an event the panel may have consumed still reaches [`Input`].
/// Releases always do, so nothing stays held.
fn reaches_input(consumed: bool, state: Option<ElementState>) -> bool {
    !consumed || state == Some(ElementState::Released)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        match pollster::block_on(GpuState::new(window.clone(), &self.system)) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                self.window = Some(window);
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        let consumed = match (self.gpu.as_mut(), self.window.as_ref()) {
            (Some(gpu), Some(window)) => {
                let consumed = gpu.egui_mut().on_window_event(window, &event);
                let pointer = matches!(
                    event,
                    WindowEvent::MouseInput { state: ElementState::Pressed, .. }
                        | WindowEvent::MouseWheel { .. }
                );
                consumed || (pointer && gpu.egui().wants_pointer())
            }
            _ => false,
        };
        #[cfg(not(feature = "egui"))]
        let consumed = false;

        if reaches_input(consumed, element_state(&event)) {
            self.input.handle_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
