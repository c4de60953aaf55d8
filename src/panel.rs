//! The "Particle Controls" window.
//!
//! The panel only edits [`Params`]; the viewer compares the result with the
//! previous frame's parameters and decides whether to rebuild, recolor or do
//! nothing. The point count is the exception: its slider is staged in
//! [`PendingCount`] so a rebuild happens once when the drag ends, not on
//! every intermediate value.

use crate::palette::Palette;
use crate::params::{
    self, Params, BLOOM_STRENGTH_RANGE, CAMERA_DISTANCE_RANGE, COUNT_RANGE, COUNT_STEP, FOV_RANGE,
    SIZE_RANGE, SPEED_RANGE, TURBULENCE_RANGE,
};

/// Slider value that is only committed when the user lets go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCount {
    value: u32,
    dragging: bool,
}

impl PendingCount {
    pub fn new(count: u32) -> Self {
        Self {
            value: count,
            dragging: false,
        }
    }

    /// Value shown by the slider.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Record the slider state after a frame and return the count to commit,
    /// if any. Keyboard and click edits commit immediately.
    pub fn settle(&mut self, value: u32, changed: bool, dragged: bool, drag_stopped: bool) -> Option<u32> {
        self.value = value;
        if dragged {
            self.dragging = true;
            None
        } else if drag_stopped || (changed && !self.dragging) {
            self.dragging = false;
            Some(value)
        } else {
            None
        }
    }

    /// Follow an externally changed count while no drag is in progress.
    pub fn follow(&mut self, count: u32) {
        if !self.dragging {
            self.value = count;
        }
    }
}

/// Control panel state that outlives a frame.
#[derive(Debug)]
pub struct ControlPanel {
    count: PendingCount,
}

impl ControlPanel {
    pub fn new(params: &Params) -> Self {
        Self {
            count: PendingCount::new(params.count),
        }
    }

    /// Draw the panel and apply edits to `params`.
    pub fn show(&mut self, ctx: &egui::Context, params: &mut Params, fps: f32) {
        self.count.follow(params.count);

        egui::Window::new("Particle Controls")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Particles");
                ui.separator();

                let mut count = self.count.value();
                let response = ui.add(
                    egui::Slider::new(&mut count, COUNT_RANGE)
                        .step_by(COUNT_STEP as f64)
                        .text("Count"),
                );
                if let Some(committed) = self.count.settle(
                    count,
                    response.changed(),
                    response.dragged(),
                    response.drag_stopped(),
                ) {
                    params.count = committed;
                }

                ui.add(egui::Slider::new(&mut params.size, SIZE_RANGE).text("Size"));
                ui.add(egui::Slider::new(&mut params.speed, SPEED_RANGE).text("Speed"));
                ui.add(egui::Slider::new(&mut params.turbulence, TURBULENCE_RANGE).text("Turbulence"));

                egui::ComboBox::from_label("Color Palette")
                    .selected_text(params.palette.name())
                    .show_ui(ui, |ui| {
                        for palette in Palette::ALL {
                            ui.selectable_value(&mut params.palette, palette, palette.name());
                        }
                    });

                if ui.button("Randomize Seed").clicked() {
                    params.seed = params::random_seed();
                }
                ui.label(format!("Seed: {}", params.seed));

                ui.add_space(6.0);
                ui.heading("Visuals");
                ui.separator();

                ui.checkbox(&mut params.bloom, "Bloom / Glow");
                ui.add_enabled(
                    params.bloom,
                    egui::Slider::new(&mut params.bloom_strength, BLOOM_STRENGTH_RANGE)
                        .text("Bloom Strength"),
                );
                ui.horizontal(|ui| {
                    ui.label("Background:");
                    egui::color_picker::color_edit_button_srgb(ui, &mut params.bg_color);
                });

                ui.add_space(6.0);
                egui::CollapsingHeader::new("Camera")
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.add(
                            egui::Slider::new(&mut params.camera_distance, CAMERA_DISTANCE_RANGE)
                                .step_by(0.5)
                                .clamping(egui::SliderClamping::Edits)
                                .text("Distance"),
                        );
                        ui.add(egui::Slider::new(&mut params.fov, FOV_RANGE).text("FOV"));
                        ui.checkbox(&mut params.auto_rotate, "Auto-rotate");
                    });

                ui.separator();
                ui.label("Drag to orbit • Scroll to zoom");
                ui.label(format!("{:.0} fps", fps));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_commits_once_on_release() {
        let mut pending = PendingCount::new(15_000);
        assert_eq!(pending.settle(20_000, true, true, false), None);
        assert_eq!(pending.settle(30_000, true, true, false), None);
        assert_eq!(pending.value(), 30_000);
        assert_eq!(pending.settle(30_000, false, false, true), Some(30_000));
        assert_eq!(pending.settle(30_000, false, false, false), None);
    }

    #[test]
    fn test_click_commits_immediately() {
        let mut pending = PendingCount::new(15_000);
        assert_eq!(pending.settle(15_500, true, false, false), Some(15_500));
    }

    #[test]
    fn test_follow_ignored_while_dragging() {
        let mut pending = PendingCount::new(15_000);
        pending.settle(40_000, true, true, false);
        pending.follow(15_000);
        assert_eq!(pending.value(), 40_000);

        pending.settle(40_000, false, false, true);
        pending.follow(500);
        assert_eq!(pending.value(), 500);
    }
}
