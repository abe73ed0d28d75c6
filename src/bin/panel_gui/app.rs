//! Main GUI application

use crate::state::PanelState;
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use motion_viewfinder::{PermissionStatus, SamplingInterval};
use std::sync::mpsc::TryRecvError;

/// Panel button colors (match the original screen design)
const ACTIVE_GREEN: egui::Color32 = egui::Color32::from_rgb(0x4c, 0xaf, 0x50);
const INACTIVE_RED: egui::Color32 = egui::Color32::from_rgb(0xf4, 0x43, 0x36);

/// Trace window shown under the readout, in seconds
const PLOT_WINDOW_SECS: f64 = 10.0;

/// Main application struct
pub struct PanelApp {
    state: PanelState,
    preview: Option<egui::TextureHandle>,
}

impl PanelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: PanelState::new(),
            preview: None,
        }
    }

    /// Drain pending samples into the current-reading state
    fn poll_samples(&mut self) {
        loop {
            match self.state.samples.try_recv() {
                Ok(sample) => {
                    let timestamp = self.state.started.elapsed().as_secs_f64();
                    self.state.latest = sample;
                    self.state.history.push(timestamp, sample);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Regenerate the preview frame and upload it as a texture
    fn update_preview(&mut self, ctx: &egui::Context) {
        let frame = self
            .state
            .camera
            .frame(self.state.facing, self.state.started.elapsed());
        let image =
            egui::ColorImage::from_rgba_unmultiplied([frame.width, frame.height], &frame.pixels);

        match &mut self.preview {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview =
                    Some(ctx.load_texture("camera-preview", image, egui::TextureOptions::LINEAR))
            }
        }
    }

    /// Camera area: permission prompt until granted, then the live preview
    fn render_camera(&mut self, ui: &mut egui::Ui) {
        if !self.state.permissions.status().is_granted() {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.4);
                ui.label(
                    egui::RichText::new("We need your permission to show the camera").size(18.0),
                );
                if self.state.permissions.status() == PermissionStatus::Denied {
                    ui.label("Camera permission was denied");
                }
                ui.add_space(8.0);
                if ui.button("Grant Permission").clicked() {
                    self.state.permissions.request();
                }
            });
            return;
        }

        let button_height = 36.0;
        if let Some(texture) = &self.preview {
            let size = egui::vec2(
                ui.available_width(),
                (ui.available_height() - button_height - 8.0).max(0.0),
            );
            ui.add(egui::Image::new(texture).max_size(size));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add(egui::Button::new(
                    egui::RichText::new("Flip Camera").strong(),
                ))
                .clicked()
            {
                self.state.facing = self.state.facing.flipped();
            }
            ui.label(format!("Facing: {}", self.state.facing));
        });
    }

    /// Accelerometer panel: readout, subscription toggle, rate presets, trace
    fn render_sensor_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.monospace("Accelerometer: (in gs where 1g = 9.81 m/s^2)");
        ui.monospace(format!("x: {:+.3}", self.state.latest.x));
        ui.monospace(format!("y: {:+.3}", self.state.latest.y));
        ui.monospace(format!("z: {:+.3}", self.state.latest.z));
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            let active = self.state.controller.is_active();
            let (label, fill) = if active {
                ("On", ACTIVE_GREEN)
            } else {
                ("Off", INACTIVE_RED)
            };
            let toggle = egui::Button::new(
                egui::RichText::new(label).strong().color(egui::Color32::WHITE),
            )
            .fill(fill)
            .min_size(egui::vec2(64.0, 28.0));

            if ui.add(toggle).clicked() {
                if active {
                    self.state.controller.stop();
                } else {
                    self.state.controller.start();
                }
            }

            if ui.button("Slow").clicked() {
                self.state.controller.set_interval(SamplingInterval::Slow);
            }
            if ui.button("Fast").clicked() {
                self.state.controller.set_interval(SamplingInterval::Fast);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{} ms", self.state.stream.update_interval()));
            });
        });

        ui.add_space(4.0);
        self.render_trace(ui);
    }

    /// Rolling x/y/z trace of recent samples
    fn render_trace(&mut self, ui: &mut egui::Ui) {
        if self.state.history.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("Waiting for data...");
            });
            return;
        }
        let samples = self.state.history.window(PLOT_WINDOW_SECS);

        let plot = Plot::new("accel_trace")
            .height(ui.available_height())
            .allow_zoom(false)
            .allow_drag(false)
            .include_y(-2.0)
            .include_y(2.0)
            .x_axis_label("Time (s)")
            .legend(Legend::default());

        plot.show(ui, |plot_ui| {
            let colors = [
                egui::Color32::from_rgb(255, 100, 100),
                egui::Color32::from_rgb(100, 255, 100),
                egui::Color32::from_rgb(100, 100, 255),
            ];
            let labels = ["X", "Y", "Z"];

            for (i, (label, color)) in labels.iter().zip(colors).enumerate() {
                let points: PlotPoints = samples
                    .iter()
                    .map(|(timestamp, sample)| {
                        let value = [sample.x, sample.y, sample.z][i];
                        [*timestamp, value as f64]
                    })
                    .collect();
                plot_ui.line(Line::new(points).name(*label).color(color).width(1.5));
            }
        });
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_samples();

        if self.state.permissions.status().is_granted() {
            self.update_preview(ctx);
        }

        egui::TopBottomPanel::bottom("sensor_panel")
            .exact_height(280.0)
            .show(ctx, |ui| self.render_sensor_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.render_camera(ui));

        // Preview and readings are live; keep painting.
        ctx.request_repaint();
    }
}
