//! UI rendering methods for the Rail Map application.

use crate::RailMapApp;
use crate::overlays::{
    draw_background, draw_firewood_depots, draw_frames, draw_players, draw_splines,
    draw_switches, draw_turntables, draw_water_towers,
};
use eframe::egui;
use rail_map::{MapView, ModeStore, ModeUpdate, WheelInput};
use std::time::Instant;

impl RailMapApp {
    /// Handles keyboard shortcuts for zoom, follow and mode switching.
    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        let Some(view) = self.view.as_mut() else {
            return;
        };

        let (zoom_in, zoom_out, fit, follow, stop, cycle_mode, toggle_transparent) =
            ctx.input(|i| {
                (
                    i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals),
                    i.key_pressed(egui::Key::Minus),
                    i.key_pressed(egui::Key::Num0),
                    i.key_pressed(egui::Key::F),
                    i.key_pressed(egui::Key::Escape),
                    i.key_pressed(egui::Key::M),
                    i.key_pressed(egui::Key::T),
                )
            });

        if zoom_in {
            view.zoom_in();
        }
        if zoom_out {
            view.zoom_out();
        }
        if fit {
            view.fit();
        }
        if follow {
            view.toggle_follow(&self.world);
        }
        if stop {
            view.stop_following();
        }

        let current = view.mode();
        if cycle_mode {
            self.modes.broadcast(ModeUpdate {
                mode: current.mode.next(),
                ..current
            });
        }
        if toggle_transparent {
            self.modes.broadcast(ModeUpdate {
                transparent: !current.transparent,
                ..current
            });
        }
    }

    /// Renders the bottom status bar with controls hint and follow status.
    pub fn show_status_bar(&self, ctx: &egui::Context) {
        if self.view.as_ref().is_some_and(MapView::is_minimap) {
            return;
        }

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(crate::constants::STATUS_BAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Scroll: Zoom | Drag: Pan | +/-: Zoom | 0: Fit | F: Follow | M: Mode");

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let Some(view) = &self.view else {
                            return;
                        };
                        ui.label(format!("Zoom: {:.1}x", view.engine().zoom_level()));
                        if let Some(target) = view.following() {
                            let state = if target.is_resolved() { "" } else { " (waiting)" };
                            ui.label(format!(
                                "Following {:?} #{}{state}",
                                target.kind, target.index
                            ));
                        }
                    });
                });
            });
    }

    /// Renders the central panel containing the map view.
    pub fn show_central_panel(&mut self, ctx: &egui::Context) {
        let frame = if self.is_transparent() {
            egui::Frame::NONE
        } else {
            egui::Frame::central_panel(&ctx.style())
        };

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let panel_rect = ui.max_rect();
            self.show_map(ui);
            self.show_map_controls(ctx, panel_rect);
        });
    }

    /// Renders the floating zoom/follow controls.
    fn show_map_controls(&mut self, ctx: &egui::Context, panel_rect: egui::Rect) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        if view.is_minimap() {
            return;
        }

        let margin = 12.0;
        let panel_width = 48.0;
        let anchor_pos = egui::pos2(panel_rect.right() - panel_width - margin, panel_rect.top() + margin);
        let world = &self.world;

        egui::Area::new(egui::Id::new("map_controls"))
            .fixed_pos(anchor_pos)
            .interactable(true)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(ui.style().visuals.window_fill.gamma_multiply(0.95))
                    .show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            if ui.button("+").on_hover_text("Zoom In").clicked() {
                                view.zoom_in();
                            }
                            if ui.button("-").on_hover_text("Zoom Out").clicked() {
                                view.zoom_out();
                            }
                            if ui.button("Fit").on_hover_text("Reset view (0)").clicked() {
                                view.fit();
                            }
                            if !world.players.is_empty() {
                                let (label, hint) = if view.following().is_some() {
                                    ("Stop", "Stop Following")
                                } else {
                                    ("Follow", "Follow Player")
                                };
                                if ui.button(label).on_hover_text(hint).clicked() {
                                    view.toggle_follow(world);
                                }
                            }
                        });
                    });
            });
    }

    /// Renders the map and feeds it this frame's input.
    fn show_map(&mut self, ui: &mut egui::Ui) {
        let (host, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let now = Instant::now();

        // The view needs a measured host, so it is created on the first frame.
        let view = self.view.get_or_insert_with(|| {
            MapView::new(
                self.metrics,
                self.viewport_config,
                host,
                ModeStore::new(self.launch_mode, self.modes.subscribe()),
                now,
            )
        });

        view.poll_mode(&self.world);
        view.handle_resize(host, &self.world);
        view.sync_target(&self.world);

        // Wheel
        let hover_pos = ui.input(|i| i.pointer.hover_pos());
        let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
        if scroll_delta != 0.0
            && let Some(pointer) = hover_pos.filter(|p| host.contains(*p))
        {
            // egui reports scrolling up as positive; the gesture expects the
            // opposite sign.
            view.handle_wheel(
                WheelInput {
                    delta_y: Some(-scroll_delta),
                    pointer,
                },
                now,
            );
        }

        // Drag panning
        if response.dragged() {
            view.handle_drag(response.drag_delta());
        }

        let painter = ui.painter_at(host);
        let world = &self.world;

        draw_background(&painter, view);
        draw_splines(&painter, view, &world.splines, false);
        draw_splines(&painter, view, &world.splines, true);
        draw_turntables(&painter, view, &world.turntables);
        draw_switches(&painter, view, &world.switches);
        draw_firewood_depots(&painter, view, &world.industries);
        draw_water_towers(&painter, view, &world.water_towers);
        draw_frames(&painter, view, &world.frames);
        draw_players(&painter, view, &world.players);
    }
}
