//! Pan/zoom state for the map canvas.
//!
//! Screen position of a canvas point is `host.min + pan + canvas * scale`, where
//! `scale = fit_scale * zoom`. A zoom of 1.0 shows the whole projected map inside
//! the host box.

use eframe::egui;

/// Tunables for a [`ViewportEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Zoom applied right after the initial fit, if any.
    pub initial_zoom: Option<f32>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 100.0,
            initial_zoom: None,
        }
    }
}

/// Owns the zoom level and pan offset of the map canvas.
///
/// Nothing outside this type mutates the view; callers go through the
/// operations below, which all become no-ops once the engine is destroyed.
#[derive(Debug)]
pub struct ViewportEngine {
    config: ViewportConfig,
    canvas_size: egui::Vec2,
    host: egui::Rect,
    fit_scale: f32,
    zoom: f32,
    pan: egui::Vec2,
    pan_enabled: bool,
    zoom_enabled: bool,
    destroyed: bool,
}

impl ViewportEngine {
    /// Creates an engine showing the whole `canvas_size` map centered in `host`.
    pub fn new(config: ViewportConfig, canvas_size: egui::Vec2, host: egui::Rect) -> Self {
        let mut engine = Self {
            config,
            canvas_size,
            host,
            fit_scale: 1.0,
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
            pan_enabled: true,
            zoom_enabled: true,
            destroyed: false,
        };
        engine.reset();
        if let Some(level) = config.initial_zoom {
            engine.zoom(level);
        }
        engine
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom
    }

    /// Screen pixels per canvas unit.
    pub fn scale(&self) -> f32 {
        self.fit_scale * self.zoom
    }

    pub fn pan(&self) -> egui::Vec2 {
        self.pan
    }

    /// Host box as of the last [`resize`](Self::resize).
    pub fn host_rect(&self) -> egui::Rect {
        self.host
    }

    pub fn is_pan_enabled(&self) -> bool {
        self.pan_enabled
    }

    pub fn is_zoom_enabled(&self) -> bool {
        self.zoom_enabled
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn enable_pan(&mut self) {
        self.pan_enabled = true;
    }

    pub fn disable_pan(&mut self) {
        self.pan_enabled = false;
    }

    pub fn enable_zoom(&mut self) {
        self.zoom_enabled = true;
    }

    pub fn disable_zoom(&mut self) {
        self.zoom_enabled = false;
    }

    /// Multiplies the zoom level, keeping the host center fixed.
    pub fn zoom_by(&mut self, factor: f32) {
        let center = (self.host.size() / 2.0).to_pos2();
        self.zoom_at_point(factor, center);
    }

    /// Multiplies the zoom level, keeping `point` (host-local) fixed on screen.
    ///
    /// The canvas point under `point` before the call is still under it after,
    /// including when the requested level gets clamped.
    pub fn zoom_at_point(&mut self, factor: f32, point: egui::Pos2) {
        if self.destroyed || !self.zoom_enabled || !(factor.is_finite() && factor > 0.0) {
            return;
        }

        let new_zoom = (self.zoom * factor).clamp(self.config.min_zoom, self.config.max_zoom);
        let ratio = new_zoom / self.zoom;
        let anchor = point.to_vec2();

        self.pan = anchor - (anchor - self.pan) * ratio;
        self.zoom = new_zoom;
    }

    /// Sets an absolute zoom level around the host center.
    pub fn zoom(&mut self, level: f32) {
        if level > 0.0 {
            self.zoom_by(level / self.zoom);
        }
    }

    /// User panning; ignored while pan is disabled.
    pub fn pan_by(&mut self, delta: egui::Vec2) {
        if self.pan_enabled {
            self.translate(delta);
        }
    }

    /// Moves the view regardless of the pan flag. Used by the follow camera,
    /// which owns panning while user panning is disabled.
    pub fn translate(&mut self, delta: egui::Vec2) {
        if !self.destroyed {
            self.pan += delta;
        }
    }

    /// Records a freshly measured host box. The pan offset is relative to the
    /// host's top-left corner, so the map moves with the host.
    pub fn resize(&mut self, host: egui::Rect) {
        if self.destroyed {
            return;
        }
        if host != self.host {
            log::debug!(
                "Viewport host resized: {:.0}x{:.0} -> {:.0}x{:.0}",
                self.host.width(),
                self.host.height(),
                host.width(),
                host.height()
            );
        }
        self.host = host;
    }

    /// Scales the map so it fits the host at zoom 1.0.
    pub fn fit(&mut self) {
        if self.destroyed {
            return;
        }
        let host = self.host.size();
        let fit = (host.x / self.canvas_size.x).min(host.y / self.canvas_size.y);
        self.fit_scale = if fit.is_finite() && fit > 0.0 { fit } else { 1.0 };
        self.zoom = 1.0;
    }

    /// Centers the map in the host at the current zoom.
    pub fn center(&mut self) {
        if self.destroyed {
            return;
        }
        self.pan = (self.host.size() - self.canvas_size * self.scale()) / 2.0;
    }

    /// Fit, then center.
    pub fn reset(&mut self) {
        self.fit();
        self.center();
    }

    /// Converts a screen position into host-local coordinates.
    pub fn host_local(&self, screen: egui::Pos2) -> egui::Pos2 {
        (screen - self.host.min).to_pos2()
    }

    pub fn canvas_to_screen(&self, canvas: egui::Pos2) -> egui::Pos2 {
        self.host.min + self.pan + canvas.to_vec2() * self.scale()
    }

    pub fn screen_to_canvas(&self, screen: egui::Pos2) -> egui::Pos2 {
        ((screen - self.host.min - self.pan) / self.scale()).to_pos2()
    }

    pub fn canvas_rect_to_screen(&self, rect: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.canvas_to_screen(rect.min),
            self.canvas_to_screen(rect.max),
        )
    }

    /// Screen rectangle covered by the whole projected map.
    pub fn map_rect(&self) -> egui::Rect {
        self.canvas_rect_to_screen(egui::Rect::from_min_size(egui::Pos2::ZERO, self.canvas_size))
    }

    /// Tears the engine down. Returns `false` if it was already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.pan_enabled = false;
        self.zoom_enabled = false;
        log::debug!("Viewport engine destroyed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(width: f32, height: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(width, height))
    }

    fn engine() -> ViewportEngine {
        ViewportEngine::new(
            ViewportConfig::default(),
            egui::vec2(8000.0, 8000.0),
            host(800.0, 600.0),
        )
    }

    fn assert_close(actual: egui::Pos2, expected: egui::Pos2, tolerance: f32) {
        let diff = (actual - expected).length();
        assert!(
            diff <= tolerance,
            "expected {expected:?}, got {actual:?} (diff: {diff})"
        );
    }

    #[test]
    fn starts_fitted_and_centered() {
        let engine = engine();

        assert_eq!(engine.zoom_level(), 1.0);
        assert!((engine.scale() - 0.075).abs() < 1e-6);
        let map = engine.map_rect();
        assert_close(map.center(), engine.host_rect().center(), 1e-3);
        assert!((map.height() - 600.0).abs() < 1e-3);
    }

    #[test]
    fn initial_zoom_override_is_applied_after_fit() {
        let config = ViewportConfig {
            initial_zoom: Some(20.0),
            ..ViewportConfig::default()
        };
        let engine = ViewportEngine::new(config, egui::vec2(8000.0, 8000.0), host(800.0, 600.0));

        assert_eq!(engine.zoom_level(), 20.0);
        assert_close(
            engine.screen_to_canvas(engine.host_rect().center()),
            egui::pos2(4000.0, 4000.0),
            0.05,
        );
    }

    #[test]
    fn zoom_at_point_keeps_the_canvas_point_under_the_cursor() {
        for factor in [0.01, 0.3, 0.9, 1.0, 1.1, 2.5, 10.0, 100.0] {
            let mut engine = engine();
            engine.zoom(3.0);
            engine.pan_by(egui::vec2(-37.0, 12.5));

            let point = egui::pos2(612.0, 143.0);
            let screen = engine.host_rect().min + point.to_vec2();
            let before = engine.screen_to_canvas(screen);

            engine.zoom_at_point(factor, point);

            let after = engine.screen_to_canvas(screen);
            assert_close(after, before, 0.05);
        }
    }

    #[test]
    fn zoom_is_clamped() {
        let mut engine = engine();
        engine.zoom_by(1_000.0);
        assert_eq!(engine.zoom_level(), 100.0);
        engine.zoom_by(1e-6);
        assert_eq!(engine.zoom_level(), 0.5);
    }

    #[test]
    fn zoom_by_keeps_host_center_fixed() {
        let mut engine = engine();
        let center = engine.host_rect().center();
        let before = engine.screen_to_canvas(center);
        engine.zoom_by(1.3);
        assert_close(engine.screen_to_canvas(center), before, 0.05);
    }

    #[test]
    fn disabled_zoom_ignores_requests() {
        let mut engine = engine();
        engine.disable_zoom();
        engine.zoom_by(2.0);
        engine.zoom_at_point(2.0, egui::pos2(5.0, 5.0));
        assert_eq!(engine.zoom_level(), 1.0);
    }

    #[test]
    fn invalid_factors_are_ignored() {
        let mut engine = engine();
        engine.zoom_by(0.0);
        engine.zoom_by(-2.0);
        engine.zoom_by(f32::NAN);
        assert_eq!(engine.zoom_level(), 1.0);
    }

    #[test]
    fn pan_by_respects_the_pan_flag() {
        let mut engine = engine();
        let start = engine.pan();

        engine.disable_pan();
        engine.pan_by(egui::vec2(50.0, 50.0));
        assert_eq!(engine.pan(), start);
        assert!(engine.is_zoom_enabled());

        engine.enable_pan();
        engine.pan_by(egui::vec2(50.0, -20.0));
        assert_eq!(engine.pan(), start + egui::vec2(50.0, -20.0));
    }

    #[test]
    fn translate_ignores_the_pan_flag() {
        let mut engine = engine();
        let start = engine.pan();
        engine.disable_pan();
        engine.translate(egui::vec2(-5.0, 7.0));
        assert_eq!(engine.pan(), start + egui::vec2(-5.0, 7.0));
    }

    #[test]
    fn resize_updates_host_without_touching_zoom() {
        let mut engine = engine();
        engine.zoom(4.0);
        let pan = engine.pan();

        engine.resize(host(400.0, 300.0));

        assert_eq!(engine.host_rect().size(), egui::vec2(400.0, 300.0));
        assert_eq!(engine.zoom_level(), 4.0);
        assert_eq!(engine.pan(), pan);
    }

    #[test]
    fn canvas_and_screen_conversions_agree() {
        let mut engine = engine();
        engine.zoom_at_point(7.0, egui::pos2(100.0, 100.0));
        let canvas = egui::pos2(1234.5, 6789.0);
        assert_close(
            engine.screen_to_canvas(engine.canvas_to_screen(canvas)),
            canvas,
            0.05,
        );
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut engine = engine();
        assert!(engine.destroy());
        assert!(!engine.destroy());
        assert!(engine.is_destroyed());

        let pan = engine.pan();
        engine.translate(egui::vec2(1.0, 1.0));
        engine.zoom_by(2.0);
        assert_eq!(engine.pan(), pan);
        assert_eq!(engine.zoom_level(), 1.0);
    }
}
