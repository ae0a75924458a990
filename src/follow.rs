//! Camera that keeps a moving entity centered in the map view.
//!
//! The controller is idle until given a [`FollowTarget`]. While it has a target
//! with an element reference and the map is not in full-map mode it is
//! *engaged*: user panning is switched off and every host resize or target
//! update recenters the view on the element. Full-map mode suspends it without
//! forgetting the target.

use crate::mode::DisplayMode;
use crate::viewport::ViewportEngine;
use eframe::egui;

/// Kind of entity the camera can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Player,
    Frame,
}

/// Non-owning handle to something drawn on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub kind: TargetKind,
    pub index: usize,
}

impl ElementRef {
    pub fn new(kind: TargetKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// Answers where an element currently is.
pub trait Measure {
    /// Bounding box of `element` in canvas coordinates, or `None` if it is not
    /// drawn right now.
    fn measure(&self, element: ElementRef) -> Option<egui::Rect>;
}

/// What the camera is following.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowTarget {
    pub kind: TargetKind,
    pub index: usize,
    /// Set once the entity has been drawn and can be measured.
    pub element: Option<ElementRef>,
    /// Opaque payload; a new value means the entity moved.
    pub aux: Option<serde_json::Value>,
}

impl FollowTarget {
    /// A target whose element has not been drawn yet.
    pub fn pending(kind: TargetKind, index: usize) -> Self {
        Self {
            kind,
            index,
            element: None,
            aux: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.element.is_some()
    }
}

/// Keeps the view centered on a [`FollowTarget`].
#[derive(Debug, Default)]
pub struct FollowCameraController {
    target: Option<FollowTarget>,
    engaged: bool,
}

impl FollowCameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&FollowTarget> {
        self.target.as_ref()
    }

    /// Whether the camera currently owns panning and listens for resizes.
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Starts following `target`, or refreshes it when it is already followed.
    ///
    /// Returns the pan applied by the recenter this triggered, if any.
    pub fn start_following(
        &mut self,
        target: FollowTarget,
        engine: &mut ViewportEngine,
        layout: &dyn Measure,
        mode: DisplayMode,
    ) -> Option<egui::Vec2> {
        let changed = self.target.as_ref() != Some(&target);
        if self.target.is_none() {
            log::info!("Following {:?} #{}", target.kind, target.index);
        }
        self.target = Some(target);
        self.reconcile(engine, layout, mode, changed)
    }

    /// Forgets the target and hands panning back to the user.
    pub fn stop_following(&mut self, engine: &mut ViewportEngine) {
        if let Some(target) = self.target.take() {
            log::info!("Stopped following {:?} #{}", target.kind, target.index);
        }
        self.disengage(engine);
    }

    /// Re-evaluates the full-map guard after a mode change.
    pub fn on_mode_changed(
        &mut self,
        engine: &mut ViewportEngine,
        layout: &dyn Measure,
        mode: DisplayMode,
    ) -> Option<egui::Vec2> {
        self.reconcile(engine, layout, mode, false)
    }

    /// Handles a host resize. Only recenters while engaged; returns the pan
    /// applied.
    pub fn on_resize(
        &mut self,
        engine: &mut ViewportEngine,
        host: egui::Rect,
        layout: &dyn Measure,
    ) -> Option<egui::Vec2> {
        if !self.engaged {
            return None;
        }
        self.recenter(engine, host, layout)
    }

    fn wants_engagement(&self, mode: DisplayMode) -> bool {
        mode != DisplayMode::FullMap && self.target.as_ref().is_some_and(FollowTarget::is_resolved)
    }

    fn reconcile(
        &mut self,
        engine: &mut ViewportEngine,
        layout: &dyn Measure,
        mode: DisplayMode,
        target_changed: bool,
    ) -> Option<egui::Vec2> {
        match (self.engaged, self.wants_engagement(mode)) {
            (false, true) => {
                self.engaged = true;
                engine.disable_pan();
                log::debug!("Follow camera engaged");
                let host = engine.host_rect();
                self.recenter(engine, host, layout)
            }
            (true, false) => {
                self.disengage(engine);
                None
            }
            (true, true) if target_changed => {
                let host = engine.host_rect();
                self.recenter(engine, host, layout)
            }
            _ => None,
        }
    }

    fn disengage(&mut self, engine: &mut ViewportEngine) {
        if self.engaged {
            self.engaged = false;
            engine.enable_pan();
            log::debug!("Follow camera released panning");
        }
    }

    /// Pans so the target's center lands on the host's center.
    ///
    /// The host box is always recorded. The element is measured fresh every
    /// time; if it cannot be measured this cycle the view does not move.
    fn recenter(
        &self,
        engine: &mut ViewportEngine,
        host: egui::Rect,
        layout: &dyn Measure,
    ) -> Option<egui::Vec2> {
        engine.resize(host);

        let element = self.target.as_ref()?.element?;
        let Some(canvas_rect) = layout.measure(element) else {
            log::debug!("Follow target {element:?} not measurable yet; skipping recenter");
            return None;
        };

        let target_rect = engine.canvas_rect_to_screen(canvas_rect);
        let delta = host.center() - target_rect.center();
        engine.translate(delta);
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewportConfig;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeLayout {
        rects: HashMap<ElementRef, egui::Rect>,
    }

    impl FakeLayout {
        fn with(element: ElementRef, center: egui::Pos2) -> Self {
            let mut layout = Self::default();
            layout.place(element, center);
            layout
        }

        fn place(&mut self, element: ElementRef, center: egui::Pos2) {
            self.rects.insert(
                element,
                egui::Rect::from_center_size(center, egui::vec2(20.0, 20.0)),
            );
        }
    }

    impl Measure for FakeLayout {
        fn measure(&self, element: ElementRef) -> Option<egui::Rect> {
            self.rects.get(&element).copied()
        }
    }

    fn host(width: f32, height: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(width, height))
    }

    fn engine() -> ViewportEngine {
        ViewportEngine::new(
            ViewportConfig::default(),
            egui::vec2(8000.0, 8000.0),
            host(800.0, 600.0),
        )
    }

    fn player(index: usize) -> ElementRef {
        ElementRef::new(TargetKind::Player, index)
    }

    fn resolved(index: usize) -> FollowTarget {
        FollowTarget {
            element: Some(player(index)),
            ..FollowTarget::pending(TargetKind::Player, index)
        }
    }

    fn assert_centered(engine: &ViewportEngine, canvas: egui::Pos2) {
        let screen = engine.canvas_to_screen(canvas);
        let diff = (screen - engine.host_rect().center()).length();
        assert!(diff < 0.05, "{canvas:?} is {diff}px off center");
    }

    #[test]
    fn starting_disables_pan_and_centers_target() {
        let layout = FakeLayout::with(player(0), egui::pos2(1000.0, 6500.0));
        let mut engine = engine();
        let mut camera = FollowCameraController::new();

        let delta = camera.start_following(resolved(0), &mut engine, &layout, DisplayMode::Normal);

        assert!(delta.is_some());
        assert!(camera.is_engaged());
        assert!(!engine.is_pan_enabled());
        assert_centered(&engine, egui::pos2(1000.0, 6500.0));
    }

    #[test]
    fn pending_target_does_not_engage() {
        let layout = FakeLayout::default();
        let mut engine = engine();
        let mut camera = FollowCameraController::new();

        let delta = camera.start_following(
            FollowTarget::pending(TargetKind::Frame, 3),
            &mut engine,
            &layout,
            DisplayMode::Normal,
        );

        assert_eq!(delta, None);
        assert!(!camera.is_engaged());
        assert!(engine.is_pan_enabled());
        assert_eq!(camera.target().map(|t| t.index), Some(3));
    }

    #[test]
    fn each_resize_recenters_once_while_pan_stays_disabled() {
        let layout = FakeLayout::with(player(0), egui::pos2(3000.0, 3000.0));
        let mut engine = engine();
        let mut camera = FollowCameraController::new();
        camera.start_following(resolved(0), &mut engine, &layout, DisplayMode::Normal);

        for (width, height) in [(400.0, 300.0), (1024.0, 768.0), (640.0, 480.0)] {
            let applied = camera.on_resize(&mut engine, host(width, height), &layout);
            assert!(applied.is_some());
            assert!(!engine.is_pan_enabled());
            assert_centered(&engine, egui::pos2(3000.0, 3000.0));
        }
    }

    #[test]
    fn resize_while_idle_does_nothing() {
        let layout = FakeLayout::default();
        let mut engine = engine();
        let mut camera = FollowCameraController::new();

        assert_eq!(camera.on_resize(&mut engine, host(400.0, 300.0), &layout), None);
        assert_eq!(engine.host_rect(), host(800.0, 600.0));
    }

    #[test]
    fn full_map_suspends_without_forgetting_target() {
        let mut layout = FakeLayout::with(player(1), egui::pos2(2000.0, 2000.0));
        let mut engine = engine();
        let mut camera = FollowCameraController::new();
        camera.start_following(resolved(1), &mut engine, &layout, DisplayMode::Normal);

        assert_eq!(camera.on_mode_changed(&mut engine, &layout, DisplayMode::FullMap), None);
        assert!(engine.is_pan_enabled());
        assert!(!camera.is_engaged());
        assert_eq!(camera.target(), Some(&resolved(1)));
        assert_eq!(camera.on_resize(&mut engine, host(500.0, 500.0), &layout), None);

        layout.place(player(1), egui::pos2(2500.0, 1800.0));
        let resumed = camera.on_mode_changed(&mut engine, &layout, DisplayMode::Normal);

        assert!(resumed.is_some());
        assert!(!engine.is_pan_enabled());
        assert_centered(&engine, egui::pos2(2500.0, 1800.0));
    }

    #[test]
    fn minimap_mode_keeps_following() {
        let layout = FakeLayout::with(player(0), egui::pos2(100.0, 100.0));
        let mut engine = engine();
        let mut camera = FollowCameraController::new();

        camera.start_following(resolved(0), &mut engine, &layout, DisplayMode::Minimap);

        assert!(camera.is_engaged());
        assert_centered(&engine, egui::pos2(100.0, 100.0));
    }

    #[test]
    fn new_aux_data_triggers_recenter() {
        let mut layout = FakeLayout::with(player(0), egui::pos2(4000.0, 4000.0));
        let mut engine = engine();
        let mut camera = FollowCameraController::new();
        camera.start_following(resolved(0), &mut engine, &layout, DisplayMode::Normal);

        layout.place(player(0), egui::pos2(4100.0, 3950.0));
        let same = camera.start_following(resolved(0), &mut engine, &layout, DisplayMode::Normal);
        assert_eq!(same, None);

        let moved = FollowTarget {
            aux: Some(serde_json::json!([4100.0, 3950.0])),
            ..resolved(0)
        };
        let delta = camera.start_following(moved, &mut engine, &layout, DisplayMode::Normal);

        assert!(delta.is_some());
        assert_centered(&engine, egui::pos2(4100.0, 3950.0));
    }

    #[test]
    fn unmeasurable_target_is_skipped_silently() {
        let layout = FakeLayout::default();
        let mut engine = engine();
        let mut camera = FollowCameraController::new();
        let pan = engine.pan();

        let delta = camera.start_following(resolved(2), &mut engine, &layout, DisplayMode::Normal);

        assert_eq!(delta, None);
        assert!(camera.is_engaged());
        assert_eq!(engine.pan(), pan);
        assert_eq!(camera.on_resize(&mut engine, host(300.0, 300.0), &layout), None);
        assert_eq!(engine.host_rect(), host(300.0, 300.0));
    }

    #[test]
    fn stop_following_restores_pan() {
        let layout = FakeLayout::with(player(0), egui::pos2(10.0, 10.0));
        let mut engine = engine();
        let mut camera = FollowCameraController::new();
        camera.start_following(resolved(0), &mut engine, &layout, DisplayMode::Normal);

        camera.stop_following(&mut engine);
        camera.stop_following(&mut engine);

        assert!(camera.target().is_none());
        assert!(!camera.is_engaged());
        assert!(engine.is_pan_enabled());
    }

    #[test]
    fn recenter_is_relative_to_current_zoom_and_pan() {
        let layout = FakeLayout::with(player(0), egui::pos2(7000.0, 500.0));
        let mut engine = engine();
        engine.zoom(12.0);
        engine.pan_by(egui::vec2(321.0, -45.0));
        let mut camera = FollowCameraController::new();

        camera.start_following(resolved(0), &mut engine, &layout, DisplayMode::Normal);

        assert_eq!(engine.zoom_level(), 12.0);
        assert_centered(&engine, egui::pos2(7000.0, 500.0));
    }
}
