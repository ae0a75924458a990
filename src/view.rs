//! The map view as seen by renderers and UI: one engine, one wheel listener,
//! one follow camera and the current display mode, wired together.

use crate::follow::{ElementRef, FollowCameraController, FollowTarget, Measure, TargetKind};
use crate::gesture::{WheelGestureTranslator, WheelInput};
use crate::mapper::CanvasMetrics;
use crate::mode::{DisplayMode, ModeStore, ModeUpdate};
use crate::viewport::{ViewportConfig, ViewportEngine};
use crate::{Location, WorldData};
use eframe::egui;
use std::time::Instant;

/// Zoom level the overlay starts at instead of fitting the whole map.
pub const OVERLAY_ZOOM: f32 = 20.0;

/// Zoom step of the zoom in/out controls.
pub const BUTTON_ZOOM_STEP: f32 = 1.3;

/// Marker edge lengths in canvas units, used to measure followed entities.
pub const PLAYER_MARKER_SIZE: f32 = 60.0;
pub const FRAME_MARKER_SIZE: f32 = 40.0;

/// Measures entities straight from a world snapshot.
#[derive(Debug, Clone, Copy)]
pub struct WorldLayout<'a> {
    world: &'a WorldData,
    metrics: CanvasMetrics,
}

impl<'a> WorldLayout<'a> {
    pub fn new(world: &'a WorldData, metrics: CanvasMetrics) -> Self {
        Self { world, metrics }
    }

    /// Current world location of the entity `kind`/`index`, if it exists.
    pub fn location(&self, kind: TargetKind, index: usize) -> Option<Location> {
        match kind {
            TargetKind::Player => self.world.players.get(index).map(|p| p.location),
            TargetKind::Frame => self.world.frames.get(index).map(|f| f.location),
        }
    }
}

impl Measure for WorldLayout<'_> {
    fn measure(&self, element: ElementRef) -> Option<egui::Rect> {
        let location = self.location(element.kind, element.index)?;
        let size = match element.kind {
            TargetKind::Player => PLAYER_MARKER_SIZE,
            TargetKind::Frame => FRAME_MARKER_SIZE,
        };
        Some(egui::Rect::from_center_size(
            self.metrics.world_to_canvas(location),
            egui::vec2(size, size),
        ))
    }
}

/// Map view state shared with renderers.
///
/// Created once the canvas has a size; [`teardown`](Self::teardown) (or drop)
/// releases the wheel listener, the follow camera and the mode subscription.
#[derive(Debug)]
pub struct MapView {
    metrics: CanvasMetrics,
    engine: ViewportEngine,
    wheel: Option<WheelGestureTranslator>,
    camera: FollowCameraController,
    modes: ModeStore,
    torn_down: bool,
}

impl MapView {
    /// Builds the view for a canvas laid out at `host`.
    ///
    /// When the mode store starts in minimap mode (overlay launch) the view
    /// starts at `config.initial_zoom`, or [`OVERLAY_ZOOM`] if that is unset,
    /// and follows the first player.
    pub fn new(
        metrics: CanvasMetrics,
        mut config: ViewportConfig,
        host: egui::Rect,
        modes: ModeStore,
        now: Instant,
    ) -> Self {
        let overlay = modes.mode() == DisplayMode::Minimap;
        if overlay {
            config.initial_zoom = config.initial_zoom.or(Some(OVERLAY_ZOOM));
        }
        let mut engine = ViewportEngine::new(config, metrics.projected_size(), host);
        let mut camera = FollowCameraController::new();

        if overlay {
            let nothing_drawn = WorldData::default();
            let layout = WorldLayout::new(&nothing_drawn, metrics);
            camera.start_following(
                FollowTarget::pending(TargetKind::Player, 0),
                &mut engine,
                &layout,
                modes.mode(),
            );
        }

        log::debug!(
            "Map view created: {:.0}x{:.0} host, zoom {:.2}",
            host.width(),
            host.height(),
            engine.zoom_level()
        );

        Self {
            metrics,
            engine,
            wheel: Some(WheelGestureTranslator::new(now)),
            camera,
            modes,
            torn_down: false,
        }
    }

    pub fn metrics(&self) -> &CanvasMetrics {
        &self.metrics
    }

    pub fn engine(&self) -> &ViewportEngine {
        &self.engine
    }

    pub fn mode(&self) -> ModeUpdate {
        self.modes.state()
    }

    pub fn is_minimap(&self) -> bool {
        self.modes.mode() == DisplayMode::Minimap
    }

    /// What the camera is following, if anything.
    pub fn following(&self) -> Option<&FollowTarget> {
        self.camera.target()
    }

    pub fn is_transparent(&self) -> bool {
        self.modes.is_transparent()
    }

    /// Asks the camera to follow a rendered element. Calling it again with a
    /// new `aux` value is how position updates reach the camera.
    pub fn follow_element(
        &mut self,
        kind: TargetKind,
        index: usize,
        element: Option<ElementRef>,
        aux: Option<serde_json::Value>,
        world: &WorldData,
    ) -> Option<egui::Vec2> {
        if self.torn_down {
            return None;
        }
        let layout = WorldLayout::new(world, self.metrics);
        let target = FollowTarget {
            kind,
            index,
            element,
            aux,
        };
        self.camera
            .start_following(target, &mut self.engine, &layout, self.modes.mode())
    }

    pub fn stop_following(&mut self) {
        self.camera.stop_following(&mut self.engine);
    }

    /// Follow-button behavior: stop if following, otherwise follow the first
    /// player (if there is one). The minimap has no follow control, so this
    /// does nothing there.
    pub fn toggle_follow(&mut self, world: &WorldData) -> Option<egui::Vec2> {
        if self.is_minimap() {
            return None;
        }
        if self.camera.target().is_some() {
            self.stop_following();
            return None;
        }
        if world.players.is_empty() {
            return None;
        }
        self.follow_element(TargetKind::Player, 0, None, None, world);
        self.sync_target(world)
    }

    /// Points the followed target at its element in `world` and pushes its
    /// latest location, recentering when it moved or was just resolved.
    pub fn sync_target(&mut self, world: &WorldData) -> Option<egui::Vec2> {
        let (kind, index) = {
            let target = self.camera.target()?;
            (target.kind, target.index)
        };
        let location = WorldLayout::new(world, self.metrics).location(kind, index)?;

        self.follow_element(
            kind,
            index,
            Some(ElementRef::new(kind, index)),
            Some(serde_json::json!(location)),
            world,
        )
    }

    /// Drains the mode channel; returns whether the mode changed.
    pub fn poll_mode(&mut self, world: &WorldData) -> bool {
        if !self.modes.poll() {
            return false;
        }
        self.after_mode_change(world);
        true
    }

    /// Applies a mode update directly, bypassing the channel.
    pub fn set_mode(&mut self, update: ModeUpdate, world: &WorldData) -> bool {
        if !self.modes.set(update) {
            return false;
        }
        self.after_mode_change(world);
        true
    }

    fn after_mode_change(&mut self, world: &WorldData) {
        let layout = WorldLayout::new(world, self.metrics);
        self.camera
            .on_mode_changed(&mut self.engine, &layout, self.modes.mode());
    }

    /// Handles a newly measured host box. Recenters when the camera is engaged;
    /// returns the pan it applied.
    pub fn handle_resize(&mut self, host: egui::Rect, world: &WorldData) -> Option<egui::Vec2> {
        if self.torn_down || host == self.engine.host_rect() {
            return None;
        }
        if self.camera.is_engaged() {
            let layout = WorldLayout::new(world, self.metrics);
            self.camera.on_resize(&mut self.engine, host, &layout)
        } else {
            self.engine.resize(host);
            None
        }
    }

    /// Routes a wheel event through the gesture translator.
    pub fn handle_wheel(&mut self, input: WheelInput, now: Instant) -> Option<f32> {
        self.wheel.as_mut()?.on_wheel(&mut self.engine, input, now)
    }

    /// User drag; ignored while the camera owns panning.
    pub fn handle_drag(&mut self, delta: egui::Vec2) {
        self.engine.pan_by(delta);
    }

    pub fn zoom_in(&mut self) {
        self.engine.zoom_by(BUTTON_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.engine.zoom_by(1.0 / BUTTON_ZOOM_STEP);
    }

    /// Fits the whole map back into view. Does not interrupt following; the
    /// next target update recenters.
    pub fn fit(&mut self) {
        self.engine.reset();
    }

    /// Screen position of a world location.
    pub fn world_to_screen(&self, location: Location) -> egui::Pos2 {
        self.engine
            .canvas_to_screen(self.metrics.world_to_canvas(location))
    }

    /// Releases everything the view acquired. Returns `false` if it already ran.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        self.wheel = None;
        self.camera.stop_following(&mut self.engine);
        self.modes.unsubscribe();
        self.engine.destroy();
        log::debug!("Map view torn down");
        true
    }
}

impl Drop for MapView {
    fn drop(&mut self) {
        self.teardown();
    }
}
