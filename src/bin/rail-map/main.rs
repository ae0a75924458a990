#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod colors;
mod constants;
mod overlays;
mod ui;
mod world;
mod world_watcher;

use clap::Parser;
use constants::{
    IMAGE_SIZE, OVERLAY_WINDOW_SIZE, WINDOW_SIZE, WORLD_HALF_EXTENT, ZOOM_MAX, ZOOM_MIN,
};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use rail_map::{
    CanvasMetrics, DisplayMode, MapView, ModeBroadcaster, ModeUpdate, ViewportConfig, WorldBounds,
    WorldData,
};
use std::path::PathBuf;
use world::load_world;
use world_watcher::WorldWatcher;

/// Live map of a railroad world.
#[derive(Parser, Debug)]
#[command(name = "rail-map", version)]
struct Args {
    /// World snapshot to display (.ron or .json); reloaded whenever it changes
    #[arg(long)]
    world: Option<PathBuf>,

    /// Start as a small overlay that follows the first player
    #[arg(long)]
    overlay: bool,

    /// Draw the overlay with a see-through background
    #[arg(long, requires = "overlay")]
    transparent: bool,

    /// Highest zoom level the wheel and buttons can reach
    #[arg(long, default_value_t = ZOOM_MAX)]
    max_zoom: f32,
}

/// Main application state for the Rail Map viewer.
pub struct RailMapApp {
    world: WorldData,
    metrics: CanvasMetrics,
    viewport_config: ViewportConfig,
    launch_mode: ModeUpdate,
    /// Created on the first frame, once the map area has a size
    view: Option<MapView>,
    /// Stands in for the host shell's mode channel
    modes: ModeBroadcaster,
    toasts: Toasts,
    world_watcher: Option<WorldWatcher>,
}

impl RailMapApp {
    fn new(cc: &eframe::CreationContext<'_>, args: &Args, metrics: CanvasMetrics) -> Self {
        let mut toasts = Toasts::new()
            .anchor(egui::Align2::RIGHT_TOP, (-10.0, 10.0))
            .direction(egui::Direction::TopDown);

        let world_path = args.world.clone().or_else(world::default_world_path);

        let world = match world_path.as_deref().map(load_world) {
            Some(Ok(world)) => world,
            Some(Err(err)) => {
                Self::error_toast(&mut toasts, err.to_string());
                WorldData::default()
            }
            None => {
                Self::error_toast(&mut toasts, "No world snapshot path available".to_string());
                WorldData::default()
            }
        };

        let world_watcher = world_path.and_then(|path| WorldWatcher::new(cc.egui_ctx.clone(), path));
        if world_watcher.is_none() {
            log::info!("World watcher not available - live updates disabled");
        }

        let launch_mode = if args.overlay {
            ModeUpdate {
                mode: DisplayMode::Minimap,
                transparent: args.transparent,
            }
        } else {
            ModeUpdate::default()
        };

        Self {
            world,
            metrics,
            viewport_config: ViewportConfig {
                min_zoom: ZOOM_MIN,
                max_zoom: args.max_zoom.max(ZOOM_MIN),
                initial_zoom: None,
            },
            launch_mode,
            view: None,
            modes: ModeBroadcaster::new(),
            toasts,
            world_watcher,
        }
    }

    fn error_toast(toasts: &mut Toasts, text: String) {
        toasts.add(Toast {
            kind: ToastKind::Error,
            text: text.into(),
            options: ToastOptions::default()
                .duration_in_seconds(8.0)
                .show_icon(true),
            ..Default::default()
        });
    }

    /// Current transparency; the launch setting until the view exists.
    fn is_transparent(&self) -> bool {
        self.view
            .as_ref()
            .map_or(self.launch_mode.transparent, MapView::is_transparent)
    }

    /// Takes the newest world snapshot from the watcher, if any.
    fn poll_world(&mut self) {
        let Some(watcher) = &mut self.world_watcher else {
            return;
        };

        let (latest, errors) = watcher.poll();
        for err in errors {
            Self::error_toast(&mut self.toasts, err.to_string());
        }
        if let Some(world) = latest {
            self.world = world;
        }
    }
}

impl eframe::App for RailMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_world();
        self.handle_keyboard_input(ctx);

        self.show_status_bar(ctx);
        self.show_central_panel(ctx);

        // Show toasts
        self.toasts.show(ctx);
    }

    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        if self.is_transparent() {
            egui::Rgba::TRANSPARENT.to_array()
        } else {
            visuals.panel_fill.to_normalized_gamma_f32()
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let args = Args::parse();

    let metrics = CanvasMetrics::new(WorldBounds::square(WORLD_HALF_EXTENT), IMAGE_SIZE)
        .map_err(|err| eframe::Error::AppCreation(Box::new(err)))?;

    let viewport = if args.overlay {
        egui::ViewportBuilder::default()
            .with_inner_size(OVERLAY_WINDOW_SIZE)
            .with_always_on_top()
            .with_decorations(false)
            .with_transparent(args.transparent)
    } else {
        egui::ViewportBuilder::default().with_inner_size(WINDOW_SIZE)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Rail Map",
        options,
        Box::new(move |cc| Ok(Box::new(RailMapApp::new(cc, &args, metrics)))),
    )
}
