/// Edge of the square map canvas, in canvas units.
pub const IMAGE_SIZE: f64 = 8000.0;

/// The world spans this many units either side of the origin on both axes.
pub const WORLD_HALF_EXTENT: f64 = 200_000.0;

/// Minimum zoom level (1.0 = fit to viewport).
pub const ZOOM_MIN: f32 = 0.5;

/// Maximum zoom level.
pub const ZOOM_MAX: f32 = 100.0;

/// Height of the bottom status bar in pixels.
pub const STATUS_BAR_HEIGHT: f32 = 24.0;

/// Window size on first launch.
pub const WINDOW_SIZE: [f32; 2] = [1280.0, 720.0];

/// Overlay window size; small enough to sit in a screen corner.
pub const OVERLAY_WINDOW_SIZE: [f32; 2] = [360.0, 360.0];
