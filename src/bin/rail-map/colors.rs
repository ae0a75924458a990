//! Color constants for map layers and markers.

use eframe::egui::Color32;

// Background
pub const MAP_BACKGROUND: Color32 = Color32::from_rgb(254, 254, 242);
pub const MAP_BACKGROUND_TRANSPARENT: Color32 = Color32::from_rgba_premultiplied(20, 20, 20, 90);
pub const MAP_BORDER: Color32 = Color32::BLACK;

// Splines
pub const TRACK: Color32 = Color32::BLACK;
pub const GROUNDWORK: Color32 = Color32::from_rgb(190, 170, 130);

// Structures
pub const SWITCH: Color32 = Color32::from_rgb(200, 30, 30);
pub const TURNTABLE_FILL: Color32 = Color32::from_rgb(220, 220, 200);
pub const TURNTABLE_STROKE: Color32 = Color32::from_rgb(60, 60, 60);
pub const FIREWOOD_DEPOT: Color32 = Color32::from_rgb(139, 90, 43);
pub const WATER_TOWER: Color32 = Color32::from_rgb(30, 110, 200);

// Moving agents
pub const FRAME_FILL: Color32 = Color32::from_rgb(255, 165, 0);
pub const FRAME_STROKE: Color32 = Color32::from_rgb(139, 69, 19);
pub const PLAYER_FILL: Color32 = Color32::from_rgb(50, 205, 50);
pub const PLAYER_STROKE: Color32 = Color32::from_rgb(0, 100, 0);
pub const FOLLOWED_RING: Color32 = Color32::from_rgb(255, 0, 128);

// Text
pub const LABEL_TEXT: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 220);
pub const LABEL_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);
