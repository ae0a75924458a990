//! Viewport transform and camera control for a scrollable, zoomable railroad map.
//!
//! The world snapshot types in this file are what the game reports; the modules
//! below turn them into canvas coordinates and keep the view on a moving entity.

pub mod follow;
pub mod gesture;
pub mod mapper;
pub mod mode;
pub mod view;
pub mod viewport;

use serde::{Deserialize, Serialize};

pub use follow::{ElementRef, FollowCameraController, FollowTarget, Measure, TargetKind};
pub use gesture::{WheelGestureTranslator, WheelInput};
pub use mapper::{BoundsError, CanvasMetrics, WorldBounds};
pub use mode::{DisplayMode, ModeBroadcaster, ModeStore, ModeSubscription, ModeUpdate};
pub use view::{MapView, WorldLayout};
pub use viewport::{ViewportConfig, ViewportEngine};

/// Industry type id used by the game for firewood depots.
pub const FIREWOOD_DEPOT_INDUSTRY: i32 = 10;

/// Position in world units [x, y, z] where z is height.
pub type Location = [f64; 3];

/// Rotation in degrees [pitch, yaw, roll].
pub type Rotation = [f64; 3];

/// A full snapshot of the simulated world, as delivered on every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorldData {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub splines: Vec<Spline>,
    #[serde(default)]
    pub switches: Vec<Switch>,
    #[serde(default)]
    pub turntables: Vec<Turntable>,
    #[serde(default)]
    pub industries: Vec<Industry>,
    #[serde(default)]
    pub water_towers: Vec<WaterTower>,
}

/// A connected player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Player {
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub rotation: f64,
}

/// A piece of rolling stock (locomotive, tender or car).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Frame {
    #[serde(rename = "Type")]
    pub frame_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
    pub location: Location,
    #[serde(default)]
    pub rotation: Rotation,
}

/// A polyline of track or groundwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Spline {
    #[serde(rename = "Type")]
    pub spline_type: i32,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl Spline {
    /// Track splines are drawn above groundwork (grades, bridges, walls).
    pub fn is_track(&self) -> bool {
        matches!(self.spline_type, 0 | 4)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Segment {
    pub location_start: Location,
    pub location_end: Location,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Switch {
    #[serde(rename = "Type")]
    pub switch_type: i32,
    pub location: Location,
    #[serde(default)]
    pub rotation: Rotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Turntable {
    pub location: Location,
    #[serde(default)]
    pub rotation: Rotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Industry {
    #[serde(rename = "Type")]
    pub industry_type: i32,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WaterTower {
    pub location: Location,
}
