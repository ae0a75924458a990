//! Drawing functions for the map layers, bottom to top.

use crate::colors;
use eframe::egui;
use rail_map::view::{FRAME_MARKER_SIZE, PLAYER_MARKER_SIZE};
use rail_map::{
    FIREWOOD_DEPOT_INDUSTRY, Frame, Industry, MapView, Player, Spline, Switch, TargetKind,
    Turntable, WaterTower,
};

/// Turntable pit radius in world units.
const TURNTABLE_RADIUS: f64 = 1250.0;

/// Screen radius for a marker `canvas_size` canvas units across, kept readable
/// at every zoom level.
fn marker_radius(view: &MapView, canvas_size: f32, min: f32, max: f32) -> f32 {
    (canvas_size / 2.0 * view.engine().scale()).clamp(min, max)
}

fn is_visible(painter: &egui::Painter, pos: egui::Pos2, margin: f32) -> bool {
    painter.clip_rect().expand(margin).contains(pos)
}

/// Draws the map background and border.
pub fn draw_background(painter: &egui::Painter, view: &MapView) {
    let map_rect = view.engine().map_rect();
    let fill = if view.mode().transparent {
        colors::MAP_BACKGROUND_TRANSPARENT
    } else {
        colors::MAP_BACKGROUND
    };
    painter.rect_filled(map_rect, 0.0, fill);
    painter.rect_stroke(
        map_rect,
        0.0,
        egui::Stroke::new(1.0, colors::MAP_BORDER),
        egui::StrokeKind::Outside,
    );
}

/// Draws either the track splines or the groundwork splines.
pub fn draw_splines(painter: &egui::Painter, view: &MapView, splines: &[Spline], tracks: bool) {
    let scale = view.engine().scale();
    let (color, width) = if tracks {
        (colors::TRACK, (12.0 * scale).clamp(1.0, 6.0))
    } else {
        (colors::GROUNDWORK, (30.0 * scale).clamp(1.0, 16.0))
    };
    let stroke = egui::Stroke::new(width, color);

    for spline in splines.iter().filter(|s| s.is_track() == tracks) {
        for segment in spline.segments.iter().filter(|s| s.visible) {
            let start = view.world_to_screen(segment.location_start);
            let end = view.world_to_screen(segment.location_end);
            if is_visible(painter, start, 50.0) || is_visible(painter, end, 50.0) {
                painter.line_segment([start, end], stroke);
            }
        }
    }
}

pub fn draw_turntables(painter: &egui::Painter, view: &MapView, turntables: &[Turntable]) {
    let canvas_radius = view.metrics().world_to_canvas_len(TURNTABLE_RADIUS) as f32;
    let radius = (canvas_radius * view.engine().scale()).max(2.0);

    for turntable in turntables {
        let pos = view.world_to_screen(turntable.location);
        if !is_visible(painter, pos, radius) {
            continue;
        }
        painter.circle(
            pos,
            radius,
            colors::TURNTABLE_FILL,
            egui::Stroke::new(1.0, colors::TURNTABLE_STROKE),
        );
    }
}

pub fn draw_switches(painter: &egui::Painter, view: &MapView, switches: &[Switch]) {
    let radius = marker_radius(view, 12.0, 1.5, 6.0);
    for switch in switches {
        let pos = view.world_to_screen(switch.location);
        if is_visible(painter, pos, 10.0) {
            painter.circle_filled(pos, radius, colors::SWITCH);
        }
    }
}

/// Draws the industries the map shows (firewood depots only).
pub fn draw_firewood_depots(painter: &egui::Painter, view: &MapView, industries: &[Industry]) {
    let size = marker_radius(view, 40.0, 3.0, 16.0) * 2.0;
    for industry in industries
        .iter()
        .filter(|i| i.industry_type == FIREWOOD_DEPOT_INDUSTRY)
    {
        let pos = view.world_to_screen(industry.location);
        if is_visible(painter, pos, size) {
            let rect = egui::Rect::from_center_size(pos, egui::vec2(size, size));
            painter.rect_filled(rect, 2.0, colors::FIREWOOD_DEPOT);
        }
    }
}

pub fn draw_water_towers(painter: &egui::Painter, view: &MapView, towers: &[WaterTower]) {
    let radius = marker_radius(view, 30.0, 2.5, 10.0);
    for tower in towers {
        let pos = view.world_to_screen(tower.location);
        if is_visible(painter, pos, radius) {
            painter.circle_filled(pos, radius, colors::WATER_TOWER);
        }
    }
}

pub fn draw_frames(painter: &egui::Painter, view: &MapView, frames: &[Frame]) {
    let minimap = view.is_minimap();
    let radius = marker_radius(view, FRAME_MARKER_SIZE, if minimap { 4.0 } else { 3.0 }, 14.0);

    for (index, frame) in frames.iter().enumerate() {
        let pos = view.world_to_screen(frame.location);
        if !is_visible(painter, pos, radius) {
            continue;
        }
        painter.circle(
            pos,
            radius,
            colors::FRAME_FILL,
            egui::Stroke::new(1.5, colors::FRAME_STROKE),
        );
        if is_followed(view, TargetKind::Frame, index) {
            draw_followed_ring(painter, pos, radius);
        }
        if !minimap && !frame.number.is_empty() {
            draw_label(painter, pos + egui::vec2(0.0, -radius - 2.0), &frame.number, 11.0);
        }
    }
}

pub fn draw_players(painter: &egui::Painter, view: &MapView, players: &[Player]) {
    let minimap = view.is_minimap();
    let radius = marker_radius(view, PLAYER_MARKER_SIZE, if minimap { 6.0 } else { 4.0 }, 18.0);

    for (index, player) in players.iter().enumerate() {
        let pos = view.world_to_screen(player.location);
        if !is_visible(painter, pos, radius) {
            continue;
        }

        // Heading tick
        let heading = (player.rotation as f32).to_radians();
        let tip = pos + egui::vec2(heading.cos(), heading.sin()) * radius * 1.8;
        painter.line_segment([pos, tip], egui::Stroke::new(2.0, colors::PLAYER_STROKE));

        painter.circle(
            pos,
            radius,
            colors::PLAYER_FILL,
            egui::Stroke::new(1.5, colors::PLAYER_STROKE),
        );
        if is_followed(view, TargetKind::Player, index) {
            draw_followed_ring(painter, pos, radius);
        }
        if !minimap {
            draw_label(painter, pos + egui::vec2(0.0, -radius - 2.0), &player.name, 13.0);
        }
    }
}

fn is_followed(view: &MapView, kind: TargetKind, index: usize) -> bool {
    view.following()
        .is_some_and(|t| t.kind == kind && t.index == index)
}

fn draw_followed_ring(painter: &egui::Painter, pos: egui::Pos2, radius: f32) {
    painter.circle_stroke(
        pos,
        radius + 3.0,
        egui::Stroke::new(2.0, colors::FOLLOWED_RING),
    );
}

fn draw_label(painter: &egui::Painter, pos: egui::Pos2, text: &str, size: f32) {
    let font_id = egui::FontId::proportional(size);

    // Shadow
    painter.text(
        pos + egui::vec2(1.0, 1.0),
        egui::Align2::CENTER_BOTTOM,
        text,
        font_id.clone(),
        colors::LABEL_SHADOW,
    );

    painter.text(
        pos,
        egui::Align2::CENTER_BOTTOM,
        text,
        font_id,
        colors::LABEL_TEXT,
    );
}
