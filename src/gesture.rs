//! Turns raw mouse wheel deltas into damped zoom steps.
//!
//! Wheel deltas vary wildly between devices (a notch on one mouse, hundreds of
//! pixels from a trackpad burst), so large deltas are compressed logarithmically
//! and events arriving in quick succession are divided down further.

use crate::viewport::ViewportEngine;
use eframe::egui;
use std::time::Instant;

/// Base of the exponential zoom step per normalized wheel unit.
const ZOOM_BASE: f64 = 1.1;

/// Deltas inside this band are already small enough to use as-is.
const LINEAR_BAND: f64 = 0.3;

/// Smallest divider; applies once events are at least `DAMPING_WINDOW_MS` apart.
const MIN_DIVIDER: f64 = 3.0;

const DAMPING_WINDOW_MS: f64 = 30.0;

/// A single wheel event as seen by the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    /// Vertical delta, positive when scrolling down. `None` when the device
    /// reported nothing usable.
    pub delta_y: Option<f32>,
    /// Pointer position in screen coordinates.
    pub pointer: egui::Pos2,
}

/// Divider for an event arriving `time_delta_ms` after the previous one.
/// Ranges from 3 (slow scrolling) to 33 (back-to-back events).
pub fn wheel_divider(time_delta_ms: f64) -> f64 {
    MIN_DIVIDER + (DAMPING_WINDOW_MS - time_delta_ms).max(0.0)
}

/// Compresses a raw wheel delta into a zoom exponent.
pub fn normalize_wheel_delta(delta: f64, divider: f64) -> f64 {
    if -LINEAR_BAND < delta && delta < LINEAR_BAND {
        delta
    } else {
        delta.signum() * (delta.abs() + 10.0).ln() / divider
    }
}

/// Zoom multiplier for a normalized delta. Scrolling down (positive) zooms out.
pub fn zoom_factor(normalized: f64) -> f64 {
    ZOOM_BASE.powf(-normalized)
}

/// Wheel listener bound to one map canvas.
///
/// Holds the time of the last wheel event so bursts can be damped.
#[derive(Debug)]
pub struct WheelGestureTranslator {
    last_event: Instant,
}

impl WheelGestureTranslator {
    pub fn new(now: Instant) -> Self {
        Self { last_event: now }
    }

    #[cfg(test)]
    fn last_event(&self) -> Instant {
        self.last_event
    }

    /// Handles one wheel event, zooming `engine` accordingly.
    ///
    /// Returns the zoom factor that was applied, or `None` when zooming is
    /// disabled, in which case nothing (including the clock) is touched.
    pub fn on_wheel(
        &mut self,
        engine: &mut ViewportEngine,
        input: WheelInput,
        now: Instant,
    ) -> Option<f32> {
        if !engine.is_zoom_enabled() {
            return None;
        }

        let delta = match input.delta_y {
            Some(d) if d != 0.0 && !d.is_nan() => f64::from(d),
            _ => 1.0,
        };
        let time_delta_ms = now.saturating_duration_since(self.last_event).as_secs_f64() * 1000.0;
        let divider = wheel_divider(time_delta_ms);

        self.last_event = now;

        let factor = zoom_factor(normalize_wheel_delta(delta, divider)) as f32;

        if engine.is_pan_enabled() {
            let point = engine.host_local(input.pointer);
            engine.zoom_at_point(factor, point);
        } else {
            engine.zoom_by(factor);
        }

        Some(factor)
    }
}
