//! World-to-canvas projection constants shared by every renderer and the follow camera.

use crate::Location;
use eframe::egui;
use thiserror::Error;

/// Fixed simulation extents in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl WorldBounds {
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// A square centered on the origin, `half_extent` units to each side.
    pub const fn square(half_extent: f64) -> Self {
        Self::new(-half_extent, half_extent, -half_extent, half_extent)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Errors raised when the projection cannot be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("world bounds have no extent ({width} x {height})")]
    Degenerate { width: f64, height: f64 },
    #[error("canvas image size must be positive, got {0}")]
    InvalidImageSize(f64),
}

/// Projection constants derived once from the world bounds.
///
/// The larger world axis fills `image_size`; both axes share the same `scale`
/// so shapes are never stretched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasMetrics {
    pub bounds: WorldBounds,
    /// Edge of the square canvas, in canvas units.
    pub image_size: f64,
    pub world_width: f64,
    pub world_height: f64,
    /// Canvas units per 100 world units.
    pub scale: f64,
    pub projected_width: f64,
    pub projected_height: f64,
}

impl CanvasMetrics {
    pub fn new(bounds: WorldBounds, image_size: f64) -> Result<Self, BoundsError> {
        if !(image_size > 0.0) {
            return Err(BoundsError::InvalidImageSize(image_size));
        }

        let world_width = bounds.width();
        let world_height = bounds.height();
        let largest = world_width.max(world_height);
        if !(largest > 0.0) {
            return Err(BoundsError::Degenerate {
                width: world_width,
                height: world_height,
            });
        }

        let scale = image_size * 100.0 / largest;

        Ok(Self {
            bounds,
            image_size,
            world_width,
            world_height,
            scale,
            projected_width: world_width / 100.0 * scale,
            projected_height: world_height / 100.0 * scale,
        })
    }

    /// Size of the projected map in canvas units.
    pub fn projected_size(&self) -> egui::Vec2 {
        egui::vec2(self.projected_width as f32, self.projected_height as f32)
    }

    /// Converts a world distance to canvas units.
    pub fn world_to_canvas_len(&self, length: f64) -> f64 {
        length / 100.0 * self.scale
    }

    /// Projects a world location onto the canvas.
    ///
    /// Both game axes run opposite to the canvas axes, so each coordinate is
    /// measured back from the far edge of the projected map.
    pub fn world_to_canvas(&self, location: Location) -> egui::Pos2 {
        let x = self.projected_width - self.world_to_canvas_len(location[0] - self.bounds.min_x);
        let y = self.projected_height - self.world_to_canvas_len(location[1] - self.bounds.min_y);
        egui::pos2(x as f32, y as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual} (diff: {diff})");
    }

    #[test]
    fn square_world_fills_the_canvas() {
        let metrics = CanvasMetrics::new(WorldBounds::square(200_000.0), 8000.0).unwrap();

        assert_close(metrics.scale, 2.0);
        assert_close(metrics.projected_width, 8000.0);
        assert_close(metrics.projected_height, 8000.0);
    }

    #[test]
    fn asymmetric_world_uses_the_larger_axis() {
        let bounds = WorldBounds::new(-200_000.0, 200_000.0, -100_000.0, 100_000.0);
        let metrics = CanvasMetrics::new(bounds, 8000.0).unwrap();

        assert_close(metrics.scale, 2.0);
        assert_close(metrics.projected_width, 8000.0);
        assert_close(metrics.projected_height, 4000.0);
        assert_close(
            metrics.projected_width / metrics.world_width,
            metrics.projected_height / metrics.world_height,
        );
    }

    #[test]
    fn corners_map_to_canvas_edges() {
        let metrics = CanvasMetrics::new(WorldBounds::square(200_000.0), 8000.0).unwrap();

        assert_eq!(
            metrics.world_to_canvas([-200_000.0, -200_000.0, 0.0]),
            egui::pos2(8000.0, 8000.0)
        );
        assert_eq!(
            metrics.world_to_canvas([200_000.0, 200_000.0, 0.0]),
            egui::pos2(0.0, 0.0)
        );
        assert_eq!(metrics.world_to_canvas([0.0, 0.0, 50.0]), egui::pos2(4000.0, 4000.0));
    }

    #[test]
    fn rejects_zero_extent() {
        let err = CanvasMetrics::new(WorldBounds::square(0.0), 8000.0).unwrap_err();
        assert_eq!(
            err,
            BoundsError::Degenerate {
                width: 0.0,
                height: 0.0
            }
        );
    }

    #[test]
    fn one_flat_axis_is_still_projectable() {
        let bounds = WorldBounds::new(-100.0, 100.0, 5.0, 5.0);
        let metrics = CanvasMetrics::new(bounds, 8000.0).unwrap();
        assert_close(metrics.projected_height, 0.0);
        assert_close(metrics.projected_width, 8000.0);
    }

    #[test]
    fn rejects_non_positive_image_size() {
        assert!(matches!(
            CanvasMetrics::new(WorldBounds::square(1.0), 0.0),
            Err(BoundsError::InvalidImageSize(_))
        ));
    }
}
