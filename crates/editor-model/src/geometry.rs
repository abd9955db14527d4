//! Pixel geometry for the overlay box.
//!
//! All values are in source-video pixels with `(0, 0)` at the top-left
//! corner of the container the overlay is dragged within.

use serde::{Deserialize, Serialize};

/// Top-left offset of the overlay box inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Size of the overlay box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

/// The region the overlay box is confined to while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp a requested drag target so the box stays inside `container`.
    ///
    /// A box larger than the container pins to the origin on that axis.
    /// Non-finite coordinates collapse to zero.
    pub fn bounded(x: f64, y: f64, size: BoxSize, container: Container) -> Self {
        Self {
            x: clamp_axis(x, size.width, container.width),
            y: clamp_axis(y, size.height, container.height),
        }
    }

    /// Whether the point lies within `[0, w] x [0, h]` of the container.
    pub fn is_within(&self, container: Container) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.x <= container.width && self.y <= container.height
    }
}

impl Container {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

fn clamp_axis(value: f64, extent: f64, limit: f64) -> f64 {
    let value = if value.is_finite() { value } else { 0.0 };
    let max = (limit - extent).max(0.0);
    value.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: BoxSize = BoxSize {
        width: 300.0,
        height: 100.0,
    };

    #[test]
    fn test_bounded_inside_is_unchanged() {
        let pos = Position::bounded(120.0, 40.0, BOX, Container::new(1920.0, 1080.0));
        assert_eq!(pos, Position::new(120.0, 40.0));
    }

    #[test]
    fn test_bounded_clamps_right_and_bottom_edges() {
        let pos = Position::bounded(5000.0, 5000.0, BOX, Container::new(1920.0, 1080.0));
        assert_eq!(pos, Position::new(1620.0, 980.0));
    }

    #[test]
    fn test_bounded_clamps_negative() {
        let pos = Position::bounded(-10.0, -0.5, BOX, Container::new(1920.0, 1080.0));
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn test_oversized_box_pins_to_origin() {
        let pos = Position::bounded(50.0, 50.0, BOX, Container::new(200.0, 80.0));
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn test_nan_collapses_to_zero() {
        let pos = Position::bounded(f64::NAN, f64::INFINITY, BOX, Container::new(640.0, 480.0));
        assert_eq!(pos, Position::default());
    }
}
