//! Geometry shared by the map, features and projectiles.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world units, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rectangle {
    /// Creates a rectangle from its top-left corner and extents.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Reports whether two rectangles overlap. Touching edges do not overlap.
    #[must_use]
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Reports whether the point lies inside the rectangle (right/bottom exclusive).
    #[must_use]
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Anything with a current and a previous location.
///
/// Collision queries compare both positions to detect lines crossed between
/// two frames.
pub trait Localizable {
    /// Location in the current frame.
    fn location(&self) -> DVec2;

    /// Location in the previous frame.
    fn old_location(&self) -> DVec2;
}

/// Plain [`Localizable`] value used for ad-hoc collision queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    old: DVec2,
    current: DVec2,
}

impl Probe {
    /// Creates a probe moving from `old` to `current`.
    #[must_use]
    pub const fn new(old: DVec2, current: DVec2) -> Self {
        Self { old, current }
    }

    /// Creates a probe that did not move.
    #[must_use]
    pub const fn at(location: DVec2) -> Self {
        Self::new(location, location)
    }
}

impl Localizable for Probe {
    fn location(&self) -> DVec2 {
        self.current
    }

    fn old_location(&self) -> DVec2 {
        self.old
    }
}
