use tessera_core::{DVec2, Localizable, Rectangle};

use crate::feature::Feature;

/// Location and size of a featurable.
///
/// The location is the top-left corner of the bounds. Every move records
/// the previous location so collision queries can inspect the movement.
#[derive(Clone, Debug, PartialEq)]
pub struct Transformable {
    location: DVec2,
    old_location: DVec2,
    width: f64,
    height: f64,
}

impl Transformable {
    /// Creates a transformable resting at `location`.
    #[must_use]
    pub fn new(location: DVec2, width: f64, height: f64) -> Self {
        Self {
            location,
            old_location: location,
            width,
            height,
        }
    }

    /// Width in world units.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Height in world units.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Moves by `velocity * extrp`.
    pub fn move_location(&mut self, extrp: f64, velocity: DVec2) {
        self.old_location = self.location;
        self.location += velocity * extrp;
    }

    /// Moves to `location`, remembering where the move started.
    pub fn set_location(&mut self, location: DVec2) {
        self.old_location = self.location;
        self.location = location;
    }

    /// Places the transformable at `location` without any movement.
    pub fn teleport(&mut self, location: DVec2) {
        self.location = location;
        self.old_location = location;
    }

    /// Bounds at the current location.
    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.location.x, self.location.y, self.width, self.height)
    }
}

impl Localizable for Transformable {
    fn location(&self) -> DVec2 {
        self.location
    }

    fn old_location(&self) -> DVec2 {
        self.old_location
    }
}

impl Feature for Transformable {}
