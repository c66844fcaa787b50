//! Feature walking featurables along tile paths.

use std::collections::VecDeque;

use tessera_core::{DVec2, EngineError, Localizable, Result, Services};
use tessera_feature::{Feature, Featurable, Transformable};
use tracing::debug;

use crate::{
    grid::{PathfindableMap, TilePoint},
    search::find_path,
};

/// Moves the owner's [`Transformable`] from tile centre to tile centre.
///
/// The transformable's bounds are centred on each tile of the path in turn,
/// advancing `speed` pixels per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Pathfindable {
    speed: f64,
    centre: DVec2,
    half_size: DVec2,
    tile_size: (u32, u32),
    path: VecDeque<TilePoint>,
    destination: Option<TilePoint>,
}

impl Pathfindable {
    /// Creates a walker moving `speed` pixels per tick.
    pub fn new(speed: f64) -> Result<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(EngineError::invalid(
                "pathfindable",
                format!("speed {speed} must be positive"),
            ));
        }
        Ok(Self {
            speed,
            centre: DVec2::ZERO,
            half_size: DVec2::ZERO,
            tile_size: (1, 1),
            path: VecDeque::new(),
            destination: None,
        })
    }

    /// Plans a path from the owner's current tile to `destination`.
    ///
    /// Returns `false` and keeps the previous route when the owner is outside
    /// the map or no path exists.
    pub fn set_destination(&mut self, map: &impl PathfindableMap, destination: TilePoint) -> bool {
        let Some(from) = map.tile_point(self.centre) else {
            debug!(%destination, "pathfindable is outside the map");
            return false;
        };
        let Some(path) = find_path(map, from, destination) else {
            debug!(%from, %destination, "no path to destination");
            return false;
        };
        debug!(%from, %destination, steps = path.len(), "planned path");
        self.tile_size = (map.tile_width(), map.tile_height());
        self.path = path.into();
        self.destination = Some(destination);
        true
    }

    /// Abandons the current route.
    pub fn stop(&mut self) {
        self.path.clear();
        self.destination = None;
    }

    /// Reports whether tiles remain on the route.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        !self.path.is_empty()
    }

    /// Destination of the current route.
    #[must_use]
    pub const fn destination(&self) -> Option<TilePoint> {
        self.destination
    }

    /// Tiles still to be reached, next first.
    pub fn remaining(&self) -> impl Iterator<Item = &TilePoint> {
        self.path.iter()
    }

    fn track(&mut self, transformable: &Transformable) {
        self.half_size = DVec2::new(transformable.width(), transformable.height()) / 2.0;
        self.centre = transformable.location() + self.half_size;
    }
}

impl Feature for Pathfindable {
    fn prepare(&mut self, owner: &mut Featurable, _services: &Services) -> Result<()> {
        let transformable = owner.require::<Transformable>()?;
        self.track(transformable);
        Ok(())
    }

    fn update(&mut self, extrp: f64, owner: &mut Featurable, _services: &Services) {
        let Some(transformable) = owner.try_feature_mut::<Transformable>() else {
            return;
        };
        self.track(transformable);

        let Some(next) = self.path.front().copied() else {
            return;
        };
        let target = next.centre(self.tile_size.0, self.tile_size.1);
        let offset = target - self.centre;
        let step = self.speed * extrp.max(0.0);
        let distance = offset.length();

        let centre = if distance <= step {
            let _ = self.path.pop_front();
            if self.path.is_empty() {
                self.destination = None;
            }
            target
        } else {
            self.centre + offset / distance * step
        };
        transformable.set_location(centre - self.half_size);
        self.centre = centre;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_must_be_positive() {
        assert!(Pathfindable::new(0.0).is_err());
        assert!(Pathfindable::new(f64::NAN).is_err());
        assert!(Pathfindable::new(1.5).is_ok());
    }
}
