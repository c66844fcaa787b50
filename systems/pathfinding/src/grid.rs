//! Grid view consumed by the search.

use std::fmt;

use tessera_core::DVec2;
use tessera_map::{CollisionId, MapTile};

/// Tile coordinate expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePoint {
    /// Column in tiles.
    pub tx: u32,
    /// Row in tiles.
    pub ty: u32,
}

impl TilePoint {
    /// Creates a tile coordinate.
    #[must_use]
    pub const fn new(tx: u32, ty: u32) -> Self {
        Self { tx, ty }
    }

    /// Manhattan distance to `other` in tiles.
    #[must_use]
    pub const fn manhattan_distance(self, other: TilePoint) -> u32 {
        self.tx.abs_diff(other.tx) + self.ty.abs_diff(other.ty)
    }

    /// World-space centre of the tile.
    #[must_use]
    pub fn centre(self, tile_width: u32, tile_height: u32) -> DVec2 {
        DVec2::new(
            (f64::from(self.tx) + 0.5) * f64::from(tile_width),
            (f64::from(self.ty) + 0.5) * f64::from(tile_height),
        )
    }
}

impl fmt::Display for TilePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.tx, self.ty)
    }
}

/// Grid searched by [`crate::find_path`].
pub trait PathfindableMap {
    /// Number of columns.
    fn columns(&self) -> u32;

    /// Number of rows.
    fn rows(&self) -> u32;

    /// Width of a tile in pixels.
    fn tile_width(&self) -> u32;

    /// Height of a tile in pixels.
    fn tile_height(&self) -> u32;

    /// Reports whether the tile cannot be entered.
    fn is_blocked(&self, point: TilePoint) -> bool;

    /// Tile containing the world-space location, if inside the grid.
    fn tile_point(&self, location: DVec2) -> Option<TilePoint> {
        if location.x < 0.0 || location.y < 0.0 {
            return None;
        }
        let tx = (location.x / f64::from(self.tile_width().max(1))).floor();
        let ty = (location.y / f64::from(self.tile_height().max(1))).floor();
        let point = TilePoint::new(tx as u32, ty as u32);
        (point.tx < self.columns() && point.ty < self.rows()).then_some(point)
    }
}

/// [`MapTile`] whose tiles of blocking collision classes are walls.
///
/// Empty cells are walkable.
#[derive(Clone, Copy, Debug)]
pub struct BlockingMap<'a> {
    map: &'a MapTile,
    blocking: &'a [CollisionId],
}

impl<'a> BlockingMap<'a> {
    /// Wraps `map`, blocking tiles whose class is listed in `blocking`.
    #[must_use]
    pub const fn new(map: &'a MapTile, blocking: &'a [CollisionId]) -> Self {
        Self { map, blocking }
    }

    /// Wrapped map.
    #[must_use]
    pub const fn map(&self) -> &'a MapTile {
        self.map
    }
}

impl PathfindableMap for BlockingMap<'_> {
    fn columns(&self) -> u32 {
        self.map.columns()
    }

    fn rows(&self) -> u32 {
        self.map.rows()
    }

    fn tile_width(&self) -> u32 {
        self.map.tile_width()
    }

    fn tile_height(&self) -> u32 {
        self.map.tile_height()
    }

    fn is_blocked(&self, point: TilePoint) -> bool {
        self.map
            .tile(point.tx, point.ty)
            .is_some_and(|tile| self.blocking.contains(&tile.collision().id()))
    }
}
