//! Dense tile grid with ray-marched collision search.

use std::sync::Arc;

use tessera_core::{math, EngineError, Localizable, Result};

use crate::{
    collision::{CollisionClass, CollisionId, CollisionTable},
    group::{TileConstraints, TileGroup, TileGroups, TileTransitions},
    tile::Tile,
};

/// Collision found along a probe's movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileHit {
    /// Column of the hit tile.
    pub tx: u32,
    /// Row of the hit tile.
    pub ty: u32,
    /// Vertical collision line crossed, if any.
    pub x: Option<f64>,
    /// Horizontal collision line crossed, if any.
    pub y: Option<f64>,
    /// Collision class of the hit tile.
    pub collision: CollisionId,
}

/// Grid of tiles owned by a level.
///
/// Cells without a tile are empty and never collide.
#[derive(Clone, Debug)]
pub struct MapTile {
    columns: u32,
    rows: u32,
    tile_width: u32,
    tile_height: u32,
    tiles: Vec<Option<Tile>>,
    collisions: CollisionTable,
    groups: TileGroups,
    constraints: TileConstraints,
    transitions: TileTransitions,
}

impl MapTile {
    /// Creates an empty map, sized in tiles, of tiles sized in pixels.
    pub fn new(columns: u32, rows: u32, tile_width: u32, tile_height: u32) -> Result<Self> {
        if tile_width == 0 || tile_height == 0 {
            return Err(EngineError::invalid(
                "map",
                format!("tile size {tile_width}x{tile_height} must be positive"),
            ));
        }
        let cells = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| EngineError::invalid("map", "map does not fit in memory"))?;
        Ok(Self {
            columns,
            rows,
            tile_width,
            tile_height,
            tiles: vec![None; cells],
            collisions: CollisionTable::new(),
            groups: TileGroups::default(),
            constraints: TileConstraints::default(),
            transitions: TileTransitions::default(),
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of a tile in pixels.
    #[must_use]
    pub const fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Height of a tile in pixels.
    #[must_use]
    pub const fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Width of the world in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.columns.saturating_mul(self.tile_width)
    }

    /// Height of the world in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.rows.saturating_mul(self.tile_height)
    }

    /// Tile stored at `(tx, ty)`, `None` when empty or out of bounds.
    #[must_use]
    pub fn tile(&self, tx: u32, ty: u32) -> Option<&Tile> {
        self.index(tx, ty)
            .and_then(|index| self.tiles[index].as_ref())
    }

    /// Stores a tile at its own coordinates, returning the one it replaced.
    pub fn set_tile(&mut self, tile: Tile) -> Result<Option<Tile>> {
        if tile.width() != self.tile_width || tile.height() != self.tile_height {
            return Err(EngineError::invalid(
                "map",
                format!(
                    "tile at {},{} is {}x{} on a {}x{} grid",
                    tile.tx(),
                    tile.ty(),
                    tile.width(),
                    tile.height(),
                    self.tile_width,
                    self.tile_height
                ),
            ));
        }
        let index = self.index(tile.tx(), tile.ty()).ok_or_else(|| {
            EngineError::invalid(
                "map",
                format!(
                    "tile at {},{} lies outside the {}x{} map",
                    tile.tx(),
                    tile.ty(),
                    self.columns,
                    self.rows
                ),
            )
        })?;
        Ok(self.tiles[index].replace(tile))
    }

    /// Replaces the collision class of a tile, reporting whether one was found.
    pub fn set_collision(&mut self, tx: u32, ty: u32, collision: Arc<CollisionClass>) -> bool {
        match self.index(tx, ty).and_then(|index| self.tiles[index].as_mut()) {
            Some(tile) => {
                tile.set_collision(collision);
                true
            }
            None => false,
        }
    }

    /// Column containing the world x coordinate.
    #[must_use]
    pub fn in_tile_x(&self, x: f64) -> Option<u32> {
        to_cell(x, self.tile_width).filter(|tx| *tx < self.columns)
    }

    /// Row containing the world y coordinate.
    #[must_use]
    pub fn in_tile_y(&self, y: f64) -> Option<u32> {
        to_cell(y, self.tile_height).filter(|ty| *ty < self.rows)
    }

    /// Tile under the world coordinates.
    #[must_use]
    pub fn tile_at(&self, x: f64, y: f64) -> Option<&Tile> {
        self.tile(self.in_tile_x(x)?, self.in_tile_y(y)?)
    }

    /// Iterates over every stored tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    /// Collision classes known to the map.
    #[must_use]
    pub fn collisions(&self) -> &CollisionTable {
        &self.collisions
    }

    /// Installs the collision classes used by the map.
    pub fn set_collisions(&mut self, collisions: CollisionTable) {
        self.collisions = collisions;
    }

    /// Tile groups of the map.
    #[must_use]
    pub fn groups(&self) -> &TileGroups {
        &self.groups
    }

    /// Group the tile belongs to, looked up by its graphic.
    #[must_use]
    pub fn group_of(&self, tile: &Tile) -> Option<&TileGroup> {
        self.groups.group_of(tile.sheet(), tile.number())
    }

    /// Neighbour constraints between groups.
    #[must_use]
    pub fn constraints(&self) -> &TileConstraints {
        &self.constraints
    }

    /// Transition tiles between groups.
    #[must_use]
    pub fn transitions(&self) -> &TileTransitions {
        &self.transitions
    }

    /// Installs the group, constraint and transition descriptions.
    pub fn set_layout(
        &mut self,
        groups: TileGroups,
        constraints: TileConstraints,
        transitions: TileTransitions,
    ) {
        self.groups = groups;
        self.constraints = constraints;
        self.transitions = transitions;
    }

    /// First tile along the probe's movement whose collision class is listed.
    ///
    /// The march walks from the old integer pixel position to the current
    /// one, one step per pixel on the dominant axis, and visits at most
    /// `steps + 1` positions.
    #[must_use]
    pub fn first_tile_hit(
        &self,
        probe: &impl Localizable,
        collisions: &[CollisionId],
    ) -> Option<&Tile> {
        self.ray(probe)
            .filter_map(|(tx, ty)| self.tile(tx, ty))
            .find(|tile| collisions.contains(&tile.collision().id()))
    }

    /// First tile along the probe's movement that is listed and whose
    /// collision lines the probe crossed.
    #[must_use]
    pub fn collide(&self, probe: &impl Localizable, collisions: &[CollisionId]) -> Option<TileHit> {
        self.ray(probe)
            .filter_map(|(tx, ty)| self.tile(tx, ty))
            .filter(|tile| collisions.contains(&tile.collision().id()))
            .find_map(|tile| {
                let x = tile.collision_x(probe);
                let y = tile.collision_y(probe);
                (x.is_some() || y.is_some()).then(|| TileHit {
                    tx: tile.tx(),
                    ty: tile.ty(),
                    x,
                    y,
                    collision: tile.collision().id(),
                })
            })
    }

    fn ray(&self, probe: &impl Localizable) -> Ray {
        let old = probe.old_location();
        let current = probe.location();
        let sh = old.x.floor();
        let sv = old.y.floor();
        let eh = current.x.floor();
        let ev = current.y.floor();
        let dv = ev - sv;
        let dh = sh - eh;

        let limit = f64::from(self.width()) + f64::from(self.height());
        let major = dv.abs().max(dh.abs());
        let steps = major.min(limit.max(1.0));
        // Above one pixel only for moves longer than the whole map.
        let stride = if steps > 0.0 { major / steps } else { 0.0 };
        let (step_h, step_v) = if major == 0.0 {
            (0.0, 0.0)
        } else if dv.abs() >= dh.abs() {
            (-dh / major * stride, math::sign(dv) * stride)
        } else {
            (math::sign(-dh) * stride, dv / major * stride)
        };

        Ray {
            h: if steps > 0.0 { sh } else { eh },
            v: if steps > 0.0 { sv } else { ev },
            step_h,
            step_v,
            remaining: steps as u64 + 1,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            last: None,
        }
    }

    fn index(&self, tx: u32, ty: u32) -> Option<usize> {
        if tx < self.columns && ty < self.rows {
            let row = usize::try_from(ty).ok()?;
            let column = usize::try_from(tx).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Tile coordinates visited by a ray march, consecutive repeats removed.
#[derive(Debug)]
struct Ray {
    h: f64,
    v: f64,
    step_h: f64,
    step_v: f64,
    remaining: u64,
    tile_width: u32,
    tile_height: u32,
    last: Option<(u32, u32)>,
}

impl Iterator for Ray {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            self.remaining -= 1;
            let cell = to_cell(self.h, self.tile_width).zip(to_cell(self.v, self.tile_height));
            self.h += self.step_h;
            self.v += self.step_v;

            if let Some(cell) = cell {
                if self.last != Some(cell) {
                    self.last = Some(cell);
                    return Some(cell);
                }
            }
        }
        None
    }
}

fn to_cell(coordinate: f64, size: u32) -> Option<u32> {
    let cell = (coordinate.floor() / f64::from(size)).floor();
    (cell >= 0.0 && cell <= f64::from(u32::MAX)).then_some(cell as u32)
}
