#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tile maps for the Tessera engine.
//!
//! A [`MapTile`] owns a dense grid of [`Tile`]s. Each tile carries a shared
//! [`CollisionClass`] whose [`CollisionFunction`]s turn a probe's in-tile
//! coordinate into a world-space collision line. [`MapTile::first_tile_hit`]
//! walks the probe's movement tile by tile to find the first interesting
//! tile, and [`MapLoader`] assembles maps from TOML resources.

pub mod collision;
pub mod config;
pub mod group;
pub mod loader;
pub mod map;
pub mod tile;

pub use collision::{
    Axis, CollisionClass, CollisionFunction, CollisionFunctionConfig, CollisionId,
    CollisionTable, Operation, NONE_CLASS,
};
pub use group::{
    Orientation, TileConstraints, TileGroup, TileGroups, TileRange, TileTransitions, Transition,
    TransitionKind,
};
pub use loader::{ConstraintViolation, MapLoader, MapResources};
pub use map::{MapTile, TileHit};
pub use tile::{SheetId, Tile};
