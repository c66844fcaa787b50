#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid pathfinding over tile maps and the feature that walks the paths.
//!
//! [`find_path`] runs A* over any [`PathfindableMap`]; [`BlockingMap`] adapts a
//! [`tessera_map::MapTile`] by treating tiles of selected collision classes as
//! walls. [`Pathfindable`] steers a featurable's transformable along the
//! resulting tile centres.

mod grid;
mod search;
mod walker;

pub use grid::{BlockingMap, PathfindableMap, TilePoint};
pub use search::find_path;
pub use walker::Pathfindable;
