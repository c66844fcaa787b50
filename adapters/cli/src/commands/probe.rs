use std::{fmt::Write, path::Path};

use anyhow::{Context, Result};
use tessera_core::{Probe, ResourceRoot};
use tessera_map::{MapLoader, MapResources, MapTile};

use super::Point;

/// Loads a level and describes the first collision of the movement.
pub(crate) fn run(
    resources: &Path,
    level: &str,
    from: Point,
    to: Point,
    collisions: &[String],
) -> Result<String> {
    let root = ResourceRoot::new(resources);
    let loader = MapLoader::from_resources(&root, &MapResources::standard(&root))
        .with_context(|| format!("failed to load tile set from {}", resources.display()))?;
    let map = loader
        .load_level(&root.media(level))
        .with_context(|| format!("failed to load level {level}"))?;
    describe(&map, from, to, collisions)
}

fn describe(map: &MapTile, from: Point, to: Point, collisions: &[String]) -> Result<String> {
    let names: Vec<_> = collisions.iter().map(String::as_str).collect();
    let ids = map.collisions().ids(&names)?;
    let probe = Probe::new(from.0, to.0);

    let mut report = String::new();
    match map.first_tile_hit(&probe, &ids) {
        Some(tile) => writeln!(
            report,
            "first listed tile: ({}, {}) {}",
            tile.tx(),
            tile.ty(),
            tile.collision().name()
        )?,
        None => writeln!(report, "first listed tile: none")?,
    }
    match map.collide(&probe, &ids) {
        Some(hit) => {
            let line = |value: Option<f64>| value.map_or_else(|| "-".to_owned(), |v| v.to_string());
            write!(
                report,
                "collision: ({}, {}) x={} y={}",
                hit.tx,
                hit.ty,
                line(hit.x),
                line(hit.y)
            )?;
        }
        None => write!(report, "collision: none from {from} to {to}")?,
    }
    Ok(report)
}
