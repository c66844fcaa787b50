use std::path::Path;

use anyhow::{Context, Result};
use tessera_core::{DVec2, Graphic, Image, Media, Rectangle, ResourceRoot};
use tessera_map::{MapLoader, MapResources, MapTile};
use tessera_rendering_macroquad::{Viewer, ViewerControl};
use tessera_system_background::{Background, Parallax};
use tracing::{info, warn};

/// Camera pixels per tick while an arrow key is held.
const SCROLL_SPEED: f64 = 4.0;
const PARALLAX_COEFFICIENT: f64 = 0.25;

/// Opens a window showing the level over a parallax background.
pub(crate) fn run(resources: &Path, level: &str, background: &Path, bands: u32) -> Result<()> {
    let root = ResourceRoot::new(resources);
    let loader = MapLoader::from_resources(&root, &MapResources::standard(&root))
        .with_context(|| format!("failed to load tile set from {}", resources.display()))?;
    let map = loader
        .load_level(&root.media(level))
        .with_context(|| format!("failed to load level {level}"))?;
    for violation in loader.violations(&map) {
        warn!(?violation, "tile placed next to a disallowed neighbour");
    }
    let sheets = loader
        .sheets()
        .iter()
        .map(Media::read_image)
        .collect::<tessera_core::Result<Vec<_>>>()
        .context("failed to load tile sheets")?;
    let sprite = Media::from_path(background)
        .read_image()
        .with_context(|| format!("failed to load background {}", background.display()))?;

    let mut scenery = Background::new(0.0, f64::from(map.height().max(1)), f64::from(sprite.height()))?;
    scenery.add_component(Parallax::new(sprite, bands, PARALLAX_COEFFICIENT, 0.0, 0.0));
    info!(
        columns = map.columns(),
        rows = map.rows(),
        sheets = sheets.len(),
        "opening viewer"
    );

    let limit = DVec2::new(f64::from(map.width()), f64::from(map.height()));
    let mut camera = DVec2::ZERO;
    Viewer::new(format!("tessera - {level}")).run(move |input, graphic| {
        camera = (camera + input.direction * SCROLL_SPEED * input.extrp).clamp(DVec2::ZERO, limit);
        scenery.update(input.direction.x * SCROLL_SPEED, camera.y, input.extrp);
        scenery.render(graphic);
        draw_map(graphic, &map, &sheets, camera);
        ViewerControl::Continue
    })
}

fn draw_map(g: &mut dyn Graphic, map: &MapTile, sheets: &[Image], camera: DVec2) {
    let width = map.tile_width();
    let height = map.tile_height();
    for tile in map.tiles() {
        let Some(sheet) = usize::try_from(tile.sheet().get())
            .ok()
            .and_then(|index| sheets.get(index))
        else {
            continue;
        };
        let columns = (sheet.width() / width).max(1);
        let source = Rectangle::new(
            f64::from((tile.number() % columns) * width),
            f64::from((tile.number() / columns) * height),
            f64::from(width),
            f64::from(height),
        );
        g.draw_image_region(
            sheet,
            source,
            (tile.x() - camera.x).floor() as i32,
            (tile.y() - camera.y).floor() as i32,
        );
    }
}
