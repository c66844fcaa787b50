use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tessera_core::Media;
use tessera_raster::{RasterCache, RasterPolicy};
use tracing::info;

/// Writes every raster of `image` under `out`, returning the written paths.
pub(crate) fn run(
    image: &Path,
    definition: &Path,
    count: u32,
    smooth: bool,
    out: &Path,
) -> Result<Vec<PathBuf>> {
    let policy = RasterPolicy::new(count, smooth).context("invalid raster count")?;
    let sheet = Media::from_path(image);
    let pattern = Media::from_path(definition);
    let set = RasterCache::new()
        .load(&sheet, &pattern, policy)
        .with_context(|| format!("failed to generate rasters of {}", image.display()))?;

    fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory {}", out.display()))?;
    let stem = image
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("raster");

    let mut written = Vec::with_capacity(set.rasters().len());
    for (index, raster) in set.rasters().iter().enumerate() {
        let path = out.join(raster_file_name(stem, index));
        raster
            .pixels()
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    info!(rasters = written.len(), out = %out.display(), "wrote rasters");
    Ok(written)
}

fn raster_file_name(stem: &str, index: usize) -> String {
    format!("{stem}_{index:02}.png")
}
