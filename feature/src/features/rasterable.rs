use std::sync::Arc;

use tessera_core::{Graphic, Localizable, Result, Services};
use tessera_raster::RasterSet;

use crate::{feature::Feature, featurable::Featurable};

use super::Transformable;

/// Draws the raster of a shared set selected by the owner's height.
#[derive(Clone, Debug)]
pub struct Rasterable {
    set: Arc<RasterSet>,
    raster_height: u32,
    index: usize,
}

impl Rasterable {
    /// Creates a rasterable switching raster every `raster_height` pixels.
    #[must_use]
    pub fn new(set: Arc<RasterSet>, raster_height: u32) -> Self {
        Self {
            set,
            raster_height: raster_height.max(1),
            index: 0,
        }
    }

    /// Index of the raster selected during the last update.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Shared raster set.
    #[must_use]
    pub fn set(&self) -> &Arc<RasterSet> {
        &self.set
    }
}

impl Feature for Rasterable {
    fn prepare(&mut self, owner: &mut Featurable, _services: &Services) -> Result<()> {
        let transformable = owner.require::<Transformable>()?;
        self.index = self
            .set
            .raster_index(transformable.location().y, self.raster_height);
        Ok(())
    }

    fn update(&mut self, _extrp: f64, owner: &mut Featurable, _services: &Services) {
        if let Some(transformable) = owner.try_feature::<Transformable>() {
            self.index = self
                .set
                .raster_index(transformable.location().y, self.raster_height);
        }
    }

    fn render(&self, g: &mut dyn Graphic, owner: &Featurable) {
        let Some(transformable) = owner.try_feature::<Transformable>() else {
            return;
        };
        let image = self.set.raster(self.index).unwrap_or(self.set.source());
        let location = transformable.location();
        g.draw_image(image, location.x.floor() as i32, location.y.floor() as i32);
    }
}
