//! Generated raster variants of one source image.

use tessera_core::Image;

use crate::{definition::ChannelRamp, generate::generate, policy::RasterPolicy};

/// Source image together with its rasters.
#[derive(Clone, Debug)]
pub struct RasterSet {
    source: Image,
    rasters: Vec<Image>,
    policy: RasterPolicy,
}

impl RasterSet {
    /// Generates the rasters of `source`.
    #[must_use]
    pub fn generate(source: Image, ramps: &[ChannelRamp; 3], policy: RasterPolicy) -> Self {
        let rasters = generate(&source, ramps, policy);
        Self {
            source,
            rasters,
            policy,
        }
    }

    /// Unmodified source image.
    #[must_use]
    pub fn source(&self) -> &Image {
        &self.source
    }

    /// Generated rasters in lookup order.
    #[must_use]
    pub fn rasters(&self) -> &[Image] {
        &self.rasters
    }

    /// Policy the set was generated with.
    #[must_use]
    pub const fn policy(&self) -> RasterPolicy {
        self.policy
    }

    /// Index of the raster selected at vertical position `y`.
    #[must_use]
    pub fn raster_index(&self, y: f64, raster_height: u32) -> usize {
        self.policy.index(y, raster_height)
    }

    /// Raster at `index`.
    #[must_use]
    pub fn raster(&self, index: usize) -> Option<&Image> {
        self.rasters.get(index)
    }

    /// Raster selected at vertical position `y`.
    #[must_use]
    pub fn raster_for(&self, y: f64, raster_height: u32) -> &Image {
        self.raster(self.raster_index(y, raster_height))
            .unwrap_or(&self.source)
    }
}
