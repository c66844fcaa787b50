//! Memoized raster sets.

use std::{collections::HashMap, sync::Arc};

use tessera_core::{Media, Result};
use tracing::debug;

use crate::{definition::RasterDefinition, policy::RasterPolicy, set::RasterSet};

/// Identifies a raster set by its sheet image and raster pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RasterKey {
    /// Logical name of the source image.
    pub sheet: String,
    /// Logical name of the raster definition.
    pub pattern: String,
}

impl RasterKey {
    /// Key of the set generated from two resources.
    #[must_use]
    pub fn new(sheet: &Media, pattern: &Media) -> Self {
        Self {
            sheet: sheet.name().to_owned(),
            pattern: pattern.name().to_owned(),
        }
    }
}

/// Scene-owned cache handing out shared raster sets.
#[derive(Debug, Default)]
pub struct RasterCache {
    sets: HashMap<RasterKey, Arc<RasterSet>>,
}

impl RasterCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached set for `key`, generating it on the first request.
    pub fn get_or_generate(
        &mut self,
        key: RasterKey,
        generate: impl FnOnce() -> Result<RasterSet>,
    ) -> Result<Arc<RasterSet>> {
        if let Some(set) = self.sets.get(&key) {
            return Ok(Arc::clone(set));
        }
        let set = Arc::new(generate()?);
        debug!(
            sheet = %key.sheet,
            pattern = %key.pattern,
            rasters = set.rasters().len(),
            "generated raster set"
        );
        let _ = self.sets.insert(key, Arc::clone(&set));
        Ok(set)
    }

    /// Loads a sheet and raster definition, generating their set once.
    pub fn load(
        &mut self,
        sheet: &Media,
        pattern: &Media,
        policy: RasterPolicy,
    ) -> Result<Arc<RasterSet>> {
        self.get_or_generate(RasterKey::new(sheet, pattern), || {
            let definition: RasterDefinition = pattern.read_config()?;
            let ramps = definition.ramps(pattern.name())?;
            let source = sheet.read_image()?;
            Ok(RasterSet::generate(source, &ramps, policy))
        })
    }

    /// Cached set for `key`, if generated.
    #[must_use]
    pub fn get(&self, key: &RasterKey) -> Option<&Arc<RasterSet>> {
        self.sets.get(key)
    }

    /// Number of cached sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Reports whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
