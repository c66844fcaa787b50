//! Featurable constructors registered by type tag.

use std::collections::HashMap;

use tessera_core::{EngineError, Result, Services};

use crate::featurable::{Featurable, FeaturableId};

type Constructor = Box<dyn Fn(FeaturableId, &Services) -> Result<Featurable>>;

/// Maps type tags to featurable constructors, populated at startup.
#[derive(Default)]
pub struct FactoryRegistry {
    constructors: HashMap<String, Constructor>,
}

impl FactoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the constructor for `tag`, reporting whether one was replaced.
    pub fn register(
        &mut self,
        tag: &str,
        constructor: impl Fn(FeaturableId, &Services) -> Result<Featurable> + 'static,
    ) -> bool {
        self.constructors
            .insert(tag.to_owned(), Box::new(constructor))
            .is_some()
    }

    /// Reports whether `tag` has a constructor.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Builds a featurable of type `tag`.
    pub fn create(&self, tag: &str, id: FeaturableId, services: &Services) -> Result<Featurable> {
        let constructor = self
            .constructors
            .get(tag)
            .ok_or_else(|| EngineError::UnknownFactory(tag.to_owned()))?;
        constructor(id, services)
    }

    /// Registered tags in sorted order.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
