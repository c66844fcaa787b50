//! Explicit per-scene dependency registry.

use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    fmt,
};

use crate::{EngineError, Result};

/// Typed registry of shared scene objects.
///
/// A scene builds one registry, hands it to every feature while preparing,
/// and drops it together with the scene. Each type is stored at most once.
#[derive(Default)]
pub struct Services {
    entries: HashMap<TypeId, Entry>,
}

struct Entry {
    name: &'static str,
    value: Box<dyn Any>,
}

impl Services {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service, returning the value it replaced, if any.
    pub fn add<T: Any>(&mut self, service: T) -> Option<T> {
        let previous = self.entries.insert(
            TypeId::of::<T>(),
            Entry {
                name: type_name::<T>(),
                value: Box::new(service),
            },
        );
        previous
            .and_then(|entry| entry.value.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Retrieves a service that must be present.
    pub fn get<T: Any>(&self) -> Result<&T> {
        self.try_get::<T>()
            .ok_or(EngineError::MissingService(type_name::<T>()))
    }

    /// Retrieves a service if registered.
    #[must_use]
    pub fn try_get<T: Any>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    /// Retrieves a mutable service if registered.
    #[must_use]
    pub fn try_get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_mut::<T>())
    }

    /// Reports whether a service is registered.
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.values().map(|entry| entry.name).collect();
        names.sort_unstable();
        f.debug_struct("Services").field("entries", &names).finish()
    }
}
