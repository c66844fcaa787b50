//! Entity identity owning an ordered bag of features.

use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    fmt,
};

use tessera_core::{EngineError, Graphic, Result, Services};

use crate::feature::Feature;

/// Identifier of a featurable, unique within its handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeaturableId(u32);

impl FeaturableId {
    /// Creates an identifier from its numeric representation.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FeaturableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity made of at most one feature per concrete feature type.
pub struct Featurable {
    id: FeaturableId,
    features: Vec<Option<Box<dyn Feature>>>,
    names: Vec<&'static str>,
    index: HashMap<TypeId, usize>,
    destroyed: bool,
}

impl Featurable {
    /// Creates a featurable without features.
    #[must_use]
    pub fn new(id: FeaturableId) -> Self {
        Self {
            id,
            features: Vec::new(),
            names: Vec::new(),
            index: HashMap::new(),
            destroyed: false,
        }
    }

    /// Identifier of the featurable.
    #[must_use]
    pub const fn id(&self) -> FeaturableId {
        self.id
    }

    /// Attaches a feature, rejecting a second feature of the same type.
    pub fn add_feature<T: Feature>(&mut self, feature: T) -> Result<()> {
        let key = TypeId::of::<T>();
        if self.index.contains_key(&key) {
            return Err(EngineError::DuplicateFeature(type_name::<T>()));
        }
        let _ = self.index.insert(key, self.features.len());
        self.features.push(Some(Box::new(feature)));
        self.names.push(type_name::<T>());
        Ok(())
    }

    /// Builder form of [`Featurable::add_feature`].
    pub fn with_feature<T: Feature>(mut self, feature: T) -> Result<Self> {
        self.add_feature(feature)?;
        Ok(self)
    }

    /// Reports whether a feature of type `T` is attached and not detached.
    #[must_use]
    pub fn has_feature<T: Feature>(&self) -> bool {
        self.try_feature::<T>().is_some()
    }

    /// Borrows the feature of type `T`, if attached.
    #[must_use]
    pub fn try_feature<T: Feature>(&self) -> Option<&T> {
        let slot = self.features.get(*self.index.get(&TypeId::of::<T>())?)?;
        slot.as_ref()
            .and_then(|feature| (**feature).as_any().downcast_ref::<T>())
    }

    /// Mutably borrows the feature of type `T`, if attached.
    #[must_use]
    pub fn try_feature_mut<T: Feature>(&mut self) -> Option<&mut T> {
        let position = *self.index.get(&TypeId::of::<T>())?;
        self.features
            .get_mut(position)?
            .as_mut()
            .and_then(|feature| (**feature).as_any_mut().downcast_mut::<T>())
    }

    /// Borrows the feature of type `T`.
    ///
    /// # Panics
    ///
    /// Panics when the feature is missing. Requesting a capability that was
    /// never attached is a composition bug; use [`Featurable::try_feature`]
    /// when absence is expected.
    #[must_use]
    pub fn feature<T: Feature>(&self) -> &T {
        match self.try_feature::<T>() {
            Some(feature) => feature,
            None => panic!("featurable {} has no feature {}", self.id, type_name::<T>()),
        }
    }

    /// Mutably borrows the feature of type `T`.
    ///
    /// # Panics
    ///
    /// Panics when the feature is missing, as [`Featurable::feature`] does.
    #[must_use]
    pub fn feature_mut<T: Feature>(&mut self) -> &mut T {
        let id = self.id;
        match self.try_feature_mut::<T>() {
            Some(feature) => feature,
            None => panic!("featurable {id} has no feature {}", type_name::<T>()),
        }
    }

    /// Borrows the feature of type `T`, reporting its absence as an error.
    pub fn require<T: Feature>(&self) -> Result<&T> {
        self.try_feature::<T>().ok_or(EngineError::MissingFeature {
            featurable: self.id.get(),
            feature: type_name::<T>(),
        })
    }

    /// Type names of the attached features in registration order.
    #[must_use]
    pub fn feature_names(&self) -> &[&'static str] {
        &self.names
    }

    /// Prepares every feature in registration order.
    pub fn prepare(&mut self, services: &Services) -> Result<()> {
        for position in 0..self.features.len() {
            let Some(mut feature) = self.features[position].take() else {
                continue;
            };
            let result = feature.prepare(self, services);
            self.features[position] = Some(feature);
            result?;
        }
        Ok(())
    }

    /// Updates every feature in registration order.
    pub fn update(&mut self, extrp: f64, services: &Services) {
        for position in 0..self.features.len() {
            if let Some(mut feature) = self.features[position].take() {
                feature.update(extrp, self, services);
                self.features[position] = Some(feature);
            }
        }
    }

    /// Renders every feature in registration order.
    pub fn render(&self, g: &mut dyn Graphic) {
        for feature in self.features.iter().flatten() {
            feature.render(g, self);
        }
    }

    /// Marks the featurable for removal at the end of the current pass.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    /// Reports whether [`Featurable::destroy`] was called.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl fmt::Debug for Featurable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Featurable")
            .field("id", &self.id)
            .field("features", &self.names)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
