use tessera_core::{DVec2, Localizable, Rectangle, Result, Services};

use crate::{
    feature::Feature,
    featurable::{Featurable, FeaturableId},
};

use super::Transformable;

/// Collision box attached to a [`Transformable`].
///
/// A collidable belongs to one group and reports contacts only with
/// collidables whose group it accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct Collidable {
    offset: DVec2,
    width: f64,
    height: f64,
    group: u32,
    accepts: Vec<u32>,
    contacts: Vec<FeaturableId>,
}

impl Collidable {
    /// Creates a box of the given size in `group`.
    #[must_use]
    pub fn new(width: f64, height: f64, group: u32) -> Self {
        Self {
            offset: DVec2::ZERO,
            width,
            height,
            group,
            accepts: Vec::new(),
            contacts: Vec::new(),
        }
    }

    /// Shifts the box relative to the transformable location.
    #[must_use]
    pub fn with_offset(mut self, offset: DVec2) -> Self {
        self.offset = offset;
        self
    }

    /// Declares the groups this collidable reacts to.
    #[must_use]
    pub fn accepting(mut self, groups: &[u32]) -> Self {
        self.accepts = groups.to_vec();
        self
    }

    /// Collision group.
    #[must_use]
    pub const fn group(&self) -> u32 {
        self.group
    }

    /// Reports whether contacts with `group` are reported.
    #[must_use]
    pub fn accepts(&self, group: u32) -> bool {
        self.accepts.contains(&group)
    }

    /// World-space box for the transformable's current location.
    #[must_use]
    pub fn bounds(&self, transformable: &Transformable) -> Rectangle {
        let origin = transformable.location() + self.offset;
        Rectangle::new(origin.x, origin.y, self.width, self.height)
    }

    /// Featurables touched during the last collision pass.
    #[must_use]
    pub fn contacts(&self) -> &[FeaturableId] {
        &self.contacts
    }

    /// Reports whether the last pass found a contact with `other`.
    #[must_use]
    pub fn is_colliding_with(&self, other: FeaturableId) -> bool {
        self.contacts.contains(&other)
    }

    pub(crate) fn clear_contacts(&mut self) {
        self.contacts.clear();
    }

    pub(crate) fn add_contact(&mut self, other: FeaturableId) {
        self.contacts.push(other);
    }
}

impl Feature for Collidable {
    fn prepare(&mut self, owner: &mut Featurable, _services: &Services) -> Result<()> {
        let _ = owner.require::<Transformable>()?;
        Ok(())
    }
}
