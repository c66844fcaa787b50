//! Capability trait implemented by every feature.

use std::any::Any;

use tessera_core::{Graphic, Result, Services};

use crate::featurable::Featurable;

/// Upcasts a concrete feature for typed lookups.
pub trait AsAny {
    /// Borrows the value as [`Any`].
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrows the value as [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Single capability attached to a [`Featurable`].
///
/// While a feature is prepared or updated it is detached from its owner, so
/// the owner handed in exposes every sibling but not the feature itself.
pub trait Feature: AsAny + 'static {
    /// Wires references to sibling features and scene services.
    ///
    /// Called once, in registration order, before the owner goes live.
    fn prepare(&mut self, owner: &mut Featurable, services: &Services) -> Result<()> {
        let _ = (owner, services);
        Ok(())
    }

    /// Advances the feature by one frame.
    fn update(&mut self, extrp: f64, owner: &mut Featurable, services: &Services) {
        let _ = (extrp, owner, services);
    }

    /// Draws the feature.
    fn render(&self, g: &mut dyn Graphic, owner: &Featurable) {
        let _ = (g, owner);
    }
}
