//! Per-scene owner of featurables and driver of the frame passes.

use std::collections::BTreeMap;

use tessera_core::{DVec2, EngineError, Graphic, Result, Services};
use tracing::{debug, warn};

use crate::{
    featurable::{Featurable, FeaturableId},
    features::Transformable,
};

/// Request issued by a component during a pass, applied once it ends.
#[derive(Debug)]
pub enum HandlerCommand {
    /// Prepare the featurable and make it live at the start of the next pass.
    Add(Featurable),
    /// Remove the featurable at the end of the current pass.
    Remove(FeaturableId),
}

/// Live featurables ordered by identifier.
#[derive(Debug, Default)]
pub struct Featurables {
    live: BTreeMap<FeaturableId, Featurable>,
}

impl Featurables {
    /// Number of live featurables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Reports whether no featurable is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Reports whether the featurable is live.
    #[must_use]
    pub fn contains(&self, id: FeaturableId) -> bool {
        self.live.contains_key(&id)
    }

    /// Borrows a live featurable.
    #[must_use]
    pub fn get(&self, id: FeaturableId) -> Option<&Featurable> {
        self.live.get(&id)
    }

    /// Mutably borrows a live featurable.
    #[must_use]
    pub fn get_mut(&mut self, id: FeaturableId) -> Option<&mut Featurable> {
        self.live.get_mut(&id)
    }

    /// Iterates over live featurables in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Featurable> {
        self.live.values()
    }

    /// Mutably iterates over live featurables in identifier order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Featurable> {
        self.live.values_mut()
    }

    /// Identifiers of live featurables in order.
    #[must_use]
    pub fn ids(&self) -> Vec<FeaturableId> {
        self.live.keys().copied().collect()
    }

    /// First featurable, in identifier order, whose bounds contain `point`.
    #[must_use]
    pub fn find_at(&self, point: DVec2) -> Option<FeaturableId> {
        self.live
            .values()
            .filter(|featurable| !featurable.is_destroyed())
            .find(|featurable| {
                featurable
                    .try_feature::<Transformable>()
                    .is_some_and(|transformable| transformable.bounds().contains(point))
            })
            .map(Featurable::id)
    }
}

/// Component run during the update pass.
pub trait ComponentUpdater {
    /// Updates the live featurables, requesting structural changes through
    /// `commands`.
    fn update(
        &mut self,
        extrp: f64,
        featurables: &mut Featurables,
        services: &Services,
        commands: &mut Vec<HandlerCommand>,
    );
}

/// Component run during the render pass.
pub trait ComponentRenderer {
    /// Draws the live featurables.
    fn render(&mut self, g: &mut dyn Graphic, featurables: &Featurables);
}

/// Owns a scene's featurables and runs its components in registration order.
///
/// Added featurables become live at the start of the next update; removed and
/// destroyed ones are dropped at the end of the update that saw them, so the
/// following render no longer visits them.
#[derive(Default)]
pub struct Handler {
    featurables: Featurables,
    pending: Vec<Featurable>,
    removals: Vec<FeaturableId>,
    updaters: Vec<Box<dyn ComponentUpdater>>,
    renderers: Vec<Box<dyn ComponentRenderer>>,
    commands: Vec<HandlerCommand>,
    next_id: u32,
}

impl Handler {
    /// Creates a handler without components.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an update component.
    pub fn add_updater(&mut self, updater: impl ComponentUpdater + 'static) {
        self.updaters.push(Box::new(updater));
    }

    /// Appends a render component.
    pub fn add_renderer(&mut self, renderer: impl ComponentRenderer + 'static) {
        self.renderers.push(Box::new(renderer));
    }

    /// Reserves a fresh identifier.
    pub fn next_id(&mut self) -> FeaturableId {
        let id = FeaturableId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Creates an empty featurable with a fresh identifier.
    pub fn create(&mut self) -> Featurable {
        Featurable::new(self.next_id())
    }

    /// Prepares a featurable and queues it for the next update.
    pub fn add(&mut self, mut featurable: Featurable, services: &Services) -> Result<FeaturableId> {
        let id = featurable.id();
        if self.featurables.contains(id) || self.pending.iter().any(|queued| queued.id() == id) {
            return Err(EngineError::invalid(
                "handler",
                format!("featurable {id} is added twice"),
            ));
        }
        featurable.prepare(services)?;
        self.next_id = self.next_id.max(id.get().saturating_add(1));
        self.pending.push(featurable);
        Ok(id)
    }

    /// Queues a featurable for removal at the end of the next update.
    ///
    /// A featurable still waiting to go live is dropped without ever being
    /// visited.
    pub fn remove(&mut self, id: FeaturableId) {
        self.removals.push(id);
    }

    /// Live featurables.
    #[must_use]
    pub fn featurables(&self) -> &Featurables {
        &self.featurables
    }

    /// Mutable access to the live featurables.
    #[must_use]
    pub fn featurables_mut(&mut self) -> &mut Featurables {
        &mut self.featurables
    }

    /// Number of featurables waiting to go live.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Runs one update pass.
    pub fn update(&mut self, extrp: f64, services: &Services) {
        for featurable in self.pending.drain(..) {
            let _ = self.featurables.live.insert(featurable.id(), featurable);
        }

        for updater in &mut self.updaters {
            updater.update(extrp, &mut self.featurables, services, &mut self.commands);
        }

        for command in std::mem::take(&mut self.commands) {
            match command {
                HandlerCommand::Add(featurable) => {
                    let id = featurable.id();
                    if let Err(error) = self.add(featurable, services) {
                        warn!(featurable = %id, %error, "discarded featurable added by a component");
                    }
                }
                HandlerCommand::Remove(id) => self.removals.push(id),
            }
        }

        let destroyed: Vec<_> = self
            .featurables
            .iter()
            .filter(|featurable| featurable.is_destroyed())
            .map(Featurable::id)
            .collect();
        self.removals.extend(destroyed);
        for id in self.removals.drain(..) {
            if self.featurables.live.remove(&id).is_some() {
                debug!(featurable = %id, "removed featurable");
            } else if let Some(index) = self.pending.iter().position(|queued| queued.id() == id) {
                let _ = self.pending.remove(index);
                debug!(featurable = %id, "dropped featurable before it went live");
            }
        }
    }

    /// Runs one render pass.
    pub fn render(&mut self, g: &mut dyn Graphic) {
        for renderer in &mut self.renderers {
            renderer.render(g, &self.featurables);
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("featurables", &self.featurables)
            .field("pending", &self.pending)
            .field("updaters", &self.updaters.len())
            .field("renderers", &self.renderers.len())
            .finish()
    }
}
