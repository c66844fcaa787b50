//! Built-in handler components.

use tessera_core::{Graphic, Rectangle, Services};

use crate::{
    featurable::FeaturableId,
    features::{Collidable, Transformable},
    handler::{ComponentRenderer, ComponentUpdater, Featurables, HandlerCommand},
};

/// Updates every feature of every live featurable.
#[derive(Debug, Default)]
pub struct ComponentRefreshable;

impl ComponentUpdater for ComponentRefreshable {
    fn update(
        &mut self,
        extrp: f64,
        featurables: &mut Featurables,
        services: &Services,
        _commands: &mut Vec<HandlerCommand>,
    ) {
        for featurable in featurables.iter_mut() {
            featurable.update(extrp, services);
        }
    }
}

#[derive(Debug)]
struct CollisionEntry {
    id: FeaturableId,
    bounds: Rectangle,
    group: u32,
}

/// Records contacts between overlapping [`Collidable`]s.
///
/// Contacts are one-sided: a collidable only records a contact when it
/// accepts the other collidable's group.
#[derive(Debug, Default)]
pub struct ComponentCollision {
    entries: Vec<CollisionEntry>,
}

impl ComponentUpdater for ComponentCollision {
    fn update(
        &mut self,
        _extrp: f64,
        featurables: &mut Featurables,
        _services: &Services,
        _commands: &mut Vec<HandlerCommand>,
    ) {
        self.entries.clear();
        for featurable in featurables.iter_mut() {
            if featurable.is_destroyed() {
                continue;
            }
            let located = featurable.try_feature::<Transformable>().and_then(|transformable| {
                featurable
                    .try_feature::<Collidable>()
                    .map(|collidable| (collidable.bounds(transformable), collidable.group()))
            });
            let Some((bounds, group)) = located else {
                continue;
            };
            if let Some(collidable) = featurable.try_feature_mut::<Collidable>() {
                collidable.clear_contacts();
            }
            self.entries.push(CollisionEntry {
                id: featurable.id(),
                bounds,
                group,
            });
        }

        for (position, first) in self.entries.iter().enumerate() {
            for second in &self.entries[position + 1..] {
                if !first.bounds.intersects(&second.bounds) {
                    continue;
                }
                record(featurables, first.id, second);
                record(featurables, second.id, first);
            }
        }
    }
}

fn record(featurables: &mut Featurables, id: FeaturableId, other: &CollisionEntry) {
    if let Some(collidable) = featurables
        .get_mut(id)
        .and_then(|featurable| featurable.try_feature_mut::<Collidable>())
    {
        if collidable.accepts(other.group) {
            collidable.add_contact(other.id);
        }
    }
}

/// Renders every live featurable in identifier order.
#[derive(Debug, Default)]
pub struct ComponentRendererLayer;

impl ComponentRenderer for ComponentRendererLayer {
    fn render(&mut self, g: &mut dyn Graphic, featurables: &Featurables) {
        for featurable in featurables.iter() {
            featurable.render(g);
        }
    }
}
