//! Dedicated pass moving projectiles and resolving their hits.

use std::{collections::HashSet, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tessera_core::{Graphic, Localizable, Rectangle};
use tessera_feature::{Collidable, FeaturableId, Featurables, Transformable};
use tracing::debug;

use crate::{
    launcher::ProjectileGroups,
    projectile::{Projectile, ProjectileId},
};

/// Hit resolved during a projectile pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileHit {
    /// Projectile that hit.
    pub projectile: ProjectileId,
    /// Featurable that fired it.
    pub owner: FeaturableId,
    /// Featurable that was hit.
    pub target: FeaturableId,
    /// Rolled damage.
    pub damage: u32,
}

/// Owns the live projectiles of a scene.
///
/// Projectiles added between passes join at the start of the next
/// [`HandlerProjectile::update`]. Damage rolls come from a seeded generator so
/// identical inputs produce identical hits.
#[derive(Debug)]
pub struct HandlerProjectile {
    rng: ChaCha8Rng,
    bounds: Rectangle,
    pending: Vec<Projectile>,
    live: Vec<Projectile>,
    next_id: u32,
    groups: ProjectileGroups,
}

impl HandlerProjectile {
    /// Creates a handler keeping projectiles within `bounds`.
    #[must_use]
    pub fn new(seed: u64, bounds: Rectangle) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            bounds,
            pending: Vec::new(),
            live: Vec::new(),
            next_id: 0,
            groups: ProjectileGroups::new(),
        }
    }

    /// Group source for the launchers feeding this handler.
    pub fn groups(&mut self) -> &mut ProjectileGroups {
        &mut self.groups
    }

    /// Queues a projectile, returning its identifier.
    pub fn add(&mut self, mut projectile: Projectile) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        projectile.id = Some(id);
        self.pending.push(projectile);
        id
    }

    /// Queues every projectile of a launch.
    pub fn add_all(&mut self, projectiles: impl IntoIterator<Item = Projectile>) {
        for projectile in projectiles {
            let _ = self.add(projectile);
        }
    }

    /// Live projectiles.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.live
    }

    /// Number of projectiles waiting for the next pass.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Area outside of which projectiles are destroyed.
    #[must_use]
    pub const fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Runs one projectile pass against the featurables of the scene.
    ///
    /// Delayed projectiles only count `dt` off their delay. Active ones move,
    /// die when leaving the bounds and are tested against every live
    /// featurable carrying a [`Collidable`] and a [`Transformable`], the owner
    /// excepted. A projectile stops at its first counted hit. Every
    /// projectile sharing a group with a destroyed one is destroyed in the
    /// same pass, then destroyed projectiles are dropped.
    pub fn update(
        &mut self,
        dt: Duration,
        extrp: f64,
        featurables: &Featurables,
        hits: &mut Vec<ProjectileHit>,
    ) {
        self.live.append(&mut self.pending);

        let boxes: Vec<_> = featurables
            .iter()
            .filter(|featurable| !featurable.is_destroyed())
            .filter_map(|featurable| {
                let transformable = featurable.try_feature::<Transformable>()?;
                let collidable = featurable.try_feature::<Collidable>()?;
                Some((featurable.id(), collidable.bounds(transformable)))
            })
            .collect();

        for projectile in &mut self.live {
            if projectile.destroyed {
                continue;
            }
            if projectile.is_delayed() {
                projectile.delay = projectile.delay.saturating_sub(dt);
                continue;
            }

            projectile.advance(extrp);
            if !self.bounds.contains(projectile.location()) {
                projectile.destroyed = true;
                continue;
            }

            let area = projectile.bounds();
            let struck = boxes
                .iter()
                .find(|(id, bounds)| projectile.may_hit(*id) && bounds.intersects(&area));
            if let (Some((target, _)), Some(id)) = (struck, projectile.id) {
                let damage = projectile.damage().roll(&mut self.rng);
                hits.push(ProjectileHit {
                    projectile: id,
                    owner: projectile.owner(),
                    target: *target,
                    damage,
                });
                projectile.destroyed = true;
            }
        }

        let groups: HashSet<u32> = self
            .live
            .iter()
            .filter(|projectile| projectile.destroyed)
            .filter_map(Projectile::group)
            .collect();
        if !groups.is_empty() {
            for projectile in &mut self.live {
                if projectile.group().is_some_and(|group| groups.contains(&group)) {
                    projectile.destroyed = true;
                }
            }
        }

        let before = self.live.len();
        self.live.retain(|projectile| !projectile.destroyed);
        let removed = before - self.live.len();
        if removed > 0 {
            debug!(removed, live = self.live.len(), "removed projectiles");
        }
    }

    /// Draws every active projectile as a filled box.
    pub fn render(&self, g: &mut dyn Graphic) {
        for projectile in self.live.iter().filter(|projectile| !projectile.is_delayed()) {
            g.draw_rect(projectile.bounds(), true);
        }
    }
}
