//! Projectile values.

use std::{fmt, time::Duration};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tessera_core::{DVec2, EngineError, Localizable, Rectangle, Result};
use tessera_feature::FeaturableId;

/// Identifier assigned by [`crate::HandlerProjectile`] when a projectile is added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates an identifier with the provided numeric value.
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

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projectile #{}", self.0)
    }
}

/// Inclusive damage interval rolled on every hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DamageRange {
    /// Lowest damage.
    pub min: u32,
    /// Highest damage.
    pub max: u32,
}

impl DamageRange {
    /// Creates a range, rejecting `min > max`.
    pub fn new(min: u32, max: u32) -> Result<Self> {
        let range = Self { min, max };
        range.validate("damage")?;
        Ok(range)
    }

    /// Rejects inverted ranges.
    pub fn validate(&self, resource: &str) -> Result<()> {
        if self.min > self.max {
            return Err(EngineError::invalid(
                resource,
                format!("damage minimum {} exceeds maximum {}", self.min, self.max),
            ));
        }
        Ok(())
    }

    /// Draws a damage value within the range.
    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        rng.gen_range(self.min..=self.max.max(self.min))
    }
}

/// Shot travelling at a velocity fixed at launch.
///
/// The location is the centre of the projectile's box.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub(crate) id: Option<ProjectileId>,
    owner: FeaturableId,
    target: Option<FeaturableId>,
    damage: DamageRange,
    velocity: DVec2,
    group: Option<u32>,
    pub(crate) delay: Duration,
    location: DVec2,
    old_location: DVec2,
    size: DVec2,
    pub(crate) destroyed: bool,
}

impl Projectile {
    /// Creates a projectile shot by `owner` from `location`.
    #[must_use]
    pub fn new(owner: FeaturableId, location: DVec2, velocity: DVec2, damage: DamageRange) -> Self {
        Self {
            id: None,
            owner,
            target: None,
            damage,
            velocity,
            group: None,
            delay: Duration::ZERO,
            location,
            old_location: location,
            size: DVec2::ONE,
            destroyed: false,
        }
    }

    /// Restricts hits to a single featurable.
    #[must_use]
    pub fn with_target(mut self, target: Option<FeaturableId>) -> Self {
        self.target = target;
        self
    }

    /// Links the projectile to every other projectile of `group`.
    #[must_use]
    pub fn with_group(mut self, group: Option<u32>) -> Self {
        self.group = group;
        self
    }

    /// Keeps the projectile inert for `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the box size.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = DVec2::new(width, height);
        self
    }

    /// Identifier, once added to a handler.
    #[must_use]
    pub const fn id(&self) -> Option<ProjectileId> {
        self.id
    }

    /// Featurable that fired the projectile.
    #[must_use]
    pub const fn owner(&self) -> FeaturableId {
        self.owner
    }

    /// Only featurable the projectile may hit, if restricted.
    #[must_use]
    pub const fn target(&self) -> Option<FeaturableId> {
        self.target
    }

    /// Damage interval.
    #[must_use]
    pub const fn damage(&self) -> DamageRange {
        self.damage
    }

    /// Displacement per tick.
    #[must_use]
    pub const fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Destruction group.
    #[must_use]
    pub const fn group(&self) -> Option<u32> {
        self.group
    }

    /// Remaining inert time.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Reports whether the projectile still waits for its delay.
    #[must_use]
    pub fn is_delayed(&self) -> bool {
        !self.delay.is_zero()
    }

    /// Reports whether the projectile was destroyed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Box around the current location.
    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        let corner = self.location - self.size / 2.0;
        Rectangle::new(corner.x, corner.y, self.size.x, self.size.y)
    }

    pub(crate) fn advance(&mut self, extrp: f64) {
        self.old_location = self.location;
        self.location += self.velocity * extrp;
    }

    pub(crate) fn may_hit(&self, featurable: FeaturableId) -> bool {
        featurable != self.owner && self.target.map_or(true, |target| target == featurable)
    }
}

impl Localizable for Projectile {
    fn location(&self) -> DVec2 {
        self.location
    }

    fn old_location(&self) -> DVec2 {
        self.old_location
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn inverted_damage_is_rejected() {
        assert!(DamageRange::new(5, 2).is_err());
        assert!(DamageRange::new(3, 3).is_ok());
    }

    #[test]
    fn damage_rolls_stay_in_range() {
        let range = DamageRange::new(2, 6).expect("valid range");
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let damage = range.roll(&mut rng);
            assert!((2..=6).contains(&damage), "rolled {damage}");
        }
    }

    #[test]
    fn targeted_projectiles_only_hit_their_target() {
        let damage = DamageRange::new(1, 1).expect("valid range");
        let free = Projectile::new(FeaturableId::new(0), DVec2::ZERO, DVec2::X, damage);
        let aimed = free.clone().with_target(Some(FeaturableId::new(2)));

        assert!(!free.may_hit(FeaturableId::new(0)), "owner is never hit");
        assert!(free.may_hit(FeaturableId::new(1)));
        assert!(!aimed.may_hit(FeaturableId::new(1)));
        assert!(aimed.may_hit(FeaturableId::new(2)));
    }
}
