//! Rate-limited projectile launchers and their firing patterns.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use tessera_core::{check_version, Clock, DVec2, EngineError, Result, Timing};
use tessera_feature::FeaturableId;
use tracing::debug;

use crate::projectile::{DamageRange, Projectile};

/// Shooter and muzzle location of a launch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchOrigin {
    /// Featurable firing the shot.
    pub owner: FeaturableId,
    /// Location projectiles start from.
    pub location: DVec2,
}

/// Featurable aimed at by a launch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchTarget {
    /// Aimed featurable.
    pub id: FeaturableId,
    /// Location aimed at.
    pub location: DVec2,
}

/// Scene-wide source of projectile destruction groups.
///
/// Every launcher feeding one [`crate::HandlerProjectile`] must draw from the
/// same source, usually [`crate::HandlerProjectile::groups`], so groups of
/// different launchers never share an id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectileGroups {
    next: u32,
}

impl ProjectileGroups {
    /// Creates a source starting at group 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Hands out a group id not returned before by this source.
    pub fn allocate(&mut self) -> u32 {
        let group = self.next;
        self.next = self.next.wrapping_add(1);
        group
    }
}

/// Projectile factory handed to a [`LaunchPattern`] for one shot.
#[derive(Debug)]
pub struct LaunchContext<'a> {
    origin: LaunchOrigin,
    target: Option<LaunchTarget>,
    damage: DamageRange,
    size: DVec2,
    groups: &'a mut ProjectileGroups,
    out: &'a mut Vec<Projectile>,
}

impl LaunchContext<'_> {
    /// Allocates a destruction group unique within the scene.
    pub fn new_group(&mut self) -> u32 {
        self.groups.allocate()
    }

    /// Shooter and muzzle location.
    #[must_use]
    pub const fn origin(&self) -> LaunchOrigin {
        self.origin
    }

    /// Target of the launch, if aimed.
    #[must_use]
    pub const fn target(&self) -> Option<LaunchTarget> {
        self.target
    }

    /// Emits a projectile moving by `vector` per tick.
    pub fn add_projectile(&mut self, vector: DVec2, group: Option<u32>, delay: Duration) {
        let projectile = Projectile::new(self.origin.owner, self.origin.location, vector, self.damage)
            .with_target(self.target.map(|target| target.id))
            .with_group(group)
            .with_delay(delay)
            .with_size(self.size.x, self.size.y);
        self.out.push(projectile);
    }

    /// Emits a projectile heading for `target` at `speed` per tick.
    ///
    /// The direction is divided by the Chebyshev distance, so the largest
    /// velocity component equals `speed` whatever the heading.
    pub fn add_projectile_towards(
        &mut self,
        target: DVec2,
        speed: f64,
        group: Option<u32>,
        delay: Duration,
    ) {
        let offset = target - self.origin.location;
        let distance = offset.x.abs().max(offset.y.abs());
        let vector = if distance > 0.0 {
            offset / distance * speed
        } else {
            DVec2::ZERO
        };
        self.add_projectile(vector, group, delay);
    }
}

/// Decides which projectiles a launcher emits when it fires.
pub trait LaunchPattern {
    /// Emits the projectiles of one shot.
    fn launch(&mut self, context: &mut LaunchContext<'_>);
}

impl<F> LaunchPattern for F
where
    F: FnMut(&mut LaunchContext<'_>),
{
    fn launch(&mut self, context: &mut LaunchContext<'_>) {
        self(context);
    }
}

/// Single projectile toward the target, or along `direction` without one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aimed {
    /// Speed per tick.
    pub speed: f64,
    /// Heading used when no target is given.
    pub direction: DVec2,
}

impl LaunchPattern for Aimed {
    fn launch(&mut self, context: &mut LaunchContext<'_>) {
        match context.target() {
            Some(target) => {
                context.add_projectile_towards(target.location, self.speed, None, Duration::ZERO);
            }
            None => {
                let direction = self.direction.normalize_or_zero();
                context.add_projectile(direction * self.speed, None, Duration::ZERO);
            }
        }
    }
}

/// Staggered volley whose projectiles share a destruction group.
///
/// Every shot allocates a fresh group so the first projectile of a volley to
/// be destroyed takes the rest of that volley with it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    /// Projectiles per volley.
    pub count: u32,
    /// Delay between consecutive projectiles.
    pub interval: Duration,
    /// Speed per tick.
    pub speed: f64,
}

impl Burst {
    /// Creates a volley of `count` projectiles spaced by `interval`.
    #[must_use]
    pub const fn new(count: u32, interval: Duration, speed: f64) -> Self {
        Self {
            count,
            interval,
            speed,
        }
    }
}

impl LaunchPattern for Burst {
    fn launch(&mut self, context: &mut LaunchContext<'_>) {
        let Some(target) = context.target() else {
            return;
        };
        let group = context.new_group();
        for shot in 0..self.count {
            context.add_projectile_towards(
                target.location,
                self.speed,
                Some(group),
                self.interval.saturating_mul(shot),
            );
        }
    }
}

/// Launcher settings read from a resource.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherConfig {
    /// Schema version.
    pub version: u32,
    /// Minimum time between shots in milliseconds.
    pub rate_ms: u64,
    /// Damage of every projectile.
    pub damage: DamageRange,
    /// Projectile box width.
    #[serde(default = "unit")]
    pub projectile_width: f64,
    /// Projectile box height.
    #[serde(default = "unit")]
    pub projectile_height: f64,
}

fn unit() -> f64 {
    1.0
}

/// Fires projectiles through a [`LaunchPattern`] at most once per `rate`.
pub struct Launcher {
    rate: Duration,
    timing: Timing,
    damage: DamageRange,
    size: DVec2,
    pattern: Box<dyn LaunchPattern>,
}

impl Launcher {
    /// Creates a launcher firing `pattern` at most once per `rate`.
    #[must_use]
    pub fn new(rate: Duration, damage: DamageRange, pattern: impl LaunchPattern + 'static) -> Self {
        Self {
            rate,
            timing: Timing::new(),
            damage,
            size: DVec2::ONE,
            pattern: Box::new(pattern),
        }
    }

    /// Builds a launcher from validated settings.
    pub fn from_config(
        resource: &str,
        config: &LauncherConfig,
        pattern: impl LaunchPattern + 'static,
    ) -> Result<Self> {
        check_version(resource, config.version)?;
        config.damage.validate(resource)?;
        let valid_size = |value: f64| value.is_finite() && value > 0.0;
        if !(valid_size(config.projectile_width) && valid_size(config.projectile_height)) {
            return Err(EngineError::invalid(
                resource,
                format!(
                    "projectile size {}x{} must be positive",
                    config.projectile_width, config.projectile_height
                ),
            ));
        }
        debug!(resource, rate_ms = config.rate_ms, "configured launcher");
        Ok(Self::new(Duration::from_millis(config.rate_ms), config.damage, pattern)
            .with_projectile_size(config.projectile_width, config.projectile_height))
    }

    /// Sets the box size of emitted projectiles.
    #[must_use]
    pub fn with_projectile_size(mut self, width: f64, height: f64) -> Self {
        self.size = DVec2::new(width, height);
        self
    }

    /// Minimum time between shots.
    #[must_use]
    pub const fn rate(&self) -> Duration {
        self.rate
    }

    /// Replaces the minimum time between shots.
    pub fn set_rate(&mut self, rate: Duration) {
        self.rate = rate;
    }

    /// Fires without a target, returning whether the rate allowed it.
    pub fn launch(
        &mut self,
        origin: LaunchOrigin,
        clock: &dyn Clock,
        groups: &mut ProjectileGroups,
        out: &mut Vec<Projectile>,
    ) -> bool {
        self.fire(origin, None, clock, groups, out)
    }

    /// Fires at `target`, returning whether the rate allowed it.
    pub fn launch_at(
        &mut self,
        origin: LaunchOrigin,
        target: LaunchTarget,
        clock: &dyn Clock,
        groups: &mut ProjectileGroups,
        out: &mut Vec<Projectile>,
    ) -> bool {
        self.fire(origin, Some(target), clock, groups, out)
    }

    fn fire(
        &mut self,
        origin: LaunchOrigin,
        target: Option<LaunchTarget>,
        clock: &dyn Clock,
        groups: &mut ProjectileGroups,
        out: &mut Vec<Projectile>,
    ) -> bool {
        let now = clock.now();
        if self.timing.is_started() && !self.timing.elapsed_at_least(now, self.rate) {
            return false;
        }
        self.timing.restart(now);
        let mut context = LaunchContext {
            origin,
            target,
            damage: self.damage,
            size: self.size,
            groups,
            out,
        };
        self.pattern.launch(&mut context);
        true
    }
}

impl fmt::Debug for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launcher")
            .field("rate", &self.rate)
            .field("timing", &self.timing)
            .field("damage", &self.damage)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::ManualClock;

    use super::*;

    fn origin() -> LaunchOrigin {
        LaunchOrigin {
            owner: FeaturableId::new(1),
            location: DVec2::new(10.0, 10.0),
        }
    }

    fn damage() -> DamageRange {
        DamageRange::new(1, 3).expect("valid range")
    }

    #[test]
    fn rate_limits_consecutive_launches() {
        let clock = ManualClock::new();
        let pattern = Aimed {
            speed: 2.0,
            direction: DVec2::X,
        };
        let mut launcher = Launcher::new(Duration::from_millis(100), damage(), pattern);
        let mut groups = ProjectileGroups::new();
        let mut out = Vec::new();

        assert!(launcher.launch(origin(), &clock, &mut groups, &mut out));
        clock.advance(Duration::from_millis(99));
        assert!(!launcher.launch(origin(), &clock, &mut groups, &mut out));
        assert_eq!(out.len(), 1, "second launch within the rate fires nothing");

        clock.advance(Duration::from_millis(1));
        assert!(launcher.launch(origin(), &clock, &mut groups, &mut out));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].velocity(), DVec2::new(2.0, 0.0));
    }

    #[test]
    fn chebyshev_normalisation_keeps_diagonals_at_speed() {
        let clock = ManualClock::new();
        let mut launcher = Launcher::new(
            Duration::from_millis(10),
            damage(),
            |context: &mut LaunchContext<'_>| {
                let from = context.origin().location;
                context.add_projectile_towards(from + DVec2::new(30.0, 15.0), 3.0, None, Duration::ZERO);
                context.add_projectile_towards(from + DVec2::new(-8.0, -8.0), 3.0, None, Duration::ZERO);
                context.add_projectile_towards(from, 3.0, None, Duration::ZERO);
            },
        );
        let mut out = Vec::new();
        assert!(launcher.launch(origin(), &clock, &mut ProjectileGroups::new(), &mut out));

        let velocities: Vec<_> = out.iter().map(Projectile::velocity).collect();
        assert_eq!(
            velocities,
            vec![DVec2::new(3.0, 1.5), DVec2::new(-3.0, -3.0), DVec2::ZERO]
        );
    }

    #[test]
    fn burst_staggers_one_group_per_volley() {
        let clock = ManualClock::new();
        let mut launcher = Launcher::new(
            Duration::ZERO,
            damage(),
            Burst::new(3, Duration::from_millis(50), 1.0),
        );
        let target = LaunchTarget {
            id: FeaturableId::new(9),
            location: DVec2::new(20.0, 10.0),
        };
        let mut groups = ProjectileGroups::new();
        let mut out = Vec::new();
        assert!(launcher.launch_at(origin(), target, &clock, &mut groups, &mut out));
        assert!(launcher.launch_at(origin(), target, &clock, &mut groups, &mut out));

        let delays: Vec<_> = out.iter().map(|p| p.delay().as_millis()).collect();
        assert_eq!(delays, vec![0, 50, 100, 0, 50, 100]);
        let groups: Vec<_> = out.iter().map(Projectile::group).collect();
        assert_eq!(
            groups,
            vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]
        );
        assert!(out.iter().all(|p| p.target() == Some(FeaturableId::new(9))));
    }

    #[test]
    fn launchers_sharing_a_source_never_share_a_group() {
        let clock = ManualClock::new();
        let mut first = Launcher::new(Duration::ZERO, damage(), Burst::new(1, Duration::ZERO, 1.0));
        let mut second = Launcher::new(Duration::ZERO, damage(), Burst::new(1, Duration::ZERO, 1.0));
        let target = LaunchTarget {
            id: FeaturableId::new(9),
            location: DVec2::new(20.0, 10.0),
        };
        let mut groups = ProjectileGroups::new();
        let mut out = Vec::new();
        assert!(first.launch_at(origin(), target, &clock, &mut groups, &mut out));
        assert!(second.launch_at(origin(), target, &clock, &mut groups, &mut out));
        assert!(first.launch_at(origin(), target, &clock, &mut groups, &mut out));

        let groups: Vec<_> = out.iter().map(Projectile::group).collect();
        assert_eq!(groups, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn config_is_validated() {
        let config: LauncherConfig = toml::from_str(
            "version = 1\nrate_ms = 250\ndamage = { min = 2, max = 4 }\n",
        )
        .expect("valid document");
        let launcher = Launcher::from_config("launcher.toml", &config, Aimed {
            speed: 1.0,
            direction: DVec2::Y,
        })
        .expect("valid launcher");
        assert_eq!(launcher.rate(), Duration::from_millis(250));

        let inverted = LauncherConfig {
            damage: DamageRange { min: 5, max: 1 },
            ..config
        };
        assert!(Launcher::from_config("launcher.toml", &inverted, |_: &mut LaunchContext<'_>| {}).is_err());
    }
}
