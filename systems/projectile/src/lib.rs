#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rate-limited launchers and the dedicated projectile handler.
//!
//! A [`Launcher`] fires through its [`LaunchPattern`] once its rate allows,
//! writing [`Projectile`]s into an output buffer. [`HandlerProjectile`] owns
//! the live projectiles, moves them, resolves hits against the featurables of
//! a scene and reports each hit as a [`ProjectileHit`].

mod handler;
mod launcher;
mod projectile;

pub use handler::{HandlerProjectile, ProjectileHit};
pub use launcher::{
    Aimed, Burst, LaunchContext, LaunchOrigin, LaunchPattern, LaunchTarget, Launcher,
    LauncherConfig, ProjectileGroups,
};
pub use projectile::{DamageRange, Projectile, ProjectileId};
