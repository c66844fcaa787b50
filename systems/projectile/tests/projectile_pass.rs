use std::time::Duration;

use tessera_core::{DVec2, Localizable, ManualClock, Rectangle, Services};
use tessera_feature::{Collidable, Featurable, FeaturableId, Handler, Transformable};
use tessera_system_projectile::{
    Burst, DamageRange, HandlerProjectile, LaunchOrigin, LaunchTarget, Launcher, Projectile,
    ProjectileHit,
};

const SHOOTER: FeaturableId = FeaturableId::new(0);
const NEAR: FeaturableId = FeaturableId::new(1);
const FAR: FeaturableId = FeaturableId::new(2);

fn scene() -> Handler {
    let services = Services::new();
    let mut handler = Handler::new();
    for (id, x) in [(SHOOTER, 0.0), (NEAR, 20.0), (FAR, 60.0)] {
        let featurable = Featurable::new(id)
            .with_feature(Transformable::new(DVec2::new(x, 0.0), 10.0, 10.0))
            .and_then(|f| f.with_feature(Collidable::new(10.0, 10.0, 0)))
            .expect("features attach");
        let _ = handler.add(featurable, &services).expect("add");
    }
    handler.update(1.0, &services);
    handler
}

fn damage() -> DamageRange {
    DamageRange::new(3, 9).expect("valid range")
}

fn bullet(velocity: DVec2) -> Projectile {
    Projectile::new(SHOOTER, DVec2::new(5.0, 5.0), velocity, damage()).with_size(2.0, 2.0)
}

fn world() -> Rectangle {
    Rectangle::new(0.0, 0.0, 100.0, 20.0)
}

fn run(projectiles: Vec<Projectile>, passes: usize, seed: u64) -> (HandlerProjectile, Vec<ProjectileHit>) {
    let scene = scene();
    let mut handler = HandlerProjectile::new(seed, world());
    handler.add_all(projectiles);
    let mut hits = Vec::new();
    for _ in 0..passes {
        handler.update(Duration::from_millis(10), 1.0, scene.featurables(), &mut hits);
    }
    (handler, hits)
}

#[test]
fn first_featurable_in_the_way_is_hit_and_owner_is_skipped() {
    let (handler, hits) = run(vec![bullet(DVec2::new(5.0, 0.0))], 4, 1);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].owner, SHOOTER);
    assert_eq!(hits[0].target, NEAR);
    assert!((3..=9).contains(&hits[0].damage));
    assert!(handler.projectiles().is_empty(), "hitting projectile is removed");
}

#[test]
fn targeted_projectile_passes_through_others() {
    let aimed = bullet(DVec2::new(5.0, 0.0)).with_target(Some(FAR));
    let (_, hits) = run(vec![aimed], 14, 1);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].target, FAR);
}

#[test]
fn identical_seeds_roll_identical_damage() {
    let volley = || (0..8).map(|_| bullet(DVec2::new(5.0, 0.0))).collect::<Vec<_>>();
    let (_, first) = run(volley(), 4, 42);
    let (_, second) = run(volley(), 4, 42);

    assert_eq!(first.len(), 8);
    assert_eq!(first, second);
}

#[test]
fn delayed_projectiles_stay_inert_until_their_delay_ran_out() {
    let scene = scene();
    let mut handler = HandlerProjectile::new(0, world());
    let _ = handler.add(bullet(DVec2::new(0.0, 1.0)).with_delay(Duration::from_millis(20)));
    let mut hits = Vec::new();

    handler.update(Duration::from_millis(10), 1.0, scene.featurables(), &mut hits);
    assert_eq!(handler.projectiles()[0].delay(), Duration::from_millis(10));
    handler.update(Duration::from_millis(10), 1.0, scene.featurables(), &mut hits);
    assert_eq!(handler.projectiles()[0].location(), DVec2::new(5.0, 5.0));

    handler.update(Duration::from_millis(10), 1.0, scene.featurables(), &mut hits);
    assert_eq!(handler.projectiles()[0].location(), DVec2::new(5.0, 6.0));
    assert!(hits.is_empty());
}

#[test]
fn leaving_bounds_destroys_the_projectile() {
    let (handler, hits) = run(vec![bullet(DVec2::new(0.0, -10.0))], 1, 0);
    assert!(hits.is_empty());
    assert!(handler.projectiles().is_empty());
}

#[test]
fn destroyed_projectile_takes_its_group_along() {
    let scene = scene();
    let clock = ManualClock::new();
    let mut launcher = Launcher::new(
        Duration::from_millis(500),
        damage(),
        Burst::new(3, Duration::from_millis(100), 5.0),
    );
    let origin = LaunchOrigin {
        owner: SHOOTER,
        location: DVec2::new(5.0, 5.0),
    };
    let target = LaunchTarget {
        id: NEAR,
        location: DVec2::new(25.0, 5.0),
    };
    let mut handler = HandlerProjectile::new(3, world());
    let mut volley = Vec::new();
    assert!(launcher.launch_at(origin, target, &clock, handler.groups(), &mut volley));
    assert!(!launcher.launch_at(origin, target, &clock, handler.groups(), &mut volley));
    assert_eq!(volley.len(), 3);

    handler.add_all(volley);
    let _ = handler.add(bullet(DVec2::new(0.0, 0.5)));

    let mut hits = Vec::new();
    for _ in 0..4 {
        handler.update(Duration::from_millis(10), 1.0, scene.featurables(), &mut hits);
    }

    assert_eq!(hits.len(), 1, "only the leading projectile hits");
    assert_eq!(hits[0].target, NEAR);
    assert_eq!(handler.projectiles().len(), 1, "delayed members of the volley are gone");
    assert_eq!(handler.projectiles()[0].group(), None);
}

#[test]
fn group_destruction_stays_within_one_launcher() {
    let scene = scene();
    let clock = ManualClock::new();
    let mut tower_a = Launcher::new(Duration::ZERO, damage(), Burst::new(1, Duration::ZERO, 5.0));
    let mut tower_b = Launcher::new(Duration::ZERO, damage(), Burst::new(1, Duration::ZERO, 1.0));
    let mut handler = HandlerProjectile::new(7, world());
    let mut shots = Vec::new();

    let towards_near = LaunchTarget {
        id: NEAR,
        location: DVec2::new(25.0, 5.0),
    };
    let from_shooter = LaunchOrigin {
        owner: SHOOTER,
        location: DVec2::new(5.0, 5.0),
    };
    assert!(tower_a.launch_at(from_shooter, towards_near, &clock, handler.groups(), &mut shots));

    let towards_shooter = LaunchTarget {
        id: SHOOTER,
        location: DVec2::new(45.0, 15.0),
    };
    let from_far = LaunchOrigin {
        owner: FAR,
        location: DVec2::new(50.0, 15.0),
    };
    assert!(tower_b.launch_at(from_far, towards_shooter, &clock, handler.groups(), &mut shots));
    assert_ne!(shots[0].group(), shots[1].group());

    handler.add_all(shots);
    let mut hits = Vec::new();
    for _ in 0..3 {
        handler.update(Duration::from_millis(10), 1.0, scene.featurables(), &mut hits);
    }

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].target, NEAR);
    assert_eq!(handler.projectiles().len(), 1, "the other tower's shot is still flying");
    assert_eq!(handler.projectiles()[0].owner(), FAR);
    assert_eq!(handler.projectiles()[0].location(), DVec2::new(47.0, 15.0));
}
