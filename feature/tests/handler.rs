use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tessera_core::{DVec2, DrawCall, Graphic, Image, RecordingGraphic, Rectangle, Services};
use tessera_feature::{
    Animatable, Animation, Collidable, ComponentCollision, ComponentRefreshable,
    ComponentRendererLayer, ComponentUpdater, FactoryRegistry, Feature, Featurable, FeaturableId,
    Featurables, Handler, HandlerCommand, Producer, Producible, ProductionEvent, Rasterable,
    Transformable,
};
use tessera_raster::{RasterDefinition, RasterPolicy, RasterSet};

/// Draws a filled rectangle over the owner's bounds.
#[derive(Debug, Default)]
struct Marker;

impl Feature for Marker {
    fn render(&self, g: &mut dyn Graphic, owner: &Featurable) {
        g.draw_rect(owner.feature::<Transformable>().bounds(), true);
    }
}

fn marked(id: u32, x: f64) -> Featurable {
    Featurable::new(FeaturableId::new(id))
        .with_feature(Transformable::new(DVec2::new(x, 0.0), 8.0, 8.0))
        .and_then(|featurable| featurable.with_feature(Marker))
        .expect("features attach")
}

fn drawn_rects(g: &mut RecordingGraphic) -> Vec<Rectangle> {
    g.take_calls()
        .into_iter()
        .filter_map(|call| match call {
            DrawCall::Rect { area, .. } => Some(area),
            _ => None,
        })
        .collect()
}

/// Spawns a featurable during the first pass and removes another one.
struct Spawner {
    spawned: bool,
}

impl ComponentUpdater for Spawner {
    fn update(
        &mut self,
        _extrp: f64,
        featurables: &mut Featurables,
        _services: &Services,
        commands: &mut Vec<HandlerCommand>,
    ) {
        if self.spawned {
            return;
        }
        self.spawned = true;
        commands.push(HandlerCommand::Add(marked(10, 40.0)));
        if let Some(first) = featurables.ids().first() {
            commands.push(HandlerCommand::Remove(*first));
        }
    }
}

#[test]
fn structural_changes_take_effect_between_passes() {
    let services = Services::new();
    let mut handler = Handler::new();
    handler.add_updater(Spawner { spawned: false });
    handler.add_renderer(ComponentRendererLayer);
    let mut g = RecordingGraphic::new();

    let _ = handler.add(marked(1, 0.0), &services).expect("add");
    let _ = handler.add(marked(2, 20.0), &services).expect("add");
    handler.render(&mut g);
    assert!(drawn_rects(&mut g).is_empty(), "queued featurables are not live yet");

    handler.update(1.0, &services);
    handler.render(&mut g);
    assert_eq!(
        drawn_rects(&mut g),
        vec![Rectangle::new(20.0, 0.0, 8.0, 8.0)],
        "removed featurable is gone and the spawned one waits for the next pass"
    );

    handler.update(1.0, &services);
    handler.render(&mut g);
    assert_eq!(
        drawn_rects(&mut g),
        vec![
            Rectangle::new(20.0, 0.0, 8.0, 8.0),
            Rectangle::new(40.0, 0.0, 8.0, 8.0),
        ]
    );
}

#[test]
fn destroyed_featurables_leave_after_the_pass() {
    let services = Services::new();
    let mut handler = Handler::new();
    let id = handler.add(marked(3, 0.0), &services).expect("add");
    handler.update(1.0, &services);
    assert!(handler.featurables().contains(id));

    handler
        .featurables_mut()
        .get_mut(id)
        .expect("live")
        .destroy();
    handler.update(1.0, &services);
    assert!(!handler.featurables().contains(id));
}

/// Adds a featurable and takes it back within the same pass.
struct Regretful {
    done: bool,
}

impl ComponentUpdater for Regretful {
    fn update(
        &mut self,
        _extrp: f64,
        _featurables: &mut Featurables,
        _services: &Services,
        commands: &mut Vec<HandlerCommand>,
    ) {
        if std::mem::replace(&mut self.done, true) {
            return;
        }
        commands.push(HandlerCommand::Add(marked(42, 0.0)));
        commands.push(HandlerCommand::Remove(FeaturableId::new(42)));
    }
}

#[test]
fn removal_cancels_a_featurable_that_never_went_live() {
    let services = Services::new();
    let mut handler = Handler::new();
    handler.add_updater(Regretful { done: false });
    handler.update(1.0, &services);
    handler.update(1.0, &services);
    assert!(!handler.featurables().contains(FeaturableId::new(42)));
    assert_eq!(handler.pending(), 0);

    let id = handler.add(marked(7, 0.0), &services).expect("add");
    handler.remove(id);
    handler.update(1.0, &services);
    handler.update(1.0, &services);
    assert!(!handler.featurables().contains(id));
    assert!(handler.featurables().is_empty());
}

#[test]
fn adding_the_same_identifier_twice_fails() {
    let services = Services::new();
    let mut handler = Handler::new();
    let _ = handler.add(marked(5, 0.0), &services).expect("add");
    assert!(handler.add(marked(5, 0.0), &services).is_err());
    assert_eq!(handler.next_id(), FeaturableId::new(6));
}

#[test]
fn collisions_respect_accepted_groups() {
    let services = Services::new();
    let mut handler = Handler::new();
    handler.add_updater(ComponentCollision::default());

    let hero = handler.create();
    let hero = hero
        .with_feature(Transformable::new(DVec2::new(0.0, 0.0), 10.0, 10.0))
        .and_then(|f| f.with_feature(Collidable::new(10.0, 10.0, 1).accepting(&[2])))
        .expect("features attach");
    let monster = handler.create();
    let monster = monster
        .with_feature(Transformable::new(DVec2::new(5.0, 5.0), 10.0, 10.0))
        .and_then(|f| f.with_feature(Collidable::new(10.0, 10.0, 2)))
        .expect("features attach");
    let hero = handler.add(hero, &services).expect("add");
    let monster = handler.add(monster, &services).expect("add");
    handler.update(1.0, &services);

    let featurables = handler.featurables();
    let hero_box = featurables.get(hero).expect("hero").feature::<Collidable>();
    let monster_box = featurables
        .get(monster)
        .expect("monster")
        .feature::<Collidable>();
    assert!(hero_box.is_colliding_with(monster));
    assert!(monster_box.contacts().is_empty(), "monster accepts no group");
}

#[test]
fn collidable_without_transformable_fails_to_prepare() {
    let services = Services::new();
    let mut handler = Handler::new();
    let lonely = handler
        .create()
        .with_feature(Collidable::new(1.0, 1.0, 0))
        .expect("feature attaches");
    assert!(handler.add(lonely, &services).is_err());
}

#[test]
fn find_at_returns_first_covering_featurable() {
    let services = Services::new();
    let mut handler = Handler::new();
    let _ = handler.add(marked(1, 0.0), &services).expect("add");
    let _ = handler.add(marked(2, 4.0), &services).expect("add");
    handler.update(1.0, &services);

    assert_eq!(
        handler.featurables().find_at(DVec2::new(6.0, 2.0)),
        Some(FeaturableId::new(1))
    );
    assert_eq!(
        handler.featurables().find_at(DVec2::new(11.0, 2.0)),
        Some(FeaturableId::new(2))
    );
    assert_eq!(handler.featurables().find_at(DVec2::new(50.0, 2.0)), None);
}

#[test]
fn rasterable_follows_vertical_position() {
    let ramps = RasterDefinition {
        version: 1,
        red: vec![0, 30],
        green: vec![0],
        blue: vec![0],
    }
    .ramps("raster.toml")
    .expect("valid definition");
    let source = Image::new(RgbaImage::from_pixel(2, 2, Rgba([50, 50, 50, 255])));
    let set = Arc::new(RasterSet::generate(
        source,
        &ramps,
        RasterPolicy::new(3, false).expect("valid policy"),
    ));

    let services = Services::new();
    let mut handler = Handler::new();
    handler.add_updater(ComponentRefreshable);
    handler.add_renderer(ComponentRendererLayer);
    let id = handler
        .add(
            Featurable::new(FeaturableId::new(0))
                .with_feature(Transformable::new(DVec2::new(0.0, 33.0), 2.0, 2.0))
                .and_then(|f| f.with_feature(Rasterable::new(Arc::clone(&set), 16)))
                .expect("features attach"),
            &services,
        )
        .expect("add");
    handler.update(1.0, &services);

    let featurable = handler.featurables().get(id).expect("live");
    assert_eq!(featurable.feature::<Rasterable>().index(), 2);

    let mut g = RecordingGraphic::new();
    handler.render(&mut g);
    let expected = set.raster(2).expect("third raster").id();
    assert_eq!(
        g.calls(),
        &[DrawCall::Image {
            image: expected,
            x: 0,
            y: 33
        }]
    );
}

#[test]
fn animatable_draws_current_frame() {
    let sheet = Image::new(RgbaImage::new(32, 16));
    let services = Services::new();
    let mut handler = Handler::new();
    handler.add_updater(ComponentRefreshable);
    handler.add_renderer(ComponentRendererLayer);

    let mut animatable = Animatable::new(sheet.clone(), 8, 8);
    animatable.play(Animation::new(0, 5, 1.0, false, false).expect("valid animation"));
    let featurable = Featurable::new(FeaturableId::new(0))
        .with_feature(Transformable::new(DVec2::new(3.0, 4.0), 8.0, 8.0))
        .and_then(|f| f.with_feature(animatable))
        .expect("features attach");
    let _ = handler.add(featurable, &services).expect("add");

    for _ in 0..5 {
        handler.update(1.0, &services);
    }
    let mut g = RecordingGraphic::new();
    handler.render(&mut g);
    assert_eq!(
        g.calls(),
        &[DrawCall::ImageRegion {
            image: sheet.id(),
            source: Rectangle::new(8.0, 8.0, 8.0, 8.0),
            x: 3,
            y: 4
        }],
        "frame 5 sits in the second row, second column"
    );
}

#[test]
fn completed_production_spawns_through_factory() {
    let mut registry = FactoryRegistry::new();
    let _ = registry.register("peasant", |id, _| {
        Featurable::new(id)
            .with_feature(Transformable::new(DVec2::ZERO, 4.0, 4.0))
            .and_then(|f| f.with_feature(Producible::new("peasant", 2)))
    });

    let services = Services::new();
    let mut handler = Handler::new();
    handler.add_updater(ComponentRefreshable);

    let mut producer = Producer::new(1.0).expect("valid speed");
    producer.enqueue(Producible::new("peasant", 2).item());
    let barracks = handler
        .create()
        .with_feature(producer)
        .expect("feature attaches");
    let barracks = handler.add(barracks, &services).expect("add");

    let mut spawned = Vec::new();
    for _ in 0..3 {
        handler.update(1.0, &services);
        let events = handler
            .featurables_mut()
            .get_mut(barracks)
            .expect("live")
            .feature_mut::<Producer>()
            .take_events();
        for event in events {
            if let ProductionEvent::Completed { kind } = event {
                let id = handler.next_id();
                let unit = registry.create(&kind, id, &services).expect("factory");
                spawned.push(handler.add(unit, &services).expect("add"));
            }
        }
    }
    handler.update(1.0, &services);

    assert_eq!(spawned.len(), 1);
    let unit = handler.featurables().get(spawned[0]).expect("spawned unit is live");
    assert_eq!(unit.feature::<Producible>().kind(), "peasant");
}
