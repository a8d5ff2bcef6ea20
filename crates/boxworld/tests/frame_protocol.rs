use std::cell::{Cell, RefCell};
use std::rc::Rc;

use boxworld::{
    edge_of_collision, hitbox_distance, AssetRegistry, Component, ComponentKey, ComponentType,
    DrawLayer, Edge, Entity, EntityContext, HitboxComponent, RenderBuffer, SpriteComponent,
    SpriteStage, Stage, TextureHandle, Vector, VisualId, World, WorldConfig,
};

const MANIFEST: &str = r#"{
    "atlases": [ { "name": "sprites", "path": "sprites.png", "cell_size": 16 } ],
    "textures": {
        "crate": { "atlas": 0, "col": 1, "row": 0, "size": [20, 20] },
        "floor": { "atlas": 0, "col": 0, "row": 2, "span": 4 }
    }
}"#;

/// Falls at a constant speed, in world units per millisecond.
struct Gravity {
    speed: f32,
}

impl Component for Gravity {
    fn key(&self) -> ComponentKey {
        Self::KEY
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, delta_ms: f32) {
        if let Some(hitbox) = ctx.hitbox_mut() {
            hitbox.move_by(Vector::new(0.0, self.speed * delta_ms));
        }
    }
}

impl ComponentType for Gravity {
    const KEY: ComponentKey = ComponentKey("gravity");
}

fn world_with_assets() -> World {
    let assets = AssetRegistry::from_json(MANIFEST).unwrap();
    World::with_parts(WorldConfig::default(), assets, Box::new(SpriteStage::new()))
}

fn floor() -> Entity {
    Entity::new()
        .with_tag("floor")
        .with(HitboxComponent::new(0.0, 100.0, 200.0, 20.0).unwrap())
        .unwrap()
        .with(SpriteComponent::new("floor").with_layer(DrawLayer::Terrain))
        .unwrap()
}

/// A box that lands on anything it falls onto.
fn falling_crate(edges: Rc<RefCell<Vec<Edge>>>) -> Entity {
    let hitbox = HitboxComponent::new(50.0, 0.0, 10.0, 10.0)
        .unwrap()
        .on_collision(move |own, other, _ctx| {
            if let Some(edge) = edge_of_collision(own, &other.hitbox) {
                edges.borrow_mut().push(edge);
                if edge == Edge::Top {
                    own.y = other.hitbox.y - own.height();
                }
            }
        });
    Entity::new()
        .with_tag("crate")
        .with(hitbox)
        .unwrap()
        .with(Gravity { speed: 1.0 })
        .unwrap()
        .with(SpriteComponent::new("crate"))
        .unwrap()
}

#[test]
fn crate_lands_on_floor_and_sprite_follows_the_corrected_position() {
    let edges = Rc::new(RefCell::new(Vec::new()));
    let mut world = world_with_assets();
    world.spawn(floor());
    let crate_id = world.spawn(falling_crate(edges.clone()));

    world.tick(50.0);
    assert!(edges.borrow().is_empty());

    world.tick(50.0);
    assert_eq!(*edges.borrow(), [Edge::Top]);

    let hitbox = *world.get(crate_id).unwrap().hitbox().unwrap();
    assert_eq!(hitbox.y, 90.0);

    let mut buffer = RenderBuffer::new();
    world.render(&mut buffer);
    assert_eq!(buffer.instance_count(), 2);

    // Terrain draws before actors.
    let floor_instance = buffer.instances[0];
    assert_eq!(floor_instance.layer, DrawLayer::Terrain.as_u8() as f32);
    assert_eq!(floor_instance.width, 64.0);

    // 20x20 sprite centred on the 10x10 hitbox, at the snapped position.
    let crate_instance = buffer.instances[1];
    assert_eq!((crate_instance.x, crate_instance.y), (45.0, 85.0));
}

#[test]
fn deleting_an_entity_removes_its_visual() {
    let mut world = world_with_assets();
    world.spawn(floor());
    let crate_id = world.spawn(falling_crate(Rc::default()));

    let mut buffer = RenderBuffer::new();
    world.render(&mut buffer);
    assert_eq!(buffer.instance_count(), 2);

    assert!(world.delete(crate_id));
    world.tick(16.0);
    world.render(&mut buffer);
    assert_eq!(buffer.instance_count(), 1);
    assert!(world.get(crate_id).is_none());
}

#[test]
fn sprite_with_unknown_texture_stays_hidden() {
    let mut world = world_with_assets();
    let id = world.spawn(
        Entity::new()
            .with(HitboxComponent::new(0.0, 0.0, 1.0, 1.0).unwrap())
            .unwrap()
            .with(SpriteComponent::new("missing"))
            .unwrap(),
    );
    world.tick(16.0);

    let mut buffer = RenderBuffer::new();
    world.render(&mut buffer);
    assert_eq!(buffer.instance_count(), 0);
    let sprite = world.get(id).unwrap().get::<SpriteComponent>().unwrap();
    assert_eq!(sprite.visual(), None);
}

#[derive(Default)]
struct StageLog {
    calls: Vec<String>,
    next: u32,
}

/// Stage that records the calls it receives.
struct RecordingStage(Rc<RefCell<StageLog>>);

impl Stage for RecordingStage {
    fn attach(&mut self, texture: TextureHandle, _layer: DrawLayer) -> VisualId {
        let mut log = self.0.borrow_mut();
        log.next += 1;
        log.calls.push(format!("attach {}", texture.col));
        VisualId(log.next)
    }

    fn detach(&mut self, id: VisualId) {
        self.0.borrow_mut().calls.push(format!("detach {}", id.0));
    }

    fn place(&mut self, id: VisualId, pos: Vector) {
        self.0.borrow_mut().calls.push(format!("place {} {} {}", id.0, pos.x, pos.y));
    }
}

#[test]
fn sprite_drives_a_custom_stage_through_its_lifecycle() {
    let log = Rc::new(RefCell::new(StageLog::default()));
    let assets = AssetRegistry::from_json(MANIFEST).unwrap();
    let mut world = World::with_parts(
        WorldConfig::default(),
        assets,
        Box::new(RecordingStage(log.clone())),
    );

    let id = world.spawn(falling_crate(Rc::default()));
    world.tick(10.0);
    world.delete(id);
    world.tick(10.0);

    let calls = log.borrow().calls.clone();
    assert_eq!(
        calls,
        ["attach 1", "place 1 45 -5", "place 1 45 5", "detach 1"]
    );
}

/// Records the distance to the entity tagged "floor" every late update.
struct FloorDistance(Rc<Cell<f32>>);

impl Component for FloorDistance {
    fn key(&self) -> ComponentKey {
        ComponentKey("floor-distance")
    }

    fn late_update(&mut self, ctx: &mut EntityContext<'_>, _delta_ms: f32) {
        let Some(own) = ctx.hitbox() else { return };
        let Some(floor) = ctx.entities().find_by_tag("floor").and_then(|e| e.hitbox()) else {
            return;
        };
        self.0.set(hitbox_distance(own, floor));
    }
}

#[test]
fn hooks_can_query_other_entities() {
    let distance = Rc::new(Cell::new(-1.0));
    let mut world = world_with_assets();
    world.spawn(floor());
    world.spawn(
        Entity::new()
            .with(HitboxComponent::new(95.0, 0.0, 10.0, 10.0).unwrap())
            .unwrap()
            .with(FloorDistance(distance.clone()))
            .unwrap(),
    );

    world.tick(16.0);
    // Centres at (100, 5) and (100, 110).
    assert_eq!(distance.get(), 105.0);
}

/// Rolls a die every update using the world's seeded generator.
struct Dice(Rc<RefCell<Vec<i32>>>);

impl Component for Dice {
    fn key(&self) -> ComponentKey {
        ComponentKey("dice")
    }

    fn update(&mut self, ctx: &mut EntityContext<'_>, _delta_ms: f32) {
        let roll = ctx.rng().int_between(1, 6);
        self.0.borrow_mut().push(roll);
    }
}

fn rolls_for_seed(seed: u64) -> Vec<i32> {
    let rolls = Rc::new(RefCell::new(Vec::new()));
    let config = WorldConfig {
        rng_seed: seed,
        ..WorldConfig::default()
    };
    let mut world = World::new(config);
    world.spawn(Entity::new().with(Dice(rolls.clone())).unwrap());
    for _ in 0..20 {
        world.tick(16.0);
    }
    let out = rolls.borrow().clone();
    out
}

#[test]
fn same_seed_replays_the_same_frames() {
    let first = rolls_for_seed(1234);
    assert_eq!(first.len(), 20);
    assert!(first.iter().all(|r| (1..=6).contains(r)));
    assert_eq!(first, rolls_for_seed(1234));
}
