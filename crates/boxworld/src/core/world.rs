use log::{debug, trace};

use crate::api::config::WorldConfig;
use crate::api::error::SimError;
use crate::api::types::EntityId;
use crate::assets::registry::AssetRegistry;
use crate::components::component::Component;
use crate::components::entity::Entity;
use crate::components::hitbox::Contact;
use crate::core::context::{split_at_entity, Others, Services};
use crate::core::scene::Scene;
use crate::core::time::FixedTimestep;
use crate::renderer::instance::RenderBuffer;
use crate::renderer::stage::{SpriteStage, Stage};

/// Owns the live entities and advances them one frame at a time.
///
/// Each [`tick`](World::tick) runs, in order:
/// 1. `update` on every entity live when the frame started,
/// 2. the deletion sweep (`destroy` on flagged entities, which are dropped),
/// 3. pairwise collision detection with `collided_with` on both sides,
/// 4. `late_update` on every entity still in the scene, including any a
///    collision callback flagged (the next sweep removes those).
///
/// Entities spawned from hooks are registered at the end of the phase that
/// spawned them. Components attached or detached from collision callbacks
/// change the entity once the whole collision pass is over.
pub struct World {
    scene: Scene,
    services: Services,
    timestep: FixedTimestep,
    frame: u64,
}

impl World {
    /// A world with an empty asset registry and the bundled [`SpriteStage`].
    pub fn new(config: WorldConfig) -> Self {
        Self::with_parts(config, AssetRegistry::new(), Box::new(SpriteStage::new()))
    }

    pub fn with_parts(config: WorldConfig, assets: AssetRegistry, stage: Box<dyn Stage>) -> Self {
        let timestep = FixedTimestep::new(config.fixed_step_ms);
        Self {
            scene: Scene::new(),
            services: Services::new(config, assets, stage),
            timestep,
            frame: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.services.config
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.services.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.services.assets
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Number of frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.scene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.scene.get(id)
    }

    /// Direct access to a live entity, outside of any hook.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.scene.get_mut(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.scene.iter()
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.scene.find_by_tag(tag)
    }

    /// Register an entity: assign its id, append it, fire `on_spawn` on each
    /// component in attachment order.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.services.allocate_id();
        self.register(id, entity);
        self.flush_spawned();
        id
    }

    /// Attach a component to a live entity, firing its `on_spawn`.
    pub fn attach(&mut self, id: EntityId, component: impl Component) -> Result<(), SimError> {
        let key = component.key();
        let (entity, others) = self
            .scene
            .position(id)
            .and_then(|index| split_at_entity(self.scene.entities_mut(), index))
            .ok_or(SimError::UnknownEntity(id))?;
        if entity.has(key) {
            return Err(SimError::DuplicateComponent(key));
        }
        entity.queue_attach(Box::new(component));
        entity.apply_pending(others, &mut self.services);
        self.flush_spawned();
        Ok(())
    }

    /// Flag an entity for removal at the next deletion sweep.
    /// Returns false if no live entity has this id.
    pub fn delete(&mut self, id: EntityId) -> bool {
        match self.scene.get_mut(id) {
            Some(entity) => {
                entity.delete();
                true
            }
            None => false,
        }
    }

    /// Advance the simulation by one frame of `delta_ms` milliseconds.
    pub fn tick(&mut self, delta_ms: f32) {
        self.frame += 1;

        for entity in self.scene.iter_mut() {
            if let Some(hitbox) = entity.hitbox_mut() {
                hitbox.snapshot();
            }
        }

        // Entities spawned during this pass wait in the queue, so the pass
        // covers exactly the entities live when it began.
        for index in 0..self.scene.len() {
            if let Some((entity, others)) = split_at_entity(self.scene.entities_mut(), index) {
                entity.dispatch(others, &mut self.services, |c, ctx| c.update(ctx, delta_ms));
            }
        }
        self.flush_spawned();

        self.sweep_deleted();
        self.flush_spawned();

        self.detect_collisions();
        self.flush_spawned();

        for index in 0..self.scene.len() {
            if let Some((entity, others)) = split_at_entity(self.scene.entities_mut(), index) {
                entity.dispatch(others, &mut self.services, |c, ctx| c.late_update(ctx, delta_ms));
            }
        }
        self.flush_spawned();
    }

    /// Feed host frame time into the fixed timestep and tick once per whole
    /// step. Returns the number of ticks run.
    pub fn advance(&mut self, frame_ms: f32) -> u32 {
        let steps = self.timestep.accumulate(frame_ms);
        let step_ms = self.timestep.step_ms();
        for _ in 0..steps {
            self.tick(step_ms);
        }
        trace!("advanced {steps} steps for a {frame_ms:.1}ms frame");
        steps
    }

    /// Interpolation factor between the last tick and the next.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    /// Write the stage's visuals into `buffer` for the host renderer.
    pub fn render(&self, buffer: &mut RenderBuffer) {
        self.services.stage.write_instances(buffer);
    }

    fn register(&mut self, id: EntityId, mut entity: Entity) {
        entity.assign_id(id);
        debug!("spawned entity {id} `{}`", entity.tag);
        self.scene.push(entity);
        let index = self.scene.len() - 1;
        if let Some((entity, others)) = split_at_entity(self.scene.entities_mut(), index) {
            entity.dispatch(others, &mut self.services, |c, ctx| c.on_spawn(ctx));
        }
    }

    /// Register entities queued by hooks, including any they queue in turn.
    fn flush_spawned(&mut self) {
        loop {
            let batch = self.services.take_spawned();
            if batch.is_empty() {
                break;
            }
            for (id, entity) in batch {
                self.register(id, entity);
            }
        }
    }

    fn sweep_deleted(&mut self) {
        for mut entity in self.scene.take_deleted() {
            if let Some(id) = entity.id() {
                debug!("destroying entity {id} `{}`", entity.tag);
            }
            let others = Others::new(self.scene.entities(), &[]);
            entity.destroy_components(others, &mut self.services);
        }
    }

    /// Test every pair once. An entity flagged deleted by an earlier
    /// callback in this pass is skipped for its remaining pairs.
    /// Attach/detach requests from the callbacks wait until every pair has
    /// been tested.
    fn detect_collisions(&mut self) {
        let entities = self.scene.entities_mut();
        let count = entities.len();

        for i in 0..count {
            for j in (i + 1)..count {
                if entities[i].is_deleted() {
                    break;
                }
                if entities[j].is_deleted() {
                    continue;
                }
                let (Some(a), Some(b)) = (entities[i].hitbox(), entities[j].hitbox()) else {
                    continue;
                };
                if !a.intersects(b) {
                    continue;
                }
                if let (Some(first), Some(second)) = (entities[i].id(), entities[j].id()) {
                    trace!("collision between entities {first} and {second}");
                }
                notify(entities, i, j, &mut self.services);
                notify(entities, j, i, &mut self.services);
            }
        }

        for index in 0..count {
            if let Some((entity, others)) = split_at_entity(entities, index) {
                entity.apply_pending(others, &mut self.services);
            }
        }
    }
}

/// Tell the entity at `index` that it collided with the one at `other`.
fn notify(entities: &mut [Entity], index: usize, other: usize, services: &mut Services) {
    let Some((entity, others)) = split_at_entity(entities, index) else {
        return;
    };
    let source = if other < index {
        others.before.get(other)
    } else {
        others.after.get(other - index - 1)
    };
    let Some(source) = source else { return };
    let (Some(id), Some(hitbox)) = (source.id(), source.hitbox().copied()) else {
        return;
    };
    let contact = Contact {
        entity: id,
        tag: &source.tag,
        hitbox,
    };
    entity.collide(&contact, others, services);
}
