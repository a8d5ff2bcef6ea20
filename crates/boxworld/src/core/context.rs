use crate::api::config::WorldConfig;
use crate::api::types::{ComponentKey, EntityId};
use crate::assets::registry::AssetRegistry;
use crate::components::component::{Component, ComponentType};
use crate::components::entity::Entity;
use crate::components::hitbox::{Hitbox, HitboxComponent};
use crate::extensions::random::Rng;
use crate::renderer::stage::Stage;

/// Read-only view of every live entity except the one whose hook is running.
#[derive(Clone, Copy)]
pub struct Others<'a> {
    pub(crate) before: &'a [Entity],
    pub(crate) after: &'a [Entity],
}

impl<'a> Others<'a> {
    pub(crate) fn new(before: &'a [Entity], after: &'a [Entity]) -> Self {
        Self { before, after }
    }

    /// Iterate in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Entity> + 'a {
        self.before.iter().chain(self.after.iter())
    }

    pub fn get(&self, id: EntityId) -> Option<&'a Entity> {
        self.iter().find(|e| e.id() == Some(id))
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&'a Entity> {
        self.iter().find(|e| e.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split a collection around `index`, yielding that entity mutably and
/// everyone else read-only.
pub(crate) fn split_at_entity(entities: &mut [Entity], index: usize) -> Option<(&mut Entity, Others<'_>)> {
    if index >= entities.len() {
        return None;
    }
    let (before, rest) = entities.split_at_mut(index);
    let (entity, after) = rest.split_first_mut()?;
    Some((entity, Others::new(before, after)))
}

/// World-owned state reachable from hooks.
pub(crate) struct Services {
    pub(crate) config: WorldConfig,
    pub(crate) assets: AssetRegistry,
    pub(crate) stage: Box<dyn Stage>,
    pub(crate) rng: Rng,
    next_id: u32,
    spawned: Vec<(EntityId, Entity)>,
}

impl Services {
    pub(crate) fn new(config: WorldConfig, assets: AssetRegistry, stage: Box<dyn Stage>) -> Self {
        let rng = Rng::new(config.rng_seed);
        Self {
            config,
            assets,
            stage,
            rng,
            next_id: 1,
            spawned: Vec::new(),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn queue_spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = self.allocate_id();
        entity.assign_id(id);
        self.spawned.push((id, entity));
        id
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<(EntityId, Entity)> {
        std::mem::take(&mut self.spawned)
    }
}

/// What a component hook can see and do.
///
/// Structural changes requested here (spawning, attaching, detaching) are
/// applied once the current pass is over, never mid-iteration.
pub struct EntityContext<'a> {
    id: EntityId,
    entity: &'a mut Entity,
    others: Others<'a>,
    services: &'a mut Services,
}

impl<'a> EntityContext<'a> {
    pub(crate) fn new(
        id: EntityId,
        entity: &'a mut Entity,
        others: Others<'a>,
        services: &'a mut Services,
    ) -> Self {
        Self {
            id,
            entity,
            others,
            services,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.entity.tag
    }

    /// Mark the owning entity for removal at the next deletion sweep.
    pub fn delete(&mut self) {
        self.entity.delete();
    }

    pub fn is_deleted(&self) -> bool {
        self.entity.is_deleted()
    }

    /// Sibling component lookup. `None` for the component running the hook.
    pub fn get<T: ComponentType>(&self) -> Option<&T> {
        self.entity.get::<T>()
    }

    pub fn get_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        self.entity.get_mut::<T>()
    }

    pub fn has(&self, key: ComponentKey) -> bool {
        self.entity.has(key)
    }

    pub fn hitbox(&self) -> Option<&Hitbox> {
        self.entity.get::<HitboxComponent>().map(|c| &c.bounds)
    }

    pub fn hitbox_mut(&mut self) -> Option<&mut Hitbox> {
        self.entity.hitbox_mut()
    }

    /// Attach a component once the current pass over this entity ends.
    /// Its `on_spawn` fires at that point.
    pub fn attach(&mut self, component: impl Component) {
        self.entity.queue_attach(Box::new(component));
    }

    /// Detach a component once the current pass over this entity ends.
    /// Its `destroy` fires at that point.
    pub fn detach(&mut self, key: ComponentKey) {
        self.entity.queue_detach(key);
    }

    /// Register a new entity. The id is assigned now; `on_spawn` fires when
    /// the current phase of the frame completes.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.services.queue_spawn(entity)
    }

    /// Every other live entity.
    pub fn entities(&self) -> Others<'a> {
        self.others
    }

    pub fn config(&self) -> &WorldConfig {
        &self.services.config
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.services.assets
    }

    pub fn stage(&mut self) -> &mut dyn Stage {
        self.services.stage.as_mut()
    }

    pub fn rng(&mut self) -> &mut Rng {
        &mut self.services.rng
    }
}
