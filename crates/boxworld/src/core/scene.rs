use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Live entities in registration order, using a flat Vec.
/// Designed for small entity counts (tens to low hundreds): lookups are
/// linear and collision testing over it is pairwise.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(128),
        }
    }

    pub(crate) fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub(crate) fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Remove every entity flagged deleted, keeping the survivors' order.
    /// Removed entities come back in collection order.
    pub(crate) fn take_deleted(&mut self) -> Vec<Entity> {
        if !self.entities.iter().any(Entity::is_deleted) {
            return Vec::new();
        }
        let (deleted, live): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entities).into_iter().partition(Entity::is_deleted);
        self.entities = live;
        deleted
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == Some(id))
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == Some(id))
    }

    pub(crate) fn position(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == Some(id))
    }

    /// Iterate over all entities.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate over all entities mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find the first entity with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    /// Find all entities with the given tag.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.tag == tag).collect()
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
