use std::collections::HashMap;

use log::warn;

use crate::api::error::SimError;
use crate::api::types::{ComponentKey, EntityId};
use crate::components::component::{downcast_mut, downcast_ref, Component, ComponentType};
use crate::components::hitbox::{Contact, Hitbox, HitboxComponent};
use crate::core::context::{EntityContext, Others, Services};
use crate::core::geometry::hitbox_distance;

struct Slot {
    key: ComponentKey,
    /// `None` while the component's own hook is running.
    component: Option<Box<dyn Component>>,
}

enum Pending {
    Attach(Box<dyn Component>),
    Detach(ComponentKey),
}

/// A named bag of components.
///
/// Entities start unregistered (no id). [`World::spawn`](crate::World::spawn)
/// assigns an id and fires `on_spawn`; setting the deleted flag gets the
/// entity destroyed during the next deletion sweep.
pub struct Entity {
    id: Option<EntityId>,
    /// String tag for finding entities by name.
    pub tag: String,
    deleted: bool,
    slots: Vec<Slot>,
    index: HashMap<ComponentKey, usize>,
    pending: Vec<Pending>,
}

impl Entity {
    pub fn new() -> Self {
        Self {
            id: None,
            tag: String::new(),
            deleted: false,
            slots: Vec::new(),
            index: HashMap::new(),
            pending: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with(mut self, component: impl Component) -> Result<Self, SimError> {
        self.attach(component)?;
        Ok(self)
    }

    /// Add a component without firing any hook.
    ///
    /// Meant for assembling an entity before it is spawned; on a live entity
    /// use [`EntityContext::attach`] or [`World::attach`](crate::World::attach)
    /// so `on_spawn` fires.
    pub fn attach(&mut self, component: impl Component) -> Result<(), SimError> {
        self.attach_boxed(Box::new(component))
    }

    pub fn attach_boxed(&mut self, component: Box<dyn Component>) -> Result<(), SimError> {
        let key = component.key();
        if self.index.contains_key(&key) {
            return Err(SimError::DuplicateComponent(key));
        }
        self.index.insert(key, self.slots.len());
        self.slots.push(Slot {
            key,
            component: Some(component),
        });
        Ok(())
    }

    /// Take a component out without firing `destroy`.
    pub fn remove(&mut self, key: ComponentKey) -> Option<Box<dyn Component>> {
        let position = self.index.remove(&key)?;
        let slot = self.slots.remove(position);
        for (i, slot) in self.slots.iter().enumerate().skip(position) {
            self.index.insert(slot.key, i);
        }
        slot.component
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn is_registered(&self) -> bool {
        self.id.is_some()
    }

    /// Request removal at the next deletion sweep.
    pub fn delete(&mut self) {
        self.deleted = true;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn has(&self, key: ComponentKey) -> bool {
        self.index.contains_key(&key)
    }

    /// Keys in attachment order.
    pub fn keys(&self) -> impl Iterator<Item = ComponentKey> + '_ {
        self.slots.iter().map(|slot| slot.key)
    }

    /// Number of attached components.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn component(&self, key: ComponentKey) -> Option<&dyn Component> {
        let &i = self.index.get(&key)?;
        self.slots[i].component.as_deref()
    }

    pub fn get<T: ComponentType>(&self) -> Option<&T> {
        downcast_ref(self.component(T::KEY)?)
    }

    pub fn get_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        let &i = self.index.get(&T::KEY)?;
        downcast_mut(self.slots[i].component.as_deref_mut()?)
    }

    pub fn hitbox(&self) -> Option<&Hitbox> {
        self.get::<HitboxComponent>().map(|c| &c.bounds)
    }

    pub fn hitbox_mut(&mut self) -> Option<&mut Hitbox> {
        self.get_mut::<HitboxComponent>().map(|c| &mut c.bounds)
    }

    /// Distance between hitbox centres, if both entities have one.
    pub fn distance_to(&self, other: &Entity) -> Option<f32> {
        Some(hitbox_distance(self.hitbox()?, other.hitbox()?))
    }

    // -- Lifecycle plumbing used by the world --

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    pub(crate) fn queue_attach(&mut self, component: Box<dyn Component>) {
        self.pending.push(Pending::Attach(component));
    }

    pub(crate) fn queue_detach(&mut self, key: ComponentKey) {
        self.pending.push(Pending::Detach(key));
    }

    /// Run `hook` on every component in attachment order, then apply any
    /// attach/detach requests the hooks made.
    pub(crate) fn dispatch<F>(&mut self, others: Others<'_>, services: &mut Services, hook: F)
    where
        F: FnMut(&mut dyn Component, &mut EntityContext<'_>),
    {
        self.dispatch_hooks(others, services, hook);
        self.apply_pending(others, services);
    }

    /// Fire `destroy` on every component. Pending changes are discarded.
    pub(crate) fn destroy_components(&mut self, others: Others<'_>, services: &mut Services) {
        self.dispatch_hooks(others, services, |c, ctx| c.destroy(ctx));
        self.pending.clear();
    }

    /// Deliver one collision. Requests the handler makes stay queued until
    /// the world applies them after the collision pass.
    pub(crate) fn collide(&mut self, contact: &Contact<'_>, others: Others<'_>, services: &mut Services) {
        let Some(id) = self.id else { return };
        let Some(&i) = self.index.get(&HitboxComponent::KEY) else { return };
        let Some(mut component) = self.slots[i].component.take() else { return };
        if let Some(hitbox) = downcast_mut::<HitboxComponent>(&mut *component) {
            let mut ctx = EntityContext::new(id, self, others, services);
            hitbox.collided_with(contact, &mut ctx);
        }
        self.slots[i].component = Some(component);
    }

    fn dispatch_hooks<F>(&mut self, others: Others<'_>, services: &mut Services, mut hook: F)
    where
        F: FnMut(&mut dyn Component, &mut EntityContext<'_>),
    {
        // Hooks only ever run on registered entities.
        let Some(id) = self.id else { return };
        for i in 0..self.slots.len() {
            let Some(mut component) = self.slots[i].component.take() else { continue };
            {
                let mut ctx = EntityContext::new(id, self, others, services);
                hook(&mut *component, &mut ctx);
            }
            self.slots[i].component = Some(component);
        }
    }

    pub(crate) fn apply_pending(&mut self, others: Others<'_>, services: &mut Services) {
        let Some(id) = self.id else { return };
        while !self.pending.is_empty() {
            for change in std::mem::take(&mut self.pending) {
                match change {
                    Pending::Attach(mut component) => {
                        let key = component.key();
                        if self.has(key) {
                            warn!("entity {id} already has a `{key}` component; attach ignored");
                            continue;
                        }
                        {
                            let mut ctx = EntityContext::new(id, self, others, services);
                            component.on_spawn(&mut ctx);
                        }
                        if let Err(err) = self.attach_boxed(component) {
                            warn!("entity {id}: {err}");
                        }
                    }
                    Pending::Detach(key) => {
                        if let Some(mut component) = self.remove(key) {
                            let mut ctx = EntityContext::new(id, self, others, services);
                            component.destroy(&mut ctx);
                        }
                    }
                }
            }
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(&'static str);

    impl Component for Marker {
        fn key(&self) -> ComponentKey {
            ComponentKey(self.0)
        }
    }

    #[test]
    fn lookup_by_key_and_type() {
        let entity = Entity::new()
            .with(HitboxComponent::new(1.0, 2.0, 3.0, 4.0).unwrap())
            .unwrap()
            .with(Marker("tail"))
            .unwrap();

        assert!(entity.has(ComponentKey("tail")));
        assert_eq!(entity.hitbox().unwrap().x, 1.0);
        assert!(entity.get::<HitboxComponent>().is_some());
        assert!(entity.component(ComponentKey("missing")).is_none());
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut entity = Entity::new();
        entity.attach(Marker("a")).unwrap();
        let err = entity.attach(Marker("a")).unwrap_err();
        assert!(matches!(err, SimError::DuplicateComponent(ComponentKey("a"))));
        assert_eq!(entity.len(), 1);
    }

    #[test]
    fn keys_keep_attachment_order_after_removal() {
        let mut entity = Entity::new();
        for key in ["a", "b", "c", "d"] {
            entity.attach(Marker(key)).unwrap();
        }
        assert!(entity.remove(ComponentKey("b")).is_some());
        let keys: Vec<_> = entity.keys().map(|k| k.0).collect();
        assert_eq!(keys, ["a", "c", "d"]);
        // Index stays consistent for the shifted components.
        assert!(entity.component(ComponentKey("d")).is_some());
        assert!(entity.remove(ComponentKey("b")).is_none());
    }

    #[test]
    fn hitbox_is_mutable_through_the_entity() {
        let mut entity = Entity::new()
            .with(HitboxComponent::new(0.0, 0.0, 1.0, 1.0).unwrap())
            .unwrap();
        entity.hitbox_mut().unwrap().x = 7.0;
        assert_eq!(entity.hitbox().unwrap().x, 7.0);
    }

    #[test]
    fn distance_needs_both_hitboxes() {
        let a = Entity::new()
            .with(HitboxComponent::new(0.0, 0.0, 2.0, 2.0).unwrap())
            .unwrap();
        let b = Entity::new()
            .with(HitboxComponent::new(3.0, 4.0, 2.0, 2.0).unwrap())
            .unwrap();
        assert_eq!(a.distance_to(&b), Some(5.0));
        assert_eq!(a.distance_to(&Entity::new()), None);
    }

    #[test]
    fn new_entity_is_unregistered_and_live() {
        let entity = Entity::new().with_tag("player");
        assert_eq!(entity.id(), None);
        assert!(!entity.is_deleted());
        assert_eq!(entity.tag, "player");
    }
}
