use std::any::Any;

use crate::api::types::ComponentKey;
use crate::core::context::EntityContext;

/// Upcast helper so boxed components can be downcast to their concrete type.
/// Implemented automatically for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of behaviour attached to an entity.
///
/// Hooks fire in attachment order. While a hook runs, the component is
/// checked out of its entity, so looking up its own key through the
/// context yields `None`.
pub trait Component: AsAny {
    /// Identity of this component; at most one per key on an entity.
    fn key(&self) -> ComponentKey;

    /// The entity was registered with the world, or this component was
    /// attached to an already-live entity.
    fn on_spawn(&mut self, _ctx: &mut EntityContext<'_>) {}

    /// First per-frame pass. Movement and self-deletion happen here.
    fn update(&mut self, _ctx: &mut EntityContext<'_>, _delta_ms: f32) {}

    /// Second per-frame pass, after deletion and collision handling.
    fn late_update(&mut self, _ctx: &mut EntityContext<'_>, _delta_ms: f32) {}

    /// The entity was removed from the world, or this component was detached.
    fn destroy(&mut self, _ctx: &mut EntityContext<'_>) {}
}

/// A component type with a statically known key, enabling typed lookup.
pub trait ComponentType: Component + Sized {
    const KEY: ComponentKey;
}

pub(crate) fn downcast_ref<T: ComponentType>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}

pub(crate) fn downcast_mut<T: ComponentType>(component: &mut dyn Component) -> Option<&mut T> {
    component.as_any_mut().downcast_mut::<T>()
}
