use std::fmt;

use glam::Vec2;

use crate::api::error::SimError;
use crate::api::types::{ComponentKey, Edge, EntityId};
use crate::components::component::{Component, ComponentType};
use crate::core::context::EntityContext;

/// Axis-aligned box with its position at the start of the current frame.
///
/// `prev_x`/`prev_y` must hold the pre-movement position for swept edge
/// detection to work. The world snapshots every live hitbox before the
/// update pass; components that move a box more than once per frame
/// should not snapshot again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub prev_x: f32,
    pub prev_y: f32,
    width: f32,
    height: f32,
}

impl Hitbox {
    /// Create a box at `(x, y)`. Negative or NaN sizes are rejected.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, SimError> {
        check_size(width, height)?;
        Ok(Self {
            x,
            y,
            prev_x: x,
            prev_y: y,
            width,
            height,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn prev_position(&self) -> Vec2 {
        Vec2::new(self.prev_x, self.prev_y)
    }

    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        check_size(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Record the current position as the start of this frame's movement.
    pub fn snapshot(&mut self) {
        self.prev_x = self.x;
        self.prev_y = self.y;
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Strict overlap on both axes; boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Hitbox) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// End points of one side of the box, in the current frame.
    pub fn edge(&self, edge: Edge) -> (Vec2, Vec2) {
        match edge {
            Edge::Top => (Vec2::new(self.x, self.y), Vec2::new(self.right(), self.y)),
            Edge::Left => (Vec2::new(self.x, self.y), Vec2::new(self.x, self.bottom())),
            Edge::Bottom => (
                Vec2::new(self.x, self.bottom()),
                Vec2::new(self.right(), self.bottom()),
            ),
            Edge::Right => (
                Vec2::new(self.right(), self.y),
                Vec2::new(self.right(), self.bottom()),
            ),
        }
    }
}

fn check_size(width: f32, height: f32) -> Result<(), SimError> {
    // Written this way round so NaN fails too.
    if width >= 0.0 && height >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidSize { width, height })
    }
}

/// The other party in a collision, as seen by a handler.
#[derive(Debug, Clone, Copy)]
pub struct Contact<'a> {
    pub entity: EntityId,
    pub tag: &'a str,
    pub hitbox: Hitbox,
}

/// Reaction to this entity's hitbox overlapping another.
///
/// Edge information is not supplied; call
/// [`edge_of_collision`](crate::core::geometry::edge_of_collision) when needed.
pub trait CollisionHandler: 'static {
    fn collided_with(&mut self, own: &mut Hitbox, other: &Contact<'_>, ctx: &mut EntityContext<'_>);
}

struct FnHandler<F>(F);

impl<F> CollisionHandler for FnHandler<F>
where
    F: FnMut(&mut Hitbox, &Contact<'_>, &mut EntityContext<'_>) + 'static,
{
    fn collided_with(&mut self, own: &mut Hitbox, other: &Contact<'_>, ctx: &mut EntityContext<'_>) {
        (self.0)(own, other, ctx)
    }
}

/// Component carrying an entity's hitbox and its collision reaction.
pub struct HitboxComponent {
    pub bounds: Hitbox,
    handler: Option<Box<dyn CollisionHandler>>,
}

impl HitboxComponent {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Result<Self, SimError> {
        Ok(Self::from_bounds(Hitbox::new(x, y, width, height)?))
    }

    pub fn from_bounds(bounds: Hitbox) -> Self {
        Self {
            bounds,
            handler: None,
        }
    }

    // -- Builder pattern --

    pub fn with_handler(mut self, handler: impl CollisionHandler) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Closure form of [`with_handler`](Self::with_handler).
    pub fn on_collision<F>(self, f: F) -> Self
    where
        F: FnMut(&mut Hitbox, &Contact<'_>, &mut EntityContext<'_>) + 'static,
    {
        self.with_handler(FnHandler(f))
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Called by the world once per overlapping pair. No-op without a handler.
    pub fn collided_with(&mut self, other: &Contact<'_>, ctx: &mut EntityContext<'_>) {
        if let Some(handler) = self.handler.as_mut() {
            handler.collided_with(&mut self.bounds, other, ctx);
        }
    }
}

impl fmt::Debug for HitboxComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitboxComponent")
            .field("bounds", &self.bounds)
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

impl Component for HitboxComponent {
    fn key(&self) -> ComponentKey {
        Self::KEY
    }
}

impl ComponentType for HitboxComponent {
    const KEY: ComponentKey = ComponentKey("hitbox");
}
