use log::warn;

use crate::api::types::ComponentKey;
use crate::assets::registry::TextureHandle;
use crate::components::component::{Component, ComponentType};
use crate::components::layer::DrawLayer;
use crate::core::context::EntityContext;
use crate::renderer::stage::VisualId;

/// A visual that tracks its entity's hitbox.
///
/// The texture is resolved by name when the entity spawns and drawn centred
/// on the hitbox. It moves in `late_update`, after collision handling, so it
/// is never drawn at a position collision response has already corrected.
#[derive(Debug, Clone)]
pub struct SpriteComponent {
    texture_name: String,
    layer: DrawLayer,
    texture: Option<TextureHandle>,
    visual: Option<VisualId>,
}

impl SpriteComponent {
    pub fn new(texture_name: impl Into<String>) -> Self {
        Self {
            texture_name: texture_name.into(),
            layer: DrawLayer::default(),
            texture: None,
            visual: None,
        }
    }

    pub fn with_layer(mut self, layer: DrawLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn texture_name(&self) -> &str {
        &self.texture_name
    }

    pub fn layer(&self) -> DrawLayer {
        self.layer
    }

    /// The stage handle, once spawned with a resolvable texture.
    pub fn visual(&self) -> Option<VisualId> {
        self.visual
    }

    fn snap_to_entity(&self, ctx: &mut EntityContext<'_>) {
        let (Some(visual), Some(texture)) = (self.visual, self.texture) else {
            return;
        };
        let Some(hitbox) = ctx.hitbox().copied() else {
            return;
        };
        let pos = hitbox.position() - (texture.size - hitbox.size()) / 2.0;
        ctx.stage().place(visual, pos);
    }
}

impl Component for SpriteComponent {
    fn key(&self) -> ComponentKey {
        Self::KEY
    }

    fn on_spawn(&mut self, ctx: &mut EntityContext<'_>) {
        let Some(texture) = ctx.assets().texture(&self.texture_name) else {
            warn!(
                "entity {}: no texture named `{}`; sprite stays hidden",
                ctx.id(),
                self.texture_name
            );
            return;
        };
        self.texture = Some(texture);
        self.visual = Some(ctx.stage().attach(texture, self.layer));
        self.snap_to_entity(ctx);
    }

    fn late_update(&mut self, ctx: &mut EntityContext<'_>, _delta_ms: f32) {
        self.snap_to_entity(ctx);
    }

    fn destroy(&mut self, ctx: &mut EntityContext<'_>) {
        if let Some(visual) = self.visual.take() {
            ctx.stage().detach(visual);
        }
    }
}

impl ComponentType for SpriteComponent {
    const KEY: ComponentKey = ComponentKey("sprite");
}
