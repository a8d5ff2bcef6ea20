//! The stage: where visual representations of entities are registered.
//!
//! The simulation never draws. Components attach visuals here, move them
//! during late update, and detach them on destroy; a host renderer reads
//! the result once per frame through [`Stage::write_instances`].

use glam::Vec2;

use crate::assets::registry::TextureHandle;
use crate::components::layer::DrawLayer;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Handle to a visual registered with a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisualId(pub u32);

/// Visual registry the simulation talks to.
pub trait Stage {
    /// Register a visual. It is placed at the origin until moved.
    fn attach(&mut self, texture: TextureHandle, layer: DrawLayer) -> VisualId;

    /// Unregister a visual. Unknown ids are ignored.
    fn detach(&mut self, id: VisualId);

    /// Move a visual's top-left corner to `pos` in world space.
    fn place(&mut self, id: VisualId, pos: Vec2);

    /// Write every visual, back to front, into `buffer`.
    fn write_instances(&self, _buffer: &mut RenderBuffer) {}
}

/// A registered visual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub id: VisualId,
    pub texture: TextureHandle,
    pub layer: DrawLayer,
    pub pos: Vec2,
}

impl Visual {
    fn instance(&self) -> RenderInstance {
        RenderInstance {
            x: self.pos.x,
            y: self.pos.y,
            width: self.texture.size.x,
            height: self.texture.size.y,
            atlas: self.texture.atlas.0 as f32,
            col: self.texture.col as f32,
            row: self.texture.row as f32,
            layer: self.layer.as_u8() as f32,
        }
    }
}

/// Default stage: visuals in a Vec, in attachment order.
pub struct SpriteStage {
    visuals: Vec<Visual>,
    next_id: u32,
}

impl SpriteStage {
    pub fn new() -> Self {
        Self {
            visuals: Vec::new(),
            next_id: 1,
        }
    }

    pub fn get(&self, id: VisualId) -> Option<&Visual> {
        self.visuals.iter().find(|v| v.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Visual> {
        self.visuals.iter()
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }
}

impl Default for SpriteStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for SpriteStage {
    fn attach(&mut self, texture: TextureHandle, layer: DrawLayer) -> VisualId {
        let id = VisualId(self.next_id);
        self.next_id += 1;
        self.visuals.push(Visual {
            id,
            texture,
            layer,
            pos: Vec2::ZERO,
        });
        id
    }

    fn detach(&mut self, id: VisualId) {
        self.visuals.retain(|v| v.id != id);
    }

    fn place(&mut self, id: VisualId, pos: Vec2) {
        if let Some(visual) = self.visuals.iter_mut().find(|v| v.id == id) {
            visual.pos = pos;
        }
    }

    fn write_instances(&self, buffer: &mut RenderBuffer) {
        buffer.clear();
        let mut ordered: Vec<&Visual> = self.visuals.iter().collect();
        // Stable, so attachment order holds within a layer.
        ordered.sort_by_key(|v| v.layer);
        for visual in ordered {
            buffer.push(visual.instance());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::registry::AtlasId;

    fn texture(col: u32) -> TextureHandle {
        TextureHandle {
            atlas: AtlasId(0),
            col,
            row: 0,
            span: 1,
            size: Vec2::new(16.0, 16.0),
        }
    }

    #[test]
    fn attach_place_detach() {
        let mut stage = SpriteStage::new();
        let id = stage.attach(texture(0), DrawLayer::Actors);
        stage.place(id, Vec2::new(3.0, 4.0));
        assert_eq!(stage.get(id).unwrap().pos, Vec2::new(3.0, 4.0));

        stage.detach(id);
        assert!(stage.is_empty());
        // Detaching twice is harmless.
        stage.detach(id);
    }

    #[test]
    fn instances_are_sorted_back_to_front() {
        let mut stage = SpriteStage::new();
        stage.attach(texture(1), DrawLayer::Overlay);
        stage.attach(texture(2), DrawLayer::Background);
        stage.attach(texture(3), DrawLayer::Actors);
        stage.attach(texture(4), DrawLayer::Background);

        let mut buf = RenderBuffer::new();
        stage.write_instances(&mut buf);
        let cols: Vec<f32> = buf.instances.iter().map(|i| i.col).collect();
        assert_eq!(cols, [2.0, 4.0, 3.0, 1.0]);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut stage = SpriteStage::new();
        let a = stage.attach(texture(0), DrawLayer::Actors);
        stage.detach(a);
        let b = stage.attach(texture(0), DrawLayer::Actors);
        assert_ne!(a, b);
    }
}
