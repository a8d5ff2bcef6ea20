use bytemuck::{Pod, Zeroable};

/// Per-visual render data handed to the host renderer.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Top-left X in world space.
    pub x: f32,
    /// Top-left Y in world space.
    pub y: f32,
    /// Rendered width in world units.
    pub width: f32,
    /// Rendered height in world units.
    pub height: f32,
    /// Atlas index.
    pub atlas: f32,
    /// Atlas column.
    pub col: f32,
    /// Atlas row.
    pub row: f32,
    /// Draw layer (see `DrawLayer`).
    pub layer: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Render buffer containing all visual instances for one frame, back to front.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(256),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw bytes for upload to a GPU buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
