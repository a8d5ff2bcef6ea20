/// Draw-order hint for visuals registered with the stage.
///
/// Layers are drawn back-to-front: Background first, Overlay last.
/// Within a layer, visuals keep the order they were attached in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum DrawLayer {
    Background = 0,
    Terrain = 1,
    #[default]
    Actors = 2,
    Effects = 3,
    Overlay = 4,
}

impl DrawLayer {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
