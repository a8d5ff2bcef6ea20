pub mod instance;
pub mod stage;

pub use instance::{RenderBuffer, RenderInstance};
pub use stage::{SpriteStage, Stage, Visual, VisualId};
