pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod extensions;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::config::WorldConfig;
pub use api::error::SimError;
pub use api::types::{ComponentKey, Edge, EntityId};
pub use assets::manifest::AssetManifest;
pub use assets::registry::{AssetRegistry, AtlasId, TextureHandle};
pub use components::component::{Component, ComponentType};
pub use components::entity::Entity;
pub use components::hitbox::{CollisionHandler, Contact, Hitbox, HitboxComponent};
pub use components::layer::DrawLayer;
pub use components::sprite::SpriteComponent;
pub use core::context::{EntityContext, Others};
pub use core::geometry::{
    edge_of_collision, hitbox_distance, segment_intersection, segments_intersect, Vector,
};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::world::World;
pub use extensions::Rng;
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use renderer::stage::{SpriteStage, Stage, Visual, VisualId};
