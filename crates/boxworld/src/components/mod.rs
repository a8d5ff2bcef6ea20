pub mod component;
pub mod entity;
pub mod hitbox;
pub mod layer;
pub mod sprite;
