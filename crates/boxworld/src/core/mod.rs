pub mod context;
pub mod geometry;
pub mod scene;
pub mod time;
pub mod world;
