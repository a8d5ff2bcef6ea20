// extensions/mod.rs
//
// Optional helpers for gameplay code. Nothing in the frame loop depends on
// them; the world only seeds an Rng so hooks can share one deterministic stream.

pub mod random;

pub use random::Rng;
