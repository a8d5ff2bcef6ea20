use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::SimError;

/// World construction settings.
///
/// Entity positions are expressed in world units. The canvas size is the
/// resolution the host draws at; when both match, one unit is one pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width in world units.
    pub world_width: f32,
    /// World height in world units.
    pub world_height: f32,
    /// Width of the host's drawing surface in pixels.
    pub canvas_width: f32,
    /// Height of the host's drawing surface in pixels.
    pub canvas_height: f32,
    /// Length of one fixed simulation step in milliseconds (default: 1000/60).
    pub fixed_step_ms: f32,
    /// Seed for the world's random number generator.
    pub rng_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
            fixed_step_ms: 1000.0 / 60.0,
            rng_seed: 42,
        }
    }
}

impl WorldConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    /// Canvas pixels per world unit on each axis.
    pub fn pixels_per_unit(&self) -> Vec2 {
        Vec2::new(
            self.canvas_width / self.world_width,
            self.canvas_height / self.world_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WorldConfig::from_json(r#"{ "world_width": 1600 }"#).unwrap();
        assert_eq!(config.world_width, 1600.0);
        assert_eq!(config.world_height, 600.0);
        assert_eq!(config.canvas_width, 800.0);
    }

    #[test]
    fn scale_is_two_when_world_is_half_the_canvas() {
        let config = WorldConfig {
            world_width: 400.0,
            world_height: 300.0,
            ..WorldConfig::default()
        };
        assert_eq!(config.pixels_per_unit(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(WorldConfig::from_json("{ world_width: }").is_err());
    }
}
