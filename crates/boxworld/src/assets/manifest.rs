use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::error::SimError;

/// Asset manifest describing texture atlases and the named textures cut from them.
/// Loaded from a JSON file by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// List of texture atlases.
    pub atlases: Vec<AtlasDescriptor>,
    /// Named texture lookup: name → atlas index + cell coordinates.
    #[serde(default)]
    pub textures: HashMap<String, TextureDescriptor>,
}

/// Describes a single texture atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasDescriptor {
    /// Human-readable name (e.g., "sprites").
    pub name: String,
    /// Relative path to the image file.
    pub path: String,
    /// Size of one grid cell in world units.
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
}

/// Describes a named texture within an atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Index into the atlases array.
    pub atlas: u32,
    /// Column in the atlas grid.
    pub col: u32,
    /// Row in the atlas grid.
    pub row: u32,
    /// Number of cells this texture spans on each axis (default: 1).
    #[serde(default = "default_span")]
    pub span: u32,
    /// Rendered size in world units; defaults to `cell_size * span`.
    #[serde(default)]
    pub size: Option<[f32; 2]>,
}

fn default_span() -> u32 {
    1
}

fn default_cell_size() -> f32 {
    32.0
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }
}
