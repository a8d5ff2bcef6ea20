use std::collections::HashMap;

use glam::Vec2;
use log::warn;

use crate::api::error::SimError;
use crate::assets::manifest::AssetManifest;

/// Identifies which texture atlas a texture belongs to.
/// Index into the AssetManifest's atlas list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtlasId(pub u32);

/// A loaded texture, resolved by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureHandle {
    pub atlas: AtlasId,
    pub col: u32,
    pub row: u32,
    pub span: u32,
    /// Rendered size in world units.
    pub size: Vec2,
}

/// Registry of named textures, built from an AssetManifest.
/// This is the lookup the core uses to turn a resource name into a handle.
pub struct AssetRegistry {
    textures: HashMap<String, TextureHandle>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// Build a registry from a parsed AssetManifest.
    /// Textures pointing at an unknown atlas are skipped.
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let mut textures = HashMap::with_capacity(manifest.textures.len());
        for (name, desc) in &manifest.textures {
            let Some(atlas) = manifest.atlases.get(desc.atlas as usize) else {
                warn!("texture `{name}` refers to missing atlas {}", desc.atlas);
                continue;
            };
            let size = match desc.size {
                Some([w, h]) => Vec2::new(w, h),
                None => Vec2::splat(atlas.cell_size * desc.span as f32),
            };
            textures.insert(
                name.clone(),
                TextureHandle {
                    atlas: AtlasId(desc.atlas),
                    col: desc.col,
                    row: desc.row,
                    span: desc.span,
                    size,
                },
            );
        }
        Self { textures }
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(Self::from_manifest(&AssetManifest::from_json(json)?))
    }

    /// Register a texture the host loaded by other means.
    pub fn insert(&mut self, name: impl Into<String>, handle: TextureHandle) {
        self.textures.insert(name.into(), handle);
    }

    /// Look up a texture by name. Returns None if not found.
    pub fn texture(&self, name: &str) -> Option<TextureHandle> {
        self.textures.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "atlases": [
            { "name": "tiles", "path": "tiles.png", "cell_size": 16 }
        ],
        "textures": {
            "hero": { "atlas": 0, "col": 3, "row": 5, "span": 2 },
            "coin": { "atlas": 0, "col": 0, "row": 0, "size": [8, 10] },
            "ghost": { "atlas": 4, "col": 0, "row": 0 }
        }
    }"#;

    #[test]
    fn loads_from_manifest() {
        let reg = AssetRegistry::from_json(MANIFEST).unwrap();

        let hero = reg.texture("hero").expect("hero should exist");
        assert_eq!(hero.atlas, AtlasId(0));
        assert_eq!((hero.col, hero.row), (3, 5));
        assert_eq!(hero.size, Vec2::new(32.0, 32.0));

        let coin = reg.texture("coin").unwrap();
        assert_eq!(coin.size, Vec2::new(8.0, 10.0));
    }

    #[test]
    fn texture_with_unknown_atlas_is_skipped() {
        let reg = AssetRegistry::from_json(MANIFEST).unwrap();
        assert!(reg.texture("ghost").is_none());
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn unknown_returns_none() {
        let reg = AssetRegistry::new();
        assert!(reg.texture("nonexistent").is_none());
    }
}
