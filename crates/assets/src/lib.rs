//! Texture handle resolution.
//!
//! Image decoding and VRAM upload happen elsewhere. This crate only knows
//! where a texture lives in video memory and turns that into the opaque
//! texture-page and palette handles that textured primitives carry.
//!
//! # Layout
//! A texture table can be described by a JSON manifest:
//! ```text
//! { "textures": [ { "name": "cobble", "depth": "indexed4",
//!                   "pixels": [640, 0], "clut": [0, 480] } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Pixel format of a texture page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorDepth {
    #[default]
    Indexed4,
    Indexed8,
    Direct15,
}

impl ColorDepth {
    fn bits(self) -> u16 {
        match self {
            Self::Indexed4 => 0,
            Self::Indexed8 => 1,
            Self::Direct15 => 2,
        }
    }
}

/// Where a texture and its palette were uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub depth: ColorDepth,
    /// VRAM x/y of the pixel data.
    pub pixels: [u16; 2],
    /// VRAM x/y of the palette, absent for direct-colour textures.
    #[serde(default)]
    pub clut: Option<[u16; 2]>,
}

/// Opaque texture-page + palette pair attached to textured primitives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle {
    pub tpage: u16,
    pub clut: u16,
}

impl TextureHandle {
    pub fn from_info(info: &TextureInfo) -> Self {
        let [px, py] = info.pixels;
        let clut = info.clut.map_or(0, |[cx, cy]| (cy << 6) | ((cx >> 4) & 0x3f));
        Self {
            tpage: (info.depth.bits() << 7) | ((py & 0x100) >> 4) | ((px & 0x3ff) >> 6),
            clut,
        }
    }
}

/// UV rectangle inside a texture page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UvRect {
    pub u: u8,
    pub v: u8,
    pub w: u8,
    pub h: u8,
}

impl UvRect {
    pub const fn new(u: u8, v: u8, w: u8, h: u8) -> Self {
        Self { u, v, w, h }
    }
}

/// Texture window used to repeat a sub-rectangle across a primitive.
pub type TextureWindow = UvRect;

/// Errors from texture resolution and manifest loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("texture not found: {0}")]
    NotFound(String),
    #[error("duplicate texture name: {0}")]
    Duplicate(String),
}

/// Supplies texture handles by name.
pub trait TextureResolver {
    fn resolve(&self, name: &str) -> Result<TextureHandle, AssetError>;
}

#[derive(Debug, Deserialize)]
struct Manifest {
    textures: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    name: String,
    #[serde(flatten)]
    info: TextureInfo,
}

/// Name-keyed table of uploaded textures.
#[derive(Debug, Clone, Default)]
pub struct TextureTable {
    textures: BTreeMap<String, TextureInfo>,
}

impl TextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture and return its handle.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        info: TextureInfo,
    ) -> Result<TextureHandle, AssetError> {
        let name = name.into();
        if self.textures.contains_key(&name) {
            return Err(AssetError::Duplicate(name));
        }
        let handle = TextureHandle::from_info(&info);
        tracing::debug!(%name, tpage = handle.tpage, clut = handle.clut, "texture registered");
        self.textures.insert(name, info);
        Ok(handle)
    }

    pub fn from_json_str(json: &str) -> Result<Self, AssetError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let mut table = Self::new();
        for entry in manifest.textures {
            table.register(entry.name, entry.info)?;
        }
        Ok(table)
    }

    /// Load a JSON texture manifest from disk.
    pub fn load_manifest(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    pub fn get(&self, name: &str) -> Option<&TextureInfo> {
        self.textures.get(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureResolver for TextureTable {
    fn resolve(&self, name: &str) -> Result<TextureHandle, AssetError> {
        self.textures
            .get(name)
            .map(TextureHandle::from_info)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }
}
