//=========================================================================
// Content Loading
//=========================================================================
//
// Boundary to the asset collaborator.
//
// Entities acquire their resources synchronously while being
// instantiated. A missing asset is a configuration error for that
// entity and is surfaced to the caller; nothing is retried.
//
// Architecture:
//   EntityManager::instantiate() → Behavior::load_content()
//                                    → ContentLoader::load_texture()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};
use thiserror::Error;

//=== Texture =============================================================

/// Opaque identifier of a texture owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Handle to a loaded texture with its pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

//=== ContentError ========================================================

/// Errors raised while acquiring entity content.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("asset '{path}' is not available")]
    MissingAsset { path: String },

    #[error("asset '{path}' has invalid dimensions {width}x{height}")]
    InvalidDimensions { path: String, width: u32, height: u32 },
}

//=== ContentLoader =======================================================

/// Synchronous asset source used during entity initialization.
pub trait ContentLoader {
    /// Loads (or returns the cached) texture registered under `path`.
    fn load_texture(&mut self, path: &str) -> Result<Texture, ContentError>;
}

impl<T: ContentLoader + ?Sized> ContentLoader for Box<T> {
    fn load_texture(&mut self, path: &str) -> Result<Texture, ContentError> {
        (**self).load_texture(path)
    }
}

//=== ContentLibrary ======================================================

/// In-memory texture registry.
///
/// Textures are registered up front by the host (typically after the
/// rendering backend has uploaded them) and resolved by path during
/// entity initialization. A 1×1 white texture is always available under
/// [`ContentLibrary::PIXEL`] for drawing solid rectangles.
pub struct ContentLibrary {
    textures: HashMap<String, Texture>,
    next_id: u32,
}

impl ContentLibrary {
    /// Path of the built-in 1×1 white texture.
    pub const PIXEL: &'static str = "builtin/pixel";

    pub fn new() -> Self {
        let mut library = Self {
            textures: HashMap::new(),
            next_id: 0,
        };
        library.insert(Self::PIXEL, 1, 1);
        library
    }

    /// Registers a texture under `path` and returns its handle.
    ///
    /// Re-registering a path replaces the previous entry with a fresh id.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Result<Texture, ContentError> {
        let path = path.into();
        if width == 0 || height == 0 {
            return Err(ContentError::InvalidDimensions { path, width, height });
        }

        if self.textures.contains_key(&path) {
            warn!(target: "content", "Texture '{}' was already registered and has been replaced", path);
        }

        Ok(self.insert(&path, width, height))
    }

    /// Returns `true` if a texture is registered under `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.textures.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn insert(&mut self, path: &str, width: u32, height: u32) -> Texture {
        let texture = Texture {
            id: TextureId(self.next_id),
            width,
            height,
        };
        self.next_id += 1;
        self.textures.insert(path.to_owned(), texture);
        texture
    }
}

impl ContentLoader for ContentLibrary {
    fn load_texture(&mut self, path: &str) -> Result<Texture, ContentError> {
        match self.textures.get(path) {
            Some(texture) => {
                debug!(target: "content", "Loaded texture '{}' ({:?})", path, texture.id);
                Ok(*texture)
            }
            None => Err(ContentError::MissingAsset { path: path.to_owned() }),
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for ContentLibrary {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_texture_is_builtin() {
        let mut library = ContentLibrary::new();
        let pixel = library.load_texture(ContentLibrary::PIXEL).unwrap();
        assert_eq!((pixel.width, pixel.height), (1, 1));
    }

    #[test]
    fn registered_texture_resolves_by_path() {
        let mut library = ContentLibrary::new();
        let registered = library.register("ship.png", 32, 16).unwrap();

        assert_eq!(library.load_texture("ship.png").unwrap(), registered);
        assert_ne!(registered.id, library.load_texture(ContentLibrary::PIXEL).unwrap().id);
    }

    #[test]
    fn missing_asset_is_an_error() {
        let mut library = ContentLibrary::new();
        let err = library.load_texture("nope.png").unwrap_err();
        assert_eq!(err, ContentError::MissingAsset { path: "nope.png".into() });
    }

    #[test]
    fn zero_sized_texture_is_rejected() {
        let mut library = ContentLibrary::new();
        assert!(matches!(
            library.register("empty.png", 0, 8),
            Err(ContentError::InvalidDimensions { .. })
        ));
        assert!(!library.contains("empty.png"));
    }
}
