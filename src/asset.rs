//! Asset resolution capability for texture parameters
//!
//! The library never touches an asset database directly. Texture parameters
//! carry an opaque [`TextureRef`] handle; turning a document path into a
//! handle (and back) goes through the injected [`AssetResolver`], so the core
//! stays headless and testable.

use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

/// Errors from the asset resolution capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// No asset exists at the given path
    #[error("asset not found: {path}")]
    NotFound { path: String },

    /// A handle this resolver never issued
    #[error("unknown texture handle {handle:?}")]
    UnknownHandle { handle: TextureRef },
}

/// Opaque handle to a resolved texture asset.
///
/// Copying the handle shares the underlying asset; two handles compare equal
/// exactly when they were issued for the same asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef(u64);

impl TextureRef {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Resolves asset paths to texture handles and back
pub trait AssetResolver {
    /// Resolve an asset path to a handle
    fn load(&self, path: &str) -> Result<TextureRef, AssetError>;

    /// The persistent path of a previously issued handle
    fn path_of(&self, texture: TextureRef) -> Result<String, AssetError>;
}

/// Path-keyed resolver with no backing asset database.
///
/// Issues a fresh handle for every new path and remembers the mapping, so
/// loading the same path twice yields the same handle. Suitable for tests and
/// for hosts without an asset pipeline.
#[derive(Debug, Default)]
pub struct InMemoryAssets {
    table: RefCell<AssetTable>,
}

#[derive(Debug, Default)]
struct AssetTable {
    by_path: HashMap<String, TextureRef>,
    paths: Vec<String>,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetResolver for InMemoryAssets {
    fn load(&self, path: &str) -> Result<TextureRef, AssetError> {
        let mut table = self.table.borrow_mut();
        if let Some(handle) = table.by_path.get(path) {
            return Ok(*handle);
        }
        let handle = TextureRef::new(table.paths.len() as u64);
        table.paths.push(path.to_string());
        table.by_path.insert(path.to_string(), handle);
        Ok(handle)
    }

    fn path_of(&self, texture: TextureRef) -> Result<String, AssetError> {
        self.table
            .borrow()
            .paths
            .get(texture.raw() as usize)
            .cloned()
            .ok_or(AssetError::UnknownHandle { handle: texture })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_same_handle() {
        let assets = InMemoryAssets::new();
        let a = assets.load("Textures/a.png").expect("Should load");
        let b = assets.load("Textures/a.png").expect("Should load");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_paths_distinct_handles() {
        let assets = InMemoryAssets::new();
        let a = assets.load("Textures/a.png").expect("Should load");
        let b = assets.load("Textures/b.png").expect("Should load");
        assert_ne!(a, b);
        assert_eq!(assets.path_of(b).expect("Should resolve"), "Textures/b.png");
    }

    #[test]
    fn test_unknown_handle_errors() {
        let assets = InMemoryAssets::new();
        let err = assets
            .path_of(TextureRef::new(99))
            .expect_err("Should reject unknown handle");
        assert!(matches!(err, AssetError::UnknownHandle { .. }));
    }
}
