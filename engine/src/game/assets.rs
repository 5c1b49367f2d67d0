//! Texture bookkeeping for renderers.
//!
//! The store maps texture IDs to [`Texture`] handles resolved against a base path. Decoding the
//! files and uploading them to a GPU is left to the [`Canvas`](crate::game::Canvas)
//! implementation; the store only knows where each texture lives.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use log::{debug, warn};

/// A named texture and the file it is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Texture {
    id: String,
    path: PathBuf,
}

impl Texture {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Texture registry keyed by string ID.
#[derive(Debug, Default)]
pub struct AssetStore {
    texture_path: PathBuf,
    textures: HashMap<String, Texture>,
}

impl AssetStore {
    /// Create a store resolving texture files against `texture_path`.
    pub fn new(texture_path: impl Into<PathBuf>) -> Self {
        Self {
            texture_path: texture_path.into(),
            textures: HashMap::new(),
        }
    }

    pub fn texture_path(&self) -> &Path {
        &self.texture_path
    }

    /// Change the base path for textures added from now on.
    pub fn set_texture_path(&mut self, texture_path: impl Into<PathBuf>) {
        self.texture_path = texture_path.into();
        debug!("texture path is now {}", self.texture_path.display());
    }

    /// Register `file` (relative to the texture path) under `id`. Returns `false`, keeping the
    /// existing texture, if `id` is taken.
    pub fn add_texture(&mut self, id: impl Into<String>, file: impl AsRef<Path>) -> bool {
        let id = id.into();
        if self.textures.contains_key(&id) {
            warn!("texture `{}` is already registered", id);
            return false;
        }

        let path = self.texture_path.join(file);
        debug!("added texture `{}` from {}", id, path.display());
        self.textures.insert(id.clone(), Texture { id, path });
        true
    }

    pub fn texture(&self, id: &str) -> Option<&Texture> {
        self.textures.get(id)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Forget every texture. The texture path is kept.
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}
