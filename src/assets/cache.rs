//! Named lookup for models, textures and animations

use std::path::{Path, PathBuf};

use log::debug;
use rustc_hash::FxHashMap;

use super::handle::AssetHandle;
use super::storage::Assets;

/// A 3D model loaded from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub path: PathBuf,
}

/// A texture loaded from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub path: PathBuf,
}

/// An animation loaded from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    pub path: PathBuf,
}

/// One asset type's storage plus its name table
struct NamedAssets<T> {
    storage: Assets<T>,
    names: FxHashMap<String, AssetHandle<T>>,
}

impl<T> NamedAssets<T> {
    fn new() -> Self {
        Self {
            storage: Assets::new(),
            names: FxHashMap::default(),
        }
    }

    fn load(
        &mut self,
        name: String,
        path: &Path,
        load: impl FnOnce(&Path) -> T,
    ) -> AssetHandle<T> {
        let handle = self.storage.get_or_load(path, load);
        if let Some(previous) = self.names.insert(name.clone(), handle.clone())
            && previous != handle
        {
            debug!("Replaced `{name}` ({}) with {}", previous.id(), handle.id());
            self.release_if_unnamed(&previous);
        }
        handle
    }

    fn get(&self, name: &str) -> Option<AssetHandle<T>> {
        self.names.get(name).cloned()
    }

    fn unload(&mut self, name: &str) -> bool {
        match self.names.remove(name) {
            Some(handle) => {
                self.release_if_unnamed(&handle);
                true
            }
            None => false,
        }
    }

    /// Drop the stored asset once no name refers to it.
    ///
    /// Outstanding handles keep the asset itself alive.
    fn release_if_unnamed(&mut self, handle: &AssetHandle<T>) {
        if !self.names.values().any(|h| h == handle) {
            self.storage.remove(handle.id());
        }
    }

    fn clear(&mut self) {
        self.names.clear();
        self.storage.clear();
    }
}

/// Memoized named lookup for models, textures and animations.
///
/// Loading a name that is already cached overwrites its entry. Two names
/// loading the same path share one asset.
pub struct ResourceCache {
    models: NamedAssets<Model>,
    textures: NamedAssets<Texture>,
    animations: NamedAssets<Animation>,
}

impl ResourceCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            models: NamedAssets::new(),
            textures: NamedAssets::new(),
            animations: NamedAssets::new(),
        }
    }

    /// Register a model under `name`
    pub fn load_model(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> AssetHandle<Model> {
        self.models.load(name.into(), path.as_ref(), |path| Model {
            path: path.to_path_buf(),
        })
    }

    /// Register a texture under `name`
    pub fn load_texture(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> AssetHandle<Texture> {
        self.textures.load(name.into(), path.as_ref(), |path| Texture {
            path: path.to_path_buf(),
        })
    }

    /// Register an animation under `name`
    pub fn load_animation(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> AssetHandle<Animation> {
        self.animations
            .load(name.into(), path.as_ref(), |path| Animation {
                path: path.to_path_buf(),
            })
    }

    #[must_use]
    pub fn get_model(&self, name: &str) -> Option<AssetHandle<Model>> {
        self.models.get(name)
    }

    #[must_use]
    pub fn get_texture(&self, name: &str) -> Option<AssetHandle<Texture>> {
        self.textures.get(name)
    }

    #[must_use]
    pub fn get_animation(&self, name: &str) -> Option<AssetHandle<Animation>> {
        self.animations.get(name)
    }

    pub fn unload_model(&mut self, name: &str) -> bool {
        self.models.unload(name)
    }

    pub fn unload_texture(&mut self, name: &str) -> bool {
        self.textures.unload(name)
    }

    pub fn unload_animation(&mut self, name: &str) -> bool {
        self.animations.unload(name)
    }

    /// Number of stored assets across all three tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.storage.len() + self.textures.storage.len() + self.animations.storage.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.models.clear();
        self.textures.clear();
        self.animations.clear();
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unregistered_is_none() {
        let cache = ResourceCache::new();
        assert!(cache.get_model("ghost").is_none());
        assert!(cache.get_texture("ghost").is_none());
        assert!(cache.get_animation("ghost").is_none());
    }

    #[test]
    fn test_load_and_get() {
        let mut cache = ResourceCache::new();
        let handle = cache.load_model("tree", "models/tree.obj");

        let cached = cache.get_model("tree").unwrap();
        assert_eq!(cached, handle);
        assert_eq!(cached.path, PathBuf::from("models/tree.obj"));
        assert!(cache.get_texture("tree").is_none());
    }

    #[test]
    fn test_reload_overwrites_name() {
        let mut cache = ResourceCache::new();
        let old = cache.load_texture("ground", "textures/grass.png");
        let new = cache.load_texture("ground", "textures/sand.png");

        assert_ne!(old, new);
        assert_eq!(cache.get_texture("ground").unwrap(), new);
        assert_eq!(old.path, PathBuf::from("textures/grass.png"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_reload_is_idempotent() {
        let mut cache = ResourceCache::new();
        let first = cache.load_animation("walk", "anims/walk.anim");
        let second = cache.load_animation("walk", "anims/walk.anim");
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_names_share_path() {
        let mut cache = ResourceCache::new();
        let a = cache.load_model("crate", "models/box.obj");
        let b = cache.load_model("box", "models/box.obj");
        assert_eq!(a, b);

        assert!(cache.unload_model("crate"));
        assert!(cache.get_model("box").is_some());
        assert_eq!(cache.len(), 1);

        assert!(cache.unload_model("box"));
        assert!(!cache.unload_model("box"));
        assert!(cache.is_empty());
    }
}
