//! Asset storage
//!
//! Stores loaded assets of one type with path-based deduplication.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::handle::{AssetHandle, AssetId};

struct AssetEntry<T> {
    handle: AssetHandle<T>,
    /// Original path this asset was loaded from
    path: Option<PathBuf>,
}

/// Centralized storage for all assets of a specific type
pub struct Assets<T> {
    assets: FxHashMap<AssetId, AssetEntry<T>>,
    /// Path to handle ID mapping for deduplication
    path_to_id: FxHashMap<PathBuf, AssetId>,
}

impl<T> Assets<T> {
    /// Create a new empty asset storage
    #[must_use]
    pub fn new() -> Self {
        Self {
            assets: FxHashMap::default(),
            path_to_id: FxHashMap::default(),
        }
    }

    /// Add an asset and return a handle to it
    pub fn add(&mut self, asset: T) -> AssetHandle<T> {
        let handle = AssetHandle::new(asset);
        self.assets.insert(
            handle.id(),
            AssetEntry {
                handle: handle.clone(),
                path: None,
            },
        );
        handle
    }

    /// Return the asset already loaded from `path`, or load it with `load`
    pub fn get_or_load(
        &mut self,
        path: impl AsRef<Path>,
        load: impl FnOnce(&Path) -> T,
    ) -> AssetHandle<T> {
        let path = path.as_ref();
        if let Some(handle) = self.get_by_path(path) {
            return handle;
        }

        let handle = AssetHandle::new(load(path));
        self.path_to_id.insert(path.to_path_buf(), handle.id());
        self.assets.insert(
            handle.id(),
            AssetEntry {
                handle: handle.clone(),
                path: Some(path.to_path_buf()),
            },
        );
        handle
    }

    #[must_use]
    pub fn get(&self, id: AssetId) -> Option<AssetHandle<T>> {
        self.assets.get(&id).map(|entry| entry.handle.clone())
    }

    #[must_use]
    pub fn get_by_path(&self, path: impl AsRef<Path>) -> Option<AssetHandle<T>> {
        self.path_to_id
            .get(path.as_ref())
            .and_then(|&id| self.get(id))
    }

    /// Remove an asset by ID
    ///
    /// Returns true if the asset was removed
    pub fn remove(&mut self, id: AssetId) -> bool {
        if let Some(entry) = self.assets.remove(&id) {
            if let Some(path) = entry.path {
                self.path_to_id.remove(&path);
            }
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn clear(&mut self) {
        self.assets.clear();
        self.path_to_id.clear();
    }
}

impl<T> Default for Assets<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut assets = Assets::<String>::new();
        let handle = assets.add("hello".to_string());

        let retrieved = assets.get(handle.id()).unwrap();
        assert_eq!(*retrieved.get(), "hello");
    }

    #[test]
    fn test_path_deduplication() {
        let mut assets = Assets::<i32>::new();
        let first = assets.get_or_load("models/tree.obj", |_| 42);
        let second = assets.get_or_load("models/tree.obj", |_| 100);

        assert_eq!(first.id(), second.id());
        assert_eq!(*second.get(), 42);
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn test_remove_forgets_path() {
        let mut assets = Assets::<i32>::new();
        let handle = assets.get_or_load("a.png", |_| 1);

        assert!(assets.remove(handle.id()));
        assert!(!assets.remove(handle.id()));
        assert!(assets.get_by_path("a.png").is_none());
        assert!(assets.is_empty());
    }
}
