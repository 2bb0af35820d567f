//! Asset handle implementation
//!
//! Handles are cheap, reference-counted references to loaded assets.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique asset IDs
static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a loaded asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(u64);

impl AssetId {
    fn next() -> Self {
        Self(NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset#{}", self.0)
    }
}

/// A strong handle to an asset of type `T`.
///
/// The asset stays alive while any handle exists, even after the cache
/// entry it came from is overwritten or unloaded.
#[derive(Debug)]
pub struct AssetHandle<T> {
    id: AssetId,
    inner: Arc<T>,
}

impl<T> AssetHandle<T> {
    /// Wrap a freshly loaded asset under a new ID
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            id: AssetId::next(),
            inner: Arc::new(value),
        }
    }

    #[must_use]
    pub const fn id(&self) -> AssetId {
        self.id
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Number of live handles to this asset
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> std::ops::Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = AssetHandle::new(1_u8);
        let b = AssetHandle::new(1_u8);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_clone_shares_asset() {
        let handle = AssetHandle::new("mesh".to_string());
        let copy = handle.clone();
        assert_eq!(handle, copy);
        assert_eq!(copy.strong_count(), 2);
        assert_eq!(copy.len(), 4);
    }
}
