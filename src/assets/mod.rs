//! Asset and resource management
//!
//! Provides handle-based resource management with:
//! - Reference-counted asset handles
//! - Per-type storage with path deduplication
//! - A named cache for models, textures and animations

mod cache;
mod handle;
mod storage;

pub use cache::{Animation, Model, ResourceCache, Texture};
pub use handle::{AssetHandle, AssetId};
pub use storage::Assets;
