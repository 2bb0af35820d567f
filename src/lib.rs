//! Scene persistence and entity management for 3D engines
//!
//! This crate provides:
//! - Named scenes with JSON save/load and faithful entity reconstruction
//! - Entity Component System (ECS) world built on hecs
//! - Named resource caching for models, textures and animations
//! - Validated lighting presets
//! - Simple follow/patrol AI agents
//! - Audio bookkeeping over a pluggable backend

pub mod ai;
pub mod assets;
pub mod audio;
pub mod core;
pub mod ecs;
pub mod lighting;
pub mod scene;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{AiConfig, AiSystem, Behavior};
    pub use crate::assets::{AssetHandle, ResourceCache};
    pub use crate::audio::{AudioSystem, NullBackend};
    pub use crate::core::{Color, Engine, EngineConfig};
    pub use crate::ecs::{Transform, World};
    pub use crate::lighting::{Light, LightSystem, ShadowSettings};
    pub use crate::scene::{
        EntityDesc, EntityFactory, EntityHandle, EntityKind, SceneCodec, SceneError, SceneManager,
    };
    pub use glam::DVec3;
}
