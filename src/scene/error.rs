//! Errors raised by scene bookkeeping and persistence

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::factory::EntityHandle;

/// Errors that can occur during scene operations
#[derive(Debug, Error)]
pub enum SceneError {
    /// An operation referenced a scene name that was never created
    #[error("unknown scene `{0}`")]
    UnknownScene(String),
    /// A scene with this name already exists
    #[error("scene `{0}` already exists")]
    DuplicateScene(String),
    /// The operation needs a current scene but none is loaded
    #[error("no scene is currently loaded")]
    NoCurrentScene,
    /// Scene data could not be parsed
    #[error("malformed scene data: {0}")]
    Parse(String),
    /// Scene data could not be encoded
    #[error("failed to encode scene data: {0}")]
    Serialize(String),
    /// A scene file could not be read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A record names a kind the factory cannot build
    #[error("unknown entity kind `{0}`")]
    UnknownEntityKind(String),
    /// The handle does not refer to a live entity
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityHandle),
    /// A position, rotation or scale contained NaN or an infinity
    #[error("entity {0} was given a non-finite transform")]
    NonFiniteTransform(EntityHandle),
    /// Parenting would make an entity its own ancestor
    #[error("parenting {child} under {parent} would create a cycle")]
    ParentCycle {
        child: EntityHandle,
        parent: EntityHandle,
    },
}

impl SceneError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
