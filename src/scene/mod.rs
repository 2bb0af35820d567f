//! Scene persistence and entity-state reconstruction
//!
//! Named scenes are tracked by [`EntityRegistry`], converted to and from
//! [`EntityRecord`]s by [`SceneCodec`], and orchestrated by [`SceneManager`].
//! The engine itself is reached only through [`EntityFactory`].

mod codec;
mod error;
mod factory;
mod kind;
mod manager;
mod record;
mod registry;

pub use codec::SceneCodec;
pub use error::SceneError;
pub use factory::{EntityDesc, EntityFactory, EntityHandle, EntitySnapshot};
pub use kind::EntityKind;
pub use manager::SceneManager;
pub use record::EntityRecord;
pub use registry::{EntityRegistry, Scene};
