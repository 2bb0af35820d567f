//! Scene orchestration: create, switch, save and load named scenes

use std::path::Path;

use log::{info, warn};

use super::codec::SceneCodec;
use super::error::SceneError;
use super::factory::{EntityDesc, EntityFactory, EntityHandle};
use super::record::EntityRecord;
use super::registry::EntityRegistry;

/// Owns the entity factory and drives the registry and codec with it
pub struct SceneManager<F: EntityFactory> {
    registry: EntityRegistry,
    codec: SceneCodec,
    factory: F,
}

impl<F: EntityFactory> SceneManager<F> {
    /// Create a manager with no scenes
    pub fn new(factory: F) -> Self {
        Self {
            registry: EntityRegistry::new(),
            codec: SceneCodec::new(),
            factory,
        }
    }

    /// Use a specific codec for file operations
    #[must_use]
    pub fn with_codec(mut self, codec: SceneCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn codec(&self) -> &SceneCodec {
        &self.codec
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Name of the current scene
    pub fn current_scene(&self) -> Option<&str> {
        self.registry.current_scene()
    }

    /// Entities of the current scene
    pub fn active_entities(&self) -> &[EntityHandle] {
        self.registry.active_entities()
    }

    /// Register an empty scene and make it current
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateScene`] if the name is taken
    pub fn create_scene(&mut self, name: impl Into<String>) -> Result<(), SceneError> {
        self.registry.create_scene(name).map(|_| ())
    }

    /// Append an existing entity to a scene
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if the scene does not exist
    pub fn add_to_scene(&mut self, name: &str, entity: EntityHandle) -> Result<(), SceneError> {
        self.registry.add_to_scene(name, entity)
    }

    /// Build an entity and add it to the current scene
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoCurrentScene`] if no scene is loaded, or the
    /// factory's error if the entity cannot be built
    pub fn spawn(&mut self, desc: &EntityDesc) -> Result<EntityHandle, SceneError> {
        let current = self
            .registry
            .current_scene()
            .ok_or(SceneError::NoCurrentScene)?
            .to_string();
        let handle = desc.spawn(&mut self.factory)?;
        self.registry.add_to_scene(&current, handle)?;
        Ok(handle)
    }

    /// Destroy an entity and remove it from every scene
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if the handle is stale
    pub fn despawn(&mut self, entity: EntityHandle) -> Result<(), SceneError> {
        self.factory.destroy(entity)?;
        self.registry.remove_entity(entity);
        Ok(())
    }

    /// Link `child` under `parent`, or unlink it with `None`
    ///
    /// # Errors
    ///
    /// Returns an error if a handle is stale or the link would form a cycle
    pub fn set_parent(
        &mut self,
        child: EntityHandle,
        parent: Option<EntityHandle>,
    ) -> Result<(), SceneError> {
        self.factory.set_parent(child, parent)
    }

    /// Attach a rigid body; attaching twice is a no-op
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if the handle is stale
    pub fn add_physics(&mut self, entity: EntityHandle) -> Result<(), SceneError> {
        self.factory.attach_physics(entity)
    }

    /// Detach the rigid body, if any
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if the handle is stale
    pub fn remove_physics(&mut self, entity: EntityHandle) -> Result<(), SceneError> {
        self.factory.detach_physics(entity)
    }

    /// Switch to another scene, preserving the outgoing one.
    ///
    /// The outgoing scene is captured as records before its entities are
    /// destroyed; switching back rebuilds it from those records. Switching to
    /// the current scene rebuilds it in place.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if the target does not exist, or
    /// an error if capturing or rebuilding entities fails
    pub fn switch_scene(&mut self, name: &str) -> Result<(), SceneError> {
        if !self.registry.contains_scene(name) {
            return Err(SceneError::UnknownScene(name.to_string()));
        }

        if let Some(current) = self.registry.current_scene().map(str::to_string) {
            let live = self
                .codec
                .serialize(self.registry.active_entities(), &self.factory)?;
            let mut records = self.registry.take_stash(&current).unwrap_or_default();
            records.extend(live);
            self.registry.stash(&current, records)?;
        }

        self.registry.load_scene(name, &mut self.factory)?;

        if let Some(records) = self.registry.take_stash(name) {
            match self.codec.deserialize(&records, &mut self.factory) {
                Ok(handles) => self.registry.prepend_entities(name, handles)?,
                Err(err) => {
                    self.registry.stash(name, records)?;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Records for every entity of a scene, stashed or live
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if the scene does not exist
    pub fn scene_records(&self, name: &str) -> Result<Vec<EntityRecord>, SceneError> {
        let scene = self
            .registry
            .scene(name)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))?;
        let mut records = scene.stash().map(<[_]>::to_vec).unwrap_or_default();
        records.extend(self.codec.serialize(scene.entities(), &self.factory)?);
        Ok(records)
    }

    /// Write a scene to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the scene does not exist or the file cannot be
    /// written
    pub fn save_scene(&self, name: &str, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let records = self.scene_records(name)?;
        self.codec.write_records(&records, path)
    }

    /// Write the current scene to a file
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoCurrentScene`] if no scene is loaded, or an
    /// error if the file cannot be written
    pub fn save_current(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let current = self
            .registry
            .current_scene()
            .ok_or(SceneError::NoCurrentScene)?;
        self.save_scene(current, path)
    }

    /// Replace the current scene's entities with those stored in a file.
    ///
    /// The file is read and its entities are built before anything is
    /// destroyed, so a bad file leaves the scene untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoCurrentScene`] if no scene is loaded, or an
    /// error if the file cannot be read or its records cannot be built
    pub fn load_into_current(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<EntityHandle>, SceneError> {
        let current = self
            .registry
            .current_scene()
            .ok_or(SceneError::NoCurrentScene)?
            .to_string();

        let records = self.codec.read(path)?;
        let handles = self.codec.deserialize(&records, &mut self.factory)?;

        let previous = self.registry.replace_entities(&current, handles.clone())?;
        for handle in previous {
            if let Err(err) = self.factory.destroy(handle) {
                warn!("Failed to destroy {handle} while replacing `{current}`: {err}");
            }
            self.registry.remove_entity(handle);
        }
        self.registry.take_stash(&current);

        info!("Replaced `{current}` with {} loaded entities", handles.len());
        Ok(handles)
    }
}
