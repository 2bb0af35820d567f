//! Named scenes and the current-scene pointer

use log::{info, warn};
use rustc_hash::FxHashMap;

use super::error::SceneError;
use super::factory::{EntityFactory, EntityHandle};
use super::record::EntityRecord;

/// A named, ordered collection of entities
#[derive(Debug, Clone)]
pub struct Scene {
    name: String,
    entities: Vec<EntityHandle>,
    /// Records of entities destroyed when the scene was unloaded
    stash: Option<Vec<EntityRecord>>,
}

impl Scene {
    fn new(name: String) -> Self {
        Self {
            name,
            entities: Vec::new(),
            stash: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Live entities, in insertion order
    #[must_use]
    pub fn entities(&self) -> &[EntityHandle] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether the scene holds stashed records waiting to be rebuilt
    #[must_use]
    pub fn is_stashed(&self) -> bool {
        self.stash.is_some()
    }

    /// Stashed records, if any
    #[must_use]
    pub fn stash(&self) -> Option<&[EntityRecord]> {
        self.stash.as_deref()
    }
}

/// Owns the named scenes and tracks which one is current.
///
/// The active entity list is always the current scene's entity list, or
/// empty when no scene is current.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    scenes: FxHashMap<String, Scene>,
    current: Option<String>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty scene and make it current.
    ///
    /// Entities of the previously current scene stay alive and keep
    /// belonging to that scene.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateScene`] if the name is taken
    pub fn create_scene(&mut self, name: impl Into<String>) -> Result<&Scene, SceneError> {
        let name = name.into();
        if self.scenes.contains_key(&name) {
            return Err(SceneError::DuplicateScene(name));
        }

        info!("Created scene `{name}`");
        self.current = Some(name.clone());
        Ok(&*self
            .scenes
            .entry(name.clone())
            .or_insert_with(|| Scene::new(name)))
    }

    /// Append an entity to a scene. Adding an entity twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if the scene does not exist
    pub fn add_to_scene(&mut self, name: &str, entity: EntityHandle) -> Result<(), SceneError> {
        let scene = self.scene_mut(name)?;
        if !scene.entities.contains(&entity) {
            scene.entities.push(entity);
        }
        Ok(())
    }

    /// Make `name` the current scene.
    ///
    /// Every active entity is destroyed through `factory` and dropped from
    /// every scene that held it. Entities already in the target scene become
    /// the active list.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] and leaves the registry unchanged
    /// if the scene does not exist
    pub fn load_scene<F: EntityFactory + ?Sized>(
        &mut self,
        name: &str,
        factory: &mut F,
    ) -> Result<(), SceneError> {
        if !self.scenes.contains_key(name) {
            return Err(SceneError::UnknownScene(name.to_string()));
        }

        if let Some(current) = self.current.take()
            && let Some(scene) = self.scenes.get_mut(&current)
        {
            let unloaded = std::mem::take(&mut scene.entities);
            for handle in unloaded {
                if let Err(err) = factory.destroy(handle) {
                    warn!("Failed to destroy {handle} while unloading `{current}`: {err}");
                }
                self.remove_entity(handle);
            }
        }

        info!("Loaded scene `{name}`");
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Name of the current scene
    #[must_use]
    pub fn current_scene(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Entities of the current scene
    #[must_use]
    pub fn active_entities(&self) -> &[EntityHandle] {
        self.current
            .as_ref()
            .and_then(|name| self.scenes.get(name))
            .map(Scene::entities)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    #[must_use]
    pub fn contains_scene(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// All scene names, sorted
    #[must_use]
    pub fn scene_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scenes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Drop a handle from every scene. Returns whether any scene held it.
    pub fn remove_entity(&mut self, entity: EntityHandle) -> bool {
        let mut removed = false;
        for scene in self.scenes.values_mut() {
            let before = scene.entities.len();
            scene.entities.retain(|&e| e != entity);
            removed |= scene.entities.len() != before;
        }
        removed
    }

    /// Insert entities at the front of a scene, keeping their order
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if the scene does not exist
    pub fn prepend_entities(
        &mut self,
        name: &str,
        entities: Vec<EntityHandle>,
    ) -> Result<(), SceneError> {
        let scene = self.scene_mut(name)?;
        let existing = std::mem::replace(&mut scene.entities, entities);
        for handle in existing {
            if !scene.entities.contains(&handle) {
                scene.entities.push(handle);
            }
        }
        Ok(())
    }

    /// Replace a scene's entity list, returning the previous one
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if the scene does not exist
    pub fn replace_entities(
        &mut self,
        name: &str,
        entities: Vec<EntityHandle>,
    ) -> Result<Vec<EntityHandle>, SceneError> {
        let scene = self.scene_mut(name)?;
        Ok(std::mem::replace(&mut scene.entities, entities))
    }

    /// Store records to rebuild the scene from later
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if the scene does not exist
    pub fn stash(&mut self, name: &str, records: Vec<EntityRecord>) -> Result<(), SceneError> {
        self.scene_mut(name)?.stash = Some(records);
        Ok(())
    }

    /// Take the stashed records of a scene
    pub fn take_stash(&mut self, name: &str) -> Option<Vec<EntityRecord>> {
        self.scenes.get_mut(name).and_then(|scene| scene.stash.take())
    }

    fn scene_mut(&mut self, name: &str) -> Result<&mut Scene, SceneError> {
        self.scenes
            .get_mut(name)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))
    }
}
