//! Engine context tying scenes, resources and systems together

use std::fs;
use std::path::{Path, PathBuf};

use glam::DVec3;

use crate::ai::AiSystem;
use crate::assets::ResourceCache;
use crate::audio::{AudioBackend, AudioSystem};
use crate::core::{Color, EngineConfig, FrameStats};
use crate::ecs::World;
use crate::lighting::{Light, LightError, LightId, LightSystem};
use crate::scene::{EntityDesc, EntityHandle, EntityKind, SceneCodec, SceneError, SceneManager};

/// Extension used for scene files in the scene directory
pub const SCENE_FILE_EXTENSION: &str = "json";

/// Main engine context
///
/// Owns every subsystem; there is no global instance. Systems are public so
/// callers can reach past the convenience methods when they need to.
pub struct Engine {
    config: EngineConfig,
    /// Scenes and the entity world
    pub scenes: SceneManager<World>,
    /// Named models, textures and animations
    pub resources: ResourceCache,
    pub lights: LightSystem,
    pub ai: AiSystem,
    pub audio: AudioSystem,
    stats: FrameStats,
}

impl Engine {
    /// Create an engine with a headless audio backend
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        log::info!("Starting engine: {}", config.title);

        let codec = SceneCodec::new().with_pretty(config.pretty_scene_files);
        Self {
            scenes: SceneManager::new(World::new()).with_codec(codec),
            resources: ResourceCache::new(),
            lights: LightSystem::new(config.lights.clone()),
            ai: AiSystem::new(config.ai.clone()),
            audio: AudioSystem::default(),
            stats: FrameStats::new(config.stats_samples),
            config,
        }
    }

    /// Play audio through a different backend
    #[must_use]
    pub fn with_audio_backend(mut self, backend: Box<dyn AudioBackend>) -> Self {
        self.audio = AudioSystem::new(backend);
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    #[must_use]
    pub fn world(&self) -> &World {
        self.scenes.factory()
    }

    /// Create an empty scene and make it current
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateScene`] if the name is taken
    pub fn create_scene(&mut self, name: impl Into<String>) -> Result<(), SceneError> {
        self.scenes.create_scene(name)
    }

    /// Build an entity and add it to the current scene
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoCurrentScene`] if no scene is loaded, or an
    /// error if the entity cannot be built
    pub fn create_entity(&mut self, desc: &EntityDesc) -> Result<EntityHandle, SceneError> {
        self.scenes.spawn(desc)
    }

    /// Point light entity in the current scene
    ///
    /// # Errors
    ///
    /// See [`Engine::create_entity`]
    pub fn create_light_entity(
        &mut self,
        position: DVec3,
        color: Color,
    ) -> Result<EntityHandle, SceneError> {
        let desc = EntityDesc::new(EntityKind::PointLight)
            .at(position)
            .colored(color);
        self.scenes.spawn(&desc)
    }

    /// Camera entity in the current scene
    ///
    /// # Errors
    ///
    /// See [`Engine::create_entity`]
    pub fn create_camera(
        &mut self,
        position: DVec3,
        rotation: DVec3,
    ) -> Result<EntityHandle, SceneError> {
        let desc = EntityDesc::new(EntityKind::Camera)
            .at(position)
            .rotated(rotation);
        self.scenes.spawn(&desc)
    }

    /// First-person controller entity in the current scene
    ///
    /// # Errors
    ///
    /// See [`Engine::create_entity`]
    pub fn create_fps_controller(&mut self, position: DVec3) -> Result<EntityHandle, SceneError> {
        let desc = EntityDesc::new(EntityKind::FirstPersonController).at(position);
        self.scenes.spawn(&desc)
    }

    /// Validate and add a light preset
    ///
    /// # Errors
    ///
    /// Returns an error if the light configuration is out of range
    pub fn create_light(&mut self, light: impl Into<Light>) -> Result<LightId, LightError> {
        self.lights.create(light)
    }

    /// Attach a rigid body marker to an entity
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if the entity does not exist
    pub fn add_physics(&mut self, entity: EntityHandle) -> Result<(), SceneError> {
        self.scenes.add_physics(entity)
    }

    /// Remove the rigid body marker from an entity
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntity`] if the entity does not exist
    pub fn remove_physics(&mut self, entity: EntityHandle) -> Result<(), SceneError> {
        self.scenes.remove_physics(entity)
    }

    /// Parent `child` to `parent`, or detach it with `None`
    ///
    /// # Errors
    ///
    /// Returns an error if either entity is unknown or the link would form
    /// a cycle
    pub fn set_parent(
        &mut self,
        child: EntityHandle,
        parent: Option<EntityHandle>,
    ) -> Result<(), SceneError> {
        self.scenes.set_parent(child, parent)
    }

    /// Add an existing entity to a named scene
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if the scene does not exist
    pub fn add_to_scene(&mut self, scene: &str, entity: EntityHandle) -> Result<(), SceneError> {
        self.scenes.add_to_scene(scene, entity)
    }

    /// Make another scene current
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownScene`] if the scene does not exist
    pub fn load_scene(&mut self, name: &str) -> Result<(), SceneError> {
        self.scenes.switch_scene(name)
    }

    /// File a scene is saved to in the scene directory
    #[must_use]
    pub fn scene_path(&self, name: &str) -> PathBuf {
        self.config
            .scene_dir
            .join(format!("{name}.{SCENE_FILE_EXTENSION}"))
    }

    /// Save a scene into the scene directory, returning the file written
    ///
    /// # Errors
    ///
    /// Returns an error if the scene does not exist or the file cannot be
    /// written
    pub fn save_scene(&self, name: &str) -> Result<PathBuf, SceneError> {
        let dir = &self.config.scene_dir;
        fs::create_dir_all(dir).map_err(|source| SceneError::io(dir, source))?;

        let path = self.scene_path(name);
        self.scenes.save_scene(name, &path)?;
        Ok(path)
    }

    /// Save the current scene to an explicit path
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoCurrentScene`] if no scene is loaded, or an
    /// error if the file cannot be written
    pub fn save_scene_to_file(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        self.scenes.save_current(path)
    }

    /// Replace the current scene's entities with a scene file
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NoCurrentScene`] if no scene is loaded, or an
    /// error if the file cannot be read or built
    pub fn load_scene_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<EntityHandle>, SceneError> {
        self.scenes.load_into_current(path)
    }

    /// Advance one frame
    pub fn update(&mut self, delta_seconds: f64) {
        self.stats.record_frame(delta_seconds);
        self.ai.update(delta_seconds, self.scenes.factory_mut());
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Behavior;
    use crate::lighting::LightType;
    use crate::scene::EntityFactory;

    fn engine_in(dir: &tempfile::TempDir) -> Engine {
        Engine::new(EngineConfig::default().with_scene_dir(dir.path().join("scenes")))
    }

    #[test]
    fn test_entities_need_a_scene() {
        let mut engine = Engine::default();
        let result = engine.create_entity(&EntityDesc::model("cube"));
        assert!(matches!(result, Err(SceneError::NoCurrentScene)));
    }

    #[test]
    fn test_special_entities() {
        let mut engine = Engine::default();
        engine.create_scene("main").unwrap();

        let light = engine
            .create_light_entity(DVec3::new(2.0, 3.0, 2.0), Color::WHITE)
            .unwrap();
        let camera = engine
            .create_camera(DVec3::new(0.0, 5.0, -10.0), DVec3::new(20.0, 0.0, 0.0))
            .unwrap();
        let player = engine.create_fps_controller(DVec3::Y).unwrap();

        let world = engine.world();
        assert_eq!(world.snapshot(light).unwrap().kind, EntityKind::PointLight);
        let camera = world.snapshot(camera).unwrap();
        assert_eq!(camera.kind, EntityKind::Camera);
        assert_eq!(camera.rotation, DVec3::new(20.0, 0.0, 0.0));
        assert_eq!(world.position(player).unwrap(), DVec3::Y);
        assert_eq!(engine.scenes.active_entities().len(), 3);
    }

    #[test]
    fn test_light_presets() {
        let mut engine = Engine::default();
        let sun = engine
            .lights
            .directional(DVec3::new(45.0, -45.0, 0.0), Color::WHITE);
        engine.create_light(sun).unwrap();

        let bad = engine.lights.point(DVec3::ZERO, Color::WHITE).with_radius(0.0);
        assert!(engine.create_light(bad).is_err());
        assert_eq!(engine.lights.count(LightType::Directional), 1);
        assert_eq!(engine.lights.len(), 1);
    }

    #[test]
    fn test_save_and_load_scene_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_in(&dir);
        engine.create_scene("main").unwrap();
        let cube = engine
            .create_entity(&EntityDesc::model("cube").at(DVec3::new(0.0, 3.0, 0.0)))
            .unwrap();
        engine.add_physics(cube).unwrap();

        let path = engine.save_scene("main").unwrap();
        assert_eq!(path, dir.path().join("scenes").join("main.json"));
        assert!(path.is_file());

        let handles = engine.load_scene_file(&path).unwrap();
        assert_eq!(handles.len(), 1);
        assert!(!engine.world().contains(cube));
        assert!(engine.world().has_physics(handles[0]).unwrap());
        assert_eq!(engine.world().len(), 1);
    }

    #[test]
    fn test_save_to_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_in(&dir);
        let path = dir.path().join("level.json");
        assert!(matches!(
            engine.save_scene_to_file(&path),
            Err(SceneError::NoCurrentScene)
        ));

        engine.create_scene("main").unwrap();
        engine.create_entity(&EntityDesc::model("cube")).unwrap();
        engine.save_scene_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#""model":"cube""#));
    }

    #[test]
    fn test_switch_scenes() {
        let mut engine = Engine::default();
        engine.create_scene("menu").unwrap();
        engine.create_entity(&EntityDesc::model("button")).unwrap();
        engine.create_scene("level").unwrap();

        engine.load_scene("menu").unwrap();
        assert_eq!(engine.scenes.current_scene(), Some("menu"));
        assert_eq!(engine.scenes.active_entities().len(), 1);
        assert!(matches!(
            engine.load_scene("missing"),
            Err(SceneError::UnknownScene(_))
        ));
    }

    #[test]
    fn test_update_runs_ai() {
        let mut engine = Engine::default();
        engine.create_scene("main").unwrap();
        let enemy = engine.create_entity(&EntityDesc::model("cube")).unwrap();
        let player = engine
            .create_fps_controller(DVec3::new(0.0, 0.0, 10.0))
            .unwrap();

        let agent = engine.ai.create_agent(enemy, Behavior::Follow);
        engine.ai.set_target(agent, Some(player));

        engine.update(1.0);
        engine.update(1.0);
        assert_eq!(engine.world().position(enemy).unwrap(), DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(engine.stats().total_frames(), 2);
    }
}
