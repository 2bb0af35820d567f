//! The engine boundary used to build, mutate, inspect and destroy entities

use std::fmt;

use glam::DVec3;
use log::warn;

use crate::core::Color;

use super::error::SceneError;
use super::kind::EntityKind;
use super::record::EntityRecord;

/// Opaque reference to an engine-owned entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(u64);

impl EntityHandle {
    /// Wrap a raw engine identifier
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw engine identifier
    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point-in-time copy of an entity's persistable state
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub kind: EntityKind,
    /// Explicit name, if one was assigned
    pub name: Option<String>,
    pub position: DVec3,
    /// Euler angles in degrees
    pub rotation: DVec3,
    pub scale: DVec3,
    pub color: Color,
    pub texture: Option<String>,
    pub parent: Option<EntityHandle>,
    pub has_physics: bool,
}

impl EntitySnapshot {
    /// The name this entity answers to when resolving parent links
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind.model_name())
    }
}

/// Capabilities the scene layer needs from the underlying engine.
///
/// Every operation on a handle that no longer refers to a live entity fails
/// with [`SceneError::UnknownEntity`].
pub trait EntityFactory {
    /// Create an entity of the given kind with default state
    fn create(&mut self, kind: &EntityKind) -> Result<EntityHandle, SceneError>;

    /// Set position and scale. Non-finite values are rejected with
    /// [`SceneError::NonFiniteTransform`].
    fn set_transform(
        &mut self,
        entity: EntityHandle,
        position: DVec3,
        scale: DVec3,
    ) -> Result<(), SceneError>;

    /// Set rotation as euler angles in degrees
    fn set_rotation(&mut self, entity: EntityHandle, rotation: DVec3) -> Result<(), SceneError>;

    fn set_color(&mut self, entity: EntityHandle, color: Color) -> Result<(), SceneError>;

    fn set_texture(&mut self, entity: EntityHandle, texture: &str) -> Result<(), SceneError>;

    fn set_name(&mut self, entity: EntityHandle, name: &str) -> Result<(), SceneError>;

    /// Link `entity` under `parent`, or unlink it with `None`
    fn set_parent(
        &mut self,
        entity: EntityHandle,
        parent: Option<EntityHandle>,
    ) -> Result<(), SceneError>;

    /// Attach a rigid body. Attaching twice is a no-op.
    fn attach_physics(&mut self, entity: EntityHandle) -> Result<(), SceneError>;

    /// Detach the rigid body. Detaching an entity without one is a no-op.
    fn detach_physics(&mut self, entity: EntityHandle) -> Result<(), SceneError>;

    fn position(&self, entity: EntityHandle) -> Result<DVec3, SceneError>;

    fn set_position(&mut self, entity: EntityHandle, position: DVec3) -> Result<(), SceneError>;

    fn snapshot(&self, entity: EntityHandle) -> Result<EntitySnapshot, SceneError>;

    /// Destroy the entity and release its engine-side resources
    fn destroy(&mut self, entity: EntityHandle) -> Result<(), SceneError>;

    fn contains(&self, entity: EntityHandle) -> bool;
}

/// Description of an entity to build through an [`EntityFactory`]
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDesc {
    pub kind: EntityKind,
    pub name: Option<String>,
    pub position: DVec3,
    /// Euler angles in degrees
    pub rotation: DVec3,
    pub scale: DVec3,
    pub color: Color,
    pub texture: Option<String>,
    pub physics: bool,
}

impl EntityDesc {
    /// Describe an entity of the given kind at the origin
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            name: None,
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
            color: Color::WHITE,
            texture: None,
            physics: false,
        }
    }

    /// Describe a generic mesh entity
    #[must_use]
    pub fn model(model: impl Into<String>) -> Self {
        Self::new(EntityKind::generic(model))
    }

    /// Build the description a scene record persists.
    ///
    /// A texture stored as the literal string `"None"` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the record's model names no known kind
    pub fn from_record(record: &EntityRecord) -> Result<Self, SceneError> {
        Ok(Self {
            kind: EntityKind::from_model_name(&record.model)?,
            name: record.name.clone(),
            position: record.position,
            rotation: DVec3::ZERO,
            scale: record.scale,
            color: record.color,
            texture: record.texture.clone().filter(|t| t != "None"),
            physics: record.has_physics,
        })
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn at(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub const fn rotated(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub const fn scaled(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub const fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn textured(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }

    #[must_use]
    pub const fn with_physics(mut self) -> Self {
        self.physics = true;
        self
    }

    /// Create the entity and apply every described property.
    ///
    /// If applying a property fails the half-built entity is destroyed.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the factory
    pub fn spawn<F: EntityFactory + ?Sized>(
        &self,
        factory: &mut F,
    ) -> Result<EntityHandle, SceneError> {
        let handle = factory.create(&self.kind)?;
        if let Err(err) = self.apply(handle, factory) {
            if let Err(cleanup) = factory.destroy(handle) {
                warn!("Failed to destroy half-built entity {handle}: {cleanup}");
            }
            return Err(err);
        }
        Ok(handle)
    }

    fn apply<F: EntityFactory + ?Sized>(
        &self,
        handle: EntityHandle,
        factory: &mut F,
    ) -> Result<(), SceneError> {
        factory.set_transform(handle, self.position, self.scale)?;
        if self.rotation != DVec3::ZERO {
            factory.set_rotation(handle, self.rotation)?;
        }
        factory.set_color(handle, self.color)?;
        if let Some(texture) = &self.texture {
            factory.set_texture(handle, texture)?;
        }
        if let Some(name) = &self.name {
            factory.set_name(handle, name)?;
        }
        if self.physics {
            factory.attach_physics(handle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;

    #[test]
    fn test_spawn_applies_description() {
        let mut world = World::new();
        let handle = EntityDesc::model("crate")
            .named("supplies")
            .at(DVec3::new(1.0, 0.0, 4.0))
            .textured("wood")
            .with_physics()
            .spawn(&mut world)
            .unwrap();

        let snapshot = world.snapshot(handle).unwrap();
        assert_eq!(snapshot.display_name(), "supplies");
        assert_eq!(snapshot.position, DVec3::new(1.0, 0.0, 4.0));
        assert_eq!(snapshot.texture.as_deref(), Some("wood"));
        assert!(snapshot.has_physics);
    }

    #[test]
    fn test_non_finite_spawn_is_rolled_back() {
        let mut world = World::new();
        let result = EntityDesc::model("cube")
            .scaled(DVec3::splat(f64::INFINITY))
            .spawn(&mut world);

        assert!(matches!(result, Err(SceneError::NonFiniteTransform(_))));
        assert!(world.is_empty());
    }
}
