//! World wrapper around hecs
//!
//! The world is the in-process entity store behind [`EntityFactory`].

use glam::DVec3;
use hecs::Entity;
use log::debug;

use crate::core::Color;
use crate::scene::{EntityFactory, EntityHandle, EntityKind, EntitySnapshot, SceneError};

use super::components::{Name, RigidBody, Texture, Transform};
use super::hierarchy::{Children, Parent};

/// Game world containing all entities and components
pub struct World {
    /// The underlying hecs world
    inner: hecs::World,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Get the number of entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Clear all entities from the world
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Handles of every live entity, in no particular order
    pub fn handles(&self) -> Vec<EntityHandle> {
        self.inner
            .iter()
            .map(|entity_ref| Self::handle(entity_ref.entity()))
            .collect()
    }

    /// Parent of an entity, if linked
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale
    pub fn parent(&self, handle: EntityHandle) -> Result<Option<EntityHandle>, SceneError> {
        let entity = self.resolve(handle)?;
        Ok(self
            .inner
            .get::<&Parent>(entity)
            .ok()
            .map(|parent| Self::handle(parent.entity())))
    }

    /// Children of an entity, in link order
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale
    pub fn children(&self, handle: EntityHandle) -> Result<Vec<EntityHandle>, SceneError> {
        let entity = self.resolve(handle)?;
        Ok(self
            .inner
            .get::<&Children>(entity)
            .map(|children| {
                children
                    .as_slice()
                    .iter()
                    .map(|&child| Self::handle(child))
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Whether the entity has a rigid body attached
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale
    pub fn has_physics(&self, handle: EntityHandle) -> Result<bool, SceneError> {
        let entity = self.resolve(handle)?;
        self.inner
            .entity(entity)
            .map(|entity_ref| entity_ref.has::<RigidBody>())
            .map_err(|_| SceneError::UnknownEntity(handle))
    }

    fn handle(entity: Entity) -> EntityHandle {
        EntityHandle::from_raw(entity.to_bits().get())
    }

    fn resolve(&self, handle: EntityHandle) -> Result<Entity, SceneError> {
        Entity::from_bits(handle.to_raw())
            .filter(|&entity| self.inner.contains(entity))
            .ok_or(SceneError::UnknownEntity(handle))
    }

    fn insert<C: hecs::Component>(
        &mut self,
        handle: EntityHandle,
        component: C,
    ) -> Result<(), SceneError> {
        let entity = self.resolve(handle)?;
        self.inner
            .insert_one(entity, component)
            .map_err(|_| SceneError::UnknownEntity(handle))
    }

    fn with_transform(
        &mut self,
        handle: EntityHandle,
        values: &[DVec3],
        update: impl FnOnce(&mut Transform),
    ) -> Result<(), SceneError> {
        let entity = self.resolve(handle)?;
        if !values.iter().all(|value| value.is_finite()) {
            return Err(SceneError::NonFiniteTransform(handle));
        }
        let mut transform = self
            .inner
            .get::<&mut Transform>(entity)
            .map_err(|_| SceneError::UnknownEntity(handle))?;
        update(&mut *transform);
        Ok(())
    }

    fn detach_from_parent(&mut self, entity: Entity) {
        if let Ok(Parent(old)) = self.inner.remove_one::<Parent>(entity)
            && let Ok(mut children) = self.inner.get::<&mut Children>(old)
        {
            children.unlink(entity);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityFactory for World {
    fn create(&mut self, kind: &EntityKind) -> Result<EntityHandle, SceneError> {
        if let EntityKind::Generic { model } = kind
            && model.trim().is_empty()
        {
            return Err(SceneError::UnknownEntityKind(model.clone()));
        }

        let entity = self
            .inner
            .spawn((kind.clone(), Transform::default(), Color::WHITE));
        let handle = Self::handle(entity);
        debug!("Created {} entity {handle}", kind.model_name());
        Ok(handle)
    }

    fn set_transform(
        &mut self,
        entity: EntityHandle,
        position: DVec3,
        scale: DVec3,
    ) -> Result<(), SceneError> {
        self.with_transform(entity, &[position, scale], |transform| {
            transform.position = position;
            transform.scale = scale;
        })
    }

    fn set_rotation(&mut self, entity: EntityHandle, rotation: DVec3) -> Result<(), SceneError> {
        self.with_transform(entity, &[rotation], |transform| {
            transform.rotation = rotation;
        })
    }

    fn set_color(&mut self, entity: EntityHandle, color: Color) -> Result<(), SceneError> {
        self.insert(entity, color)
    }

    fn set_texture(&mut self, entity: EntityHandle, texture: &str) -> Result<(), SceneError> {
        self.insert(entity, Texture(texture.to_string()))
    }

    fn set_name(&mut self, entity: EntityHandle, name: &str) -> Result<(), SceneError> {
        self.insert(entity, Name::new(name))
    }

    fn set_parent(
        &mut self,
        entity: EntityHandle,
        parent: Option<EntityHandle>,
    ) -> Result<(), SceneError> {
        let child = self.resolve(entity)?;
        let parent_entity = parent.map(|p| self.resolve(p)).transpose()?;

        if let (Some(parent_handle), Some(parent_entity)) = (parent, parent_entity) {
            let mut cursor = Some(parent_entity);
            while let Some(ancestor) = cursor {
                if ancestor == child {
                    return Err(SceneError::ParentCycle {
                        child: entity,
                        parent: parent_handle,
                    });
                }
                cursor = self.inner.get::<&Parent>(ancestor).ok().map(|p| p.entity());
            }
        }

        self.detach_from_parent(child);

        if let Some(parent_entity) = parent_entity {
            self.inner
                .insert_one(child, Parent(parent_entity))
                .map_err(|_| SceneError::UnknownEntity(entity))?;

            let linked = self
                .inner
                .get::<&mut Children>(parent_entity)
                .map(|mut children| children.link(child))
                .is_ok();
            if !linked {
                self.inner
                    .insert_one(parent_entity, Children::of(child))
                    .map_err(|_| SceneError::UnknownEntity(entity))?;
            }
        }
        Ok(())
    }

    fn attach_physics(&mut self, entity: EntityHandle) -> Result<(), SceneError> {
        if !self.has_physics(entity)? {
            self.insert(entity, RigidBody)?;
            debug!("Attached rigid body to {entity}");
        }
        Ok(())
    }

    fn detach_physics(&mut self, entity: EntityHandle) -> Result<(), SceneError> {
        let resolved = self.resolve(entity)?;
        if self.inner.remove_one::<RigidBody>(resolved).is_ok() {
            debug!("Detached rigid body from {entity}");
        }
        Ok(())
    }

    fn position(&self, entity: EntityHandle) -> Result<DVec3, SceneError> {
        let resolved = self.resolve(entity)?;
        self.inner
            .get::<&Transform>(resolved)
            .map(|transform| transform.position)
            .map_err(|_| SceneError::UnknownEntity(entity))
    }

    fn set_position(&mut self, entity: EntityHandle, position: DVec3) -> Result<(), SceneError> {
        self.with_transform(entity, &[position], |transform| {
            transform.position = position;
        })
    }

    fn snapshot(&self, entity: EntityHandle) -> Result<EntitySnapshot, SceneError> {
        let resolved = self.resolve(entity)?;
        let entity_ref = self
            .inner
            .entity(resolved)
            .map_err(|_| SceneError::UnknownEntity(entity))?;

        let kind = entity_ref
            .get::<&EntityKind>()
            .map(|kind| (*kind).clone())
            .ok_or(SceneError::UnknownEntity(entity))?;
        let transform = entity_ref
            .get::<&Transform>()
            .map(|transform| *transform)
            .unwrap_or_default();

        Ok(EntitySnapshot {
            kind,
            name: entity_ref.get::<&Name>().map(|name| name.0.clone()),
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
            color: entity_ref
                .get::<&Color>()
                .map(|color| *color)
                .unwrap_or_default(),
            texture: entity_ref.get::<&Texture>().map(|texture| texture.0.clone()),
            parent: entity_ref
                .get::<&Parent>()
                .map(|parent| Self::handle(parent.entity())),
            has_physics: entity_ref.has::<RigidBody>(),
        })
    }

    fn destroy(&mut self, entity: EntityHandle) -> Result<(), SceneError> {
        let resolved = self.resolve(entity)?;
        self.detach_from_parent(resolved);

        let orphans: Vec<Entity> = self
            .inner
            .get::<&Children>(resolved)
            .map(|children| children.as_slice().to_vec())
            .unwrap_or_default();
        for orphan in orphans {
            self.inner.remove_one::<Parent>(orphan).ok();
        }

        self.inner
            .despawn(resolved)
            .map_err(|_| SceneError::UnknownEntity(entity))?;
        debug!("Destroyed entity {entity}");
        Ok(())
    }

    fn contains(&self, entity: EntityHandle) -> bool {
        self.resolve(entity).is_ok()
    }
}
