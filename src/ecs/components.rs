//! Common ECS components

use glam::DVec3;

/// Transform component for position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: DVec3,
    /// Rotation as euler angles in degrees
    pub rotation: DVec3,
    /// Scale factor
    pub scale: DVec3,
}

impl Transform {
    /// Create a new transform at the origin
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    #[must_use]
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Translate by a delta
    pub fn translate(&mut self, delta: DVec3) {
        self.position += delta;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

/// Explicit entity name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Texture reference applied to an entity's mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture(pub String);

/// Marker for entities with an attached rigid body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RigidBody;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_defaults() {
        let transform = Transform::from_position(DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, DVec3::ONE);
        assert_eq!(transform.rotation, DVec3::ZERO);
    }

    #[test]
    fn test_translate() {
        let mut transform = Transform::new();
        transform.translate(DVec3::X);
        transform.translate(DVec3::X);
        assert_eq!(transform.position, DVec3::new(2.0, 0.0, 0.0));
    }
}
