//! The persisted form of an entity

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::core::Color;

use super::factory::EntitySnapshot;

/// Engine-agnostic record of an entity's persisted state.
///
/// Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Kind name, or the model identifier for generic entities
    pub model: String,
    pub position: DVec3,
    pub scale: DVec3,
    pub color: Color,
    pub texture: Option<String>,
    /// Name of the parent entity
    pub parent: Option<String>,
    pub has_physics: bool,
    /// Explicit entity name, omitted when unnamed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityRecord {
    /// Record for a generic mesh at the origin with default state
    #[must_use]
    pub fn generic(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            position: DVec3::ZERO,
            scale: DVec3::ONE,
            color: Color::WHITE,
            texture: None,
            parent: None,
            has_physics: false,
            name: None,
        }
    }

    /// Build a record from a snapshot and its parent's resolved name
    #[must_use]
    pub fn from_snapshot(snapshot: &EntitySnapshot, parent: Option<String>) -> Self {
        Self {
            model: snapshot.kind.model_name().to_string(),
            position: snapshot.position,
            scale: snapshot.scale,
            color: snapshot.color,
            texture: snapshot.texture.clone(),
            parent,
            has_physics: snapshot.has_physics,
            name: snapshot.name.clone(),
        }
    }

    /// The name the rebuilt entity answers to when resolving parent links
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.model)
    }
}
