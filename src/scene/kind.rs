//! Entity kinds

use super::error::SceneError;

/// The concrete kind of a scene entity.
///
/// Light, camera and controller kinds are built with engine defaults; every
/// other entity is a generic mesh identified by its model name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A mesh entity rendering the named model
    Generic {
        /// Model identifier, e.g. `cube` or a cached model name
        model: String,
    },
    /// A point light
    PointLight,
    /// A free-flying editor camera
    Camera,
    /// A first-person player controller
    FirstPersonController,
}

impl EntityKind {
    /// Create a generic mesh kind
    #[must_use]
    pub fn generic(model: impl Into<String>) -> Self {
        Self::Generic {
            model: model.into(),
        }
    }

    /// Resolve the `model` field of a scene record.
    ///
    /// `EditorCamera` is accepted as an alias for `Camera`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownEntityKind`] for an empty model name
    pub fn from_model_name(name: &str) -> Result<Self, SceneError> {
        match name {
            "PointLight" => Ok(Self::PointLight),
            "Camera" | "EditorCamera" => Ok(Self::Camera),
            "FirstPersonController" => Ok(Self::FirstPersonController),
            other if other.trim().is_empty() => {
                Err(SceneError::UnknownEntityKind(other.to_string()))
            }
            other => Ok(Self::generic(other)),
        }
    }

    /// Name written to the `model` field of a scene record.
    ///
    /// This is also the name an unnamed entity answers to when resolving
    /// parent links.
    #[must_use]
    pub fn model_name(&self) -> &str {
        match self {
            Self::Generic { model } => model,
            Self::PointLight => "PointLight",
            Self::Camera => "Camera",
            Self::FirstPersonController => "FirstPersonController",
        }
    }

    /// Whether this is a generic mesh entity
    #[must_use]
    pub const fn is_generic(&self) -> bool {
        matches!(self, Self::Generic { .. })
    }
}
