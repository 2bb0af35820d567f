//! Light presets with validated configuration
//!
//! Supports point lights, spot lights, directional lights and ambient light.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Color;

/// Errors raised when a light configuration is out of range
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LightError {
    #[error("intensity must be finite and non-negative, got {0}")]
    InvalidIntensity(f32),
    #[error("radius must be positive, got {0}")]
    InvalidRadius(f32),
    #[error("range must be positive, got {0}")]
    InvalidRange(f32),
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    InvalidFov(f32),
    #[error("shadow resolution must be a power of two, got {0}")]
    InvalidShadowResolution(u32),
    #[error("shadow filter size must be finite and non-negative, got {0}")]
    InvalidFilterSize(f32),
    #[error("far attenuation distance must be positive, got {0}")]
    InvalidAttenuation(f32),
}

/// Type of light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    Point,
    Spot,
    Directional,
    Ambient,
}

/// Shadow settings shared by shadow-casting lights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    pub enabled: bool,
    /// Shadow map resolution in texels per side
    pub resolution: u32,
    /// Softening kernel size
    pub filter_size: f32,
}

impl ShadowSettings {
    #[must_use]
    pub const fn new(resolution: u32) -> Self {
        Self {
            enabled: true,
            resolution,
            filter_size: 1.0,
        }
    }

    #[must_use]
    pub const fn with_filter_size(mut self, filter_size: f32) -> Self {
        self.filter_size = filter_size;
        self
    }

    fn validate(&self) -> Result<(), LightError> {
        if !self.resolution.is_power_of_two() {
            return Err(LightError::InvalidShadowResolution(self.resolution));
        }
        if !self.filter_size.is_finite() || self.filter_size < 0.0 {
            return Err(LightError::InvalidFilterSize(self.filter_size));
        }
        Ok(())
    }
}

fn validate_intensity(intensity: f32) -> Result<(), LightError> {
    if intensity.is_finite() && intensity >= 0.0 {
        Ok(())
    } else {
        Err(LightError::InvalidIntensity(intensity))
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Point light - emits in all directions from a point
#[derive(Debug, Clone, PartialEq)]
pub struct PointLightConfig {
    pub position: DVec3,
    pub color: Color,
    pub intensity: f32,
    pub radius: f32,
    pub shadows: ShadowSettings,
    pub volumetric: bool,
    /// Distance at which attenuation reaches zero
    pub far_z_atten: f32,
}

impl Default for PointLightConfig {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            color: Color::WHITE,
            intensity: 1.0,
            radius: 10.0,
            shadows: ShadowSettings::new(2048),
            volumetric: false,
            far_z_atten: 100.0,
        }
    }
}

impl PointLightConfig {
    /// Create a point light at a position
    #[must_use]
    pub fn new(position: DVec3, color: Color) -> Self {
        Self {
            position,
            color,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    #[must_use]
    pub const fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub const fn with_shadows(mut self, shadows: ShadowSettings) -> Self {
        self.shadows = shadows;
        self
    }

    #[must_use]
    pub const fn with_volumetric(mut self, volumetric: bool) -> Self {
        self.volumetric = volumetric;
        self
    }

    #[must_use]
    pub const fn with_far_attenuation(mut self, distance: f32) -> Self {
        self.far_z_atten = distance;
        self
    }

    /// Check every field is in range
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field
    pub fn validate(&self) -> Result<(), LightError> {
        validate_intensity(self.intensity)?;
        if !positive(self.radius) {
            return Err(LightError::InvalidRadius(self.radius));
        }
        if !positive(self.far_z_atten) {
            return Err(LightError::InvalidAttenuation(self.far_z_atten));
        }
        self.shadows.validate()
    }
}

/// Spot light - cone of light from a point
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLightConfig {
    pub position: DVec3,
    pub color: Color,
    pub intensity: f32,
    /// Cone angle in degrees
    pub fov: f32,
    pub range: f32,
    pub shadows: ShadowSettings,
    pub volumetric: bool,
    pub far_z_atten: f32,
}

impl Default for SpotLightConfig {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            color: Color::WHITE,
            intensity: 1.0,
            fov: 45.0,
            range: 20.0,
            shadows: ShadowSettings::new(2048),
            volumetric: false,
            far_z_atten: 100.0,
        }
    }
}

impl SpotLightConfig {
    /// Create a spot light at a position
    #[must_use]
    pub fn new(position: DVec3, color: Color) -> Self {
        Self {
            position,
            color,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Set the cone angle in degrees
    #[must_use]
    pub const fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    #[must_use]
    pub const fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub const fn with_shadows(mut self, shadows: ShadowSettings) -> Self {
        self.shadows = shadows;
        self
    }

    /// Check every field is in range
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field
    pub fn validate(&self) -> Result<(), LightError> {
        validate_intensity(self.intensity)?;
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(LightError::InvalidFov(self.fov));
        }
        if !positive(self.range) {
            return Err(LightError::InvalidRange(self.range));
        }
        if !positive(self.far_z_atten) {
            return Err(LightError::InvalidAttenuation(self.far_z_atten));
        }
        self.shadows.validate()
    }
}

/// Directional light - parallel rays (like the sun)
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLightConfig {
    /// Euler angles in degrees
    pub rotation: DVec3,
    pub color: Color,
    pub intensity: f32,
    pub shadows: ShadowSettings,
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            rotation: DVec3::new(45.0, -45.0, 0.0),
            color: Color::WHITE,
            intensity: 1.0,
            shadows: ShadowSettings::new(4096),
        }
    }
}

impl DirectionalLightConfig {
    #[must_use]
    pub fn new(rotation: DVec3, color: Color) -> Self {
        Self {
            rotation,
            color,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    #[must_use]
    pub const fn with_shadows(mut self, shadows: ShadowSettings) -> Self {
        self.shadows = shadows;
        self
    }

    /// Check every field is in range
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field
    pub fn validate(&self) -> Result<(), LightError> {
        validate_intensity(self.intensity)?;
        self.shadows.validate()
    }
}

/// Ambient light
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLightConfig {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLightConfig {
    fn default() -> Self {
        Self {
            color: Color::rgb(0.1, 0.1, 0.1),
            intensity: 0.1,
        }
    }
}

impl AmbientLightConfig {
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    #[must_use]
    pub const fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Check every field is in range
    ///
    /// # Errors
    ///
    /// Returns an error for a negative or non-finite intensity
    pub fn validate(&self) -> Result<(), LightError> {
        validate_intensity(self.intensity)
    }
}

/// Any light preset
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Point(PointLightConfig),
    Spot(SpotLightConfig),
    Directional(DirectionalLightConfig),
    Ambient(AmbientLightConfig),
}

impl Light {
    #[must_use]
    pub const fn light_type(&self) -> LightType {
        match self {
            Self::Point(_) => LightType::Point,
            Self::Spot(_) => LightType::Spot,
            Self::Directional(_) => LightType::Directional,
            Self::Ambient(_) => LightType::Ambient,
        }
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        match self {
            Self::Point(light) => light.color,
            Self::Spot(light) => light.color,
            Self::Directional(light) => light.color,
            Self::Ambient(light) => light.color,
        }
    }

    #[must_use]
    pub const fn intensity(&self) -> f32 {
        match self {
            Self::Point(light) => light.intensity,
            Self::Spot(light) => light.intensity,
            Self::Directional(light) => light.intensity,
            Self::Ambient(light) => light.intensity,
        }
    }

    /// Validate the wrapped configuration
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field
    pub fn validate(&self) -> Result<(), LightError> {
        match self {
            Self::Point(light) => light.validate(),
            Self::Spot(light) => light.validate(),
            Self::Directional(light) => light.validate(),
            Self::Ambient(light) => light.validate(),
        }
    }
}

impl From<PointLightConfig> for Light {
    fn from(config: PointLightConfig) -> Self {
        Self::Point(config)
    }
}

impl From<SpotLightConfig> for Light {
    fn from(config: SpotLightConfig) -> Self {
        Self::Spot(config)
    }
}

impl From<DirectionalLightConfig> for Light {
    fn from(config: DirectionalLightConfig) -> Self {
        Self::Directional(config)
    }
}

impl From<AmbientLightConfig> for Light {
    fn from(config: AmbientLightConfig) -> Self {
        Self::Ambient(config)
    }
}

/// Engine-wide lighting defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightDefaults {
    pub intensity: f32,
    /// Shadow resolution for point and spot lights
    pub shadow_resolution: u32,
    /// Shadow resolution for directional lights
    pub shadow_map_size: u32,
    /// White point in Kelvin
    pub color_temperature: u32,
}

impl Default for LightDefaults {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            shadow_resolution: 2048,
            shadow_map_size: 4096,
            color_temperature: 6500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PointLightConfig::default().validate().is_ok());
        assert!(SpotLightConfig::default().validate().is_ok());
        assert!(DirectionalLightConfig::default().validate().is_ok());
        assert!(AmbientLightConfig::default().validate().is_ok());
    }

    #[test]
    fn test_preset_default_values() {
        let point = PointLightConfig::default();
        assert_eq!(point.radius, 10.0);
        assert_eq!(point.shadows.resolution, 2048);
        assert!(point.shadows.enabled);
        assert!(!point.volumetric);

        let spot = SpotLightConfig::default();
        assert_eq!(spot.fov, 45.0);
        assert_eq!(spot.range, 20.0);

        let sun = DirectionalLightConfig::default();
        assert_eq!(sun.rotation, DVec3::new(45.0, -45.0, 0.0));
        assert_eq!(sun.shadows.resolution, 4096);

        assert_eq!(AmbientLightConfig::default().intensity, 0.1);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let point = PointLightConfig::default().with_intensity(-1.0);
        assert_eq!(point.validate(), Err(LightError::InvalidIntensity(-1.0)));

        let point = PointLightConfig::default().with_radius(0.0);
        assert_eq!(point.validate(), Err(LightError::InvalidRadius(0.0)));

        let spot = SpotLightConfig::default().with_fov(180.0);
        assert_eq!(spot.validate(), Err(LightError::InvalidFov(180.0)));

        let mut shadows = ShadowSettings::new(3000);
        let sun = DirectionalLightConfig::default().with_shadows(shadows);
        assert_eq!(
            sun.validate(),
            Err(LightError::InvalidShadowResolution(3000))
        );

        shadows = ShadowSettings::new(1024);
        shadows.filter_size = f32::NAN;
        let spot = SpotLightConfig::default().with_shadows(shadows);
        assert!(matches!(
            spot.validate(),
            Err(LightError::InvalidFilterSize(_))
        ));

        let ambient = AmbientLightConfig::default().with_intensity(f32::INFINITY);
        assert!(ambient.validate().is_err());
    }

    #[test]
    fn test_light_accessors() {
        let light = Light::from(SpotLightConfig::new(DVec3::Y, Color::GRAY).with_intensity(2.0));
        assert_eq!(light.light_type(), LightType::Spot);
        assert_eq!(light.color(), Color::GRAY);
        assert_eq!(light.intensity(), 2.0);
    }
}
