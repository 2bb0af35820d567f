//! Light manager for handling multiple lights

use glam::DVec3;
use log::debug;

use crate::core::Color;

use super::presets::{
    AmbientLightConfig, DirectionalLightConfig, Light, LightDefaults, LightError, LightType,
    PointLightConfig, ShadowSettings, SpotLightConfig,
};

/// Identifier of a light owned by a [`LightSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightId(u32);

/// Owns every light preset created for the running scene
#[derive(Debug, Default)]
pub struct LightSystem {
    lights: Vec<(LightId, Light)>,
    next_id: u32,
    defaults: LightDefaults,
}

impl LightSystem {
    /// Create a light system using the given defaults for new presets
    #[must_use]
    pub fn new(defaults: LightDefaults) -> Self {
        Self {
            lights: Vec::new(),
            next_id: 0,
            defaults,
        }
    }

    #[must_use]
    pub fn defaults(&self) -> &LightDefaults {
        &self.defaults
    }

    /// Point light preset seeded with the configured defaults
    #[must_use]
    pub fn point(&self, position: DVec3, color: Color) -> PointLightConfig {
        PointLightConfig::new(position, color)
            .with_intensity(self.defaults.intensity)
            .with_shadows(ShadowSettings::new(self.defaults.shadow_resolution))
    }

    /// Spot light preset seeded with the configured defaults
    #[must_use]
    pub fn spot(&self, position: DVec3, color: Color) -> SpotLightConfig {
        SpotLightConfig::new(position, color)
            .with_intensity(self.defaults.intensity)
            .with_shadows(ShadowSettings::new(self.defaults.shadow_resolution))
    }

    /// Directional light preset seeded with the configured defaults
    #[must_use]
    pub fn directional(&self, rotation: DVec3, color: Color) -> DirectionalLightConfig {
        DirectionalLightConfig::new(rotation, color)
            .with_intensity(self.defaults.intensity)
            .with_shadows(ShadowSettings::new(self.defaults.shadow_map_size))
    }

    /// Ambient light preset
    #[must_use]
    pub fn ambient(&self, color: Color) -> AmbientLightConfig {
        AmbientLightConfig::new(color)
    }

    /// Validate and add a light
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range
    pub fn create(&mut self, light: impl Into<Light>) -> Result<LightId, LightError> {
        let light = light.into();
        light.validate()?;

        let id = LightId(self.next_id);
        self.next_id += 1;
        debug!("Created {:?} light {id:?}", light.light_type());
        self.lights.push((id, light));
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: LightId) -> Option<&Light> {
        self.lights
            .iter()
            .find(|(light_id, _)| *light_id == id)
            .map(|(_, light)| light)
    }

    /// Remove a light, returning it
    pub fn remove(&mut self, id: LightId) -> Option<Light> {
        let index = self.lights.iter().position(|(light_id, _)| *light_id == id)?;
        Some(self.lights.remove(index).1)
    }

    /// Iterate over lights in creation order
    pub fn lights(&self) -> impl Iterator<Item = (LightId, &Light)> {
        self.lights.iter().map(|(id, light)| (*id, light))
    }

    /// Number of lights of one type
    #[must_use]
    pub fn count(&self, light_type: LightType) -> usize {
        self.lights
            .iter()
            .filter(|(_, light)| light.light_type() == light_type)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Clear all lights
    pub fn clear(&mut self) {
        self.lights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let mut system = LightSystem::new(LightDefaults::default());
        let warm = system.point(DVec3::new(2.0, 3.0, 2.0), Color::rgb(1.0, 0.9, 0.8));
        let id = system.create(warm.with_intensity(1.5).with_radius(15.0)).unwrap();

        let Some(Light::Point(light)) = system.get(id) else {
            panic!("expected a point light");
        };
        assert_eq!(light.radius, 15.0);
        assert_eq!(light.intensity, 1.5);
    }

    #[test]
    fn test_invalid_light_not_added() {
        let mut system = LightSystem::default();
        let result = system.create(SpotLightConfig::default().with_range(-5.0));
        assert_eq!(result, Err(LightError::InvalidRange(-5.0)));
        assert!(system.is_empty());
    }

    #[test]
    fn test_defaults_seed_presets() {
        let defaults = LightDefaults {
            intensity: 0.5,
            shadow_resolution: 1024,
            shadow_map_size: 8192,
            color_temperature: 5000,
        };
        let system = LightSystem::new(defaults);

        let point = system.point(DVec3::ZERO, Color::WHITE);
        assert_eq!(point.intensity, 0.5);
        assert_eq!(point.shadows.resolution, 1024);

        let sun = system.directional(DVec3::new(45.0, -45.0, 0.0), Color::WHITE);
        assert_eq!(sun.shadows.resolution, 8192);
        assert_eq!(system.defaults().color_temperature, 5000);
    }

    #[test]
    fn test_count_and_remove() {
        let mut system = LightSystem::default();
        let sun = system
            .create(system.directional(DVec3::ZERO, Color::WHITE))
            .unwrap();
        system
            .create(system.ambient(Color::rgb(0.1, 0.1, 0.15)).with_intensity(0.2))
            .unwrap();
        system.create(system.point(DVec3::Y, Color::WHITE)).unwrap();

        assert_eq!(system.len(), 3);
        assert_eq!(system.count(LightType::Directional), 1);
        assert_eq!(system.count(LightType::Spot), 0);

        assert!(matches!(system.remove(sun), Some(Light::Directional(_))));
        assert!(system.remove(sun).is_none());
        assert_eq!(system.lights().count(), 2);

        system.clear();
        assert!(system.is_empty());
    }
}
