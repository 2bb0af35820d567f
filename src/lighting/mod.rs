//! Lighting presets
//!
//! Light kinds are configured with explicit, defaulted structs that are
//! validated before a light is added to the [`LightSystem`].

mod presets;
mod system;

pub use presets::{
    AmbientLightConfig, DirectionalLightConfig, Light, LightDefaults, LightError, LightType,
    PointLightConfig, ShadowSettings, SpotLightConfig,
};
pub use system::{LightId, LightSystem};
