//! Engine configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AiConfig;
use crate::lighting::LightDefaults;

/// Errors loading an [`EngineConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Engine configuration
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```ron
/// (
///     title: "Sandbox",
///     scene_dir: "levels",
///     ai: (follow_speed: 2.0),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Application title, used in log output
    pub title: String,
    /// Directory scene files are saved to and loaded from
    pub scene_dir: PathBuf,
    /// Indent scene files
    pub pretty_scene_files: bool,
    /// Frames averaged by the frame statistics
    pub stats_samples: usize,
    pub ai: AiConfig,
    pub lights: LightDefaults,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: String::from("Engine"),
            scene_dir: PathBuf::from("scenes"),
            pretty_scene_files: false,
            stats_samples: 120,
            ai: AiConfig::default(),
            lights: LightDefaults::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid config
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Create a new config with a title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the scene file directory
    #[must_use]
    pub fn with_scene_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scene_dir = dir.into();
        self
    }

    /// Indent scene files for readability
    #[must_use]
    pub fn with_pretty_scene_files(mut self, pretty: bool) -> Self {
        self.pretty_scene_files = pretty;
        self
    }

    /// Set AI movement tuning
    #[must_use]
    pub fn with_ai(mut self, ai: AiConfig) -> Self {
        self.ai = ai;
        self
    }

    /// Set defaults for new lights
    #[must_use]
    pub fn with_lights(mut self, lights: LightDefaults) -> Self {
        self.lights = lights;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = EngineConfig::from_ron_str("()").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.scene_dir, PathBuf::from("scenes"));
        assert_eq!(config.ai.stop_distance, 0.5);
    }

    #[test]
    fn test_partial_config() {
        let config = EngineConfig::from_ron_str(
            r#"(
                title: "Sandbox",
                pretty_scene_files: true,
                ai: (follow_speed: 2.5),
                lights: (shadow_resolution: 1024),
            )"#,
        )
        .unwrap();

        assert_eq!(config.title, "Sandbox");
        assert!(config.pretty_scene_files);
        assert_eq!(config.ai.follow_speed, 2.5);
        assert_eq!(config.ai.stop_distance, 0.5);
        assert_eq!(config.lights.shadow_resolution, 1024);
        assert_eq!(config.lights.intensity, 1.0);
    }

    #[test]
    fn test_invalid_config() {
        let result = EngineConfig::from_ron_str("(title: 42)");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.ron");
        std::fs::write(&path, r#"(scene_dir: "levels")"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.scene_dir, PathBuf::from("levels"));

        let missing = EngineConfig::load(dir.path().join("missing.ron"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_title("Demo")
            .with_scene_dir("out")
            .with_pretty_scene_files(true)
            .with_ai(AiConfig {
                follow_speed: 3.0,
                stop_distance: 1.0,
            });
        assert_eq!(config.title, "Demo");
        assert_eq!(config.scene_dir, PathBuf::from("out"));
        assert_eq!(config.ai.follow_speed, 3.0);
    }
}
