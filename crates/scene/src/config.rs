use crate::orbit::OrbitSettings;
use crate::post::BloomSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a scene configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables read once at startup. Every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for cube placement. Random when absent.
    pub seed: Option<u64>,
    /// Per-frame decay of the afterimage trail.
    pub afterimage_damp: f32,
    /// Exposure applied before Reinhard tone mapping.
    pub exposure: f32,
    pub bloom: BloomSettings,
    pub orbit: OrbitSettings,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            afterimage_damp: 0.95,
            exposure: 1.5,
            bloom: BloomSettings::default(),
            orbit: OrbitSettings::default(),
        }
    }
}

impl SceneConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&data)?;
        tracing::debug!("loaded scene config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_yaml_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.afterimage_damp) {
            return Err(ConfigError::Invalid(format!(
                "afterimage_damp must be within [0, 1], got {}",
                self.afterimage_damp
            )));
        }
        if self.exposure <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "exposure must be positive, got {}",
                self.exposure
            )));
        }
        if self.bloom.strength < 0.0 || self.bloom.radius < 0.0 {
            return Err(ConfigError::Invalid(
                "bloom strength and radius must not be negative".into(),
            ));
        }
        let orbit = &self.orbit;
        if orbit.min_distance <= 0.0 || orbit.min_distance > orbit.max_distance {
            return Err(ConfigError::Invalid(format!(
                "orbit distance range [{}, {}] is empty",
                orbit.min_distance, orbit.max_distance
            )));
        }
        if !(0.0..=1.0).contains(&orbit.damping_factor) {
            return Err(ConfigError::Invalid(format!(
                "orbit damping_factor must be within [0, 1], got {}",
                orbit.damping_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_scene_setup() {
        let c = SceneConfig::default();
        assert_eq!(c.seed, None);
        assert_eq!(c.afterimage_damp, 0.95);
        assert_eq!(c.exposure, 1.5);
        assert_eq!(c.bloom, BloomSettings::default());
        assert_eq!(c.orbit.min_distance, 25.0);
        assert_eq!(c.orbit.max_distance, 450.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let c = SceneConfig::from_yaml_str("{}").unwrap();
        assert_eq!(c, SceneConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let c = SceneConfig::from_yaml_str("seed: 7\nbloom:\n  strength: 2.5\n").unwrap();
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.bloom.strength, 2.5);
        assert_eq!(c.bloom.radius, 0.4);
        assert_eq!(c.afterimage_damp, 0.95);
    }

    #[test]
    fn malformed_yaml_is_error() {
        let err = SceneConfig::from_yaml_str("bloom: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn out_of_range_values_rejected() {
        let err = SceneConfig::from_yaml_str("afterimage_damp: 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SceneConfig::from_yaml_str("orbit:\n  min_distance: 500\n").unwrap_err();
        assert!(err.to_string().contains("orbit distance range"));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "seed: 99\nexposure: 2.0").unwrap();
        let c = SceneConfig::load(tmp.path()).unwrap();
        assert_eq!(c.seed, Some(99));
        assert_eq!(c.exposure, 2.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneConfig::load("/nonexistent/afterglow.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
