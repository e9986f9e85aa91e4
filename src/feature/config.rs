//! Runtime configuration shared by every feature a factory creates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`FeatureConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse feature config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid feature config: {0}")]
    Invalid(String),
}

/// Tunables for the feature loop.
///
/// Missing keys fall back to their defaults, so an empty TOML document is a
/// valid configuration.
///
/// # Example
///
/// ```rust
/// use monkeybusiness::feature::FeatureConfig;
///
/// let config = FeatureConfig::from_toml_str("history_capacity = 8").unwrap();
/// assert_eq!(config.history_capacity, 8);
/// assert_eq!(config.event_capacity, FeatureConfig::default().event_capacity);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Number of applied transitions kept per feature; 0 disables history
    pub history_capacity: usize,
    /// Events buffered before a subscriber drains them
    pub event_capacity: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            history_capacity: 64,
            event_capacity: 16,
        }
    }
}

impl FeatureConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
