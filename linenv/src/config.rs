//! Inference configuration.
use serde::Deserialize;

use crate::error::ConfigError;

/// Configurable parameters used during inference.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceConfig {
    /// Consecutive envelope coefficients closer than this are considered equal. (Default: 1e-6)
    pub epsilon: f64,
}

impl Default for InferenceConfig {
    fn default() -> InferenceConfig {
        InferenceConfig { epsilon: 1e-6 }
    }
}

impl InferenceConfig {
    /// Description of all options, as accepted by [`InferenceConfigUpdate`].
    pub fn help() -> String {
        let defaults = InferenceConfig::default();
        format!(
            "epsilon = {}\n    Consecutive envelope coefficients closer than this are \
             considered equal.\n",
            defaults.epsilon
        )
    }
}

/// A partial configuration.
///
/// Deserialized from TOML by the command line frontend. Updates can be merged, later values
/// overriding earlier ones, and then applied to an [`InferenceConfig`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfigUpdate {
    pub epsilon: Option<f64>,
}

impl InferenceConfigUpdate {
    /// Create an update that changes nothing.
    pub fn new() -> InferenceConfigUpdate {
        InferenceConfigUpdate::default()
    }

    /// Merge another update into this one.
    ///
    /// Values present in `other` take precedence.
    pub fn merge(&mut self, other: InferenceConfigUpdate) {
        if other.epsilon.is_some() {
            self.epsilon = other.epsilon;
        }
    }

    /// Apply this update to a configuration.
    ///
    /// The configuration is left unchanged when a value is invalid.
    pub fn apply(&self, config: &mut InferenceConfig) -> Result<(), ConfigError> {
        if let Some(epsilon) = self.epsilon {
            if !epsilon.is_finite() || epsilon < 0.0 {
                return Err(ConfigError::InvalidEpsilon { value: epsilon });
            }
            config.epsilon = epsilon;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_epsilon() {
        assert_eq!(InferenceConfig::default().epsilon, 1e-6);
        assert!(InferenceConfig::help().contains("epsilon = 0.000001"));
    }

    #[test]
    fn merge_and_apply() {
        let mut update = InferenceConfigUpdate::new();
        update.merge(toml::from_str("epsilon = 0.5").unwrap());
        update.merge(toml::from_str("").unwrap());

        let mut config = InferenceConfig::default();
        update.apply(&mut config).unwrap();
        assert_eq!(config.epsilon, 0.5);
    }

    #[test]
    fn unknown_option() {
        assert!(toml::from_str::<InferenceConfigUpdate>("tolerance = 1.0").is_err());
    }

    #[test]
    fn invalid_epsilon() {
        let update = InferenceConfigUpdate {
            epsilon: Some(-1.0),
        };
        let mut config = InferenceConfig::default();
        assert!(matches!(
            update.apply(&mut config),
            Err(ConfigError::InvalidEpsilon { .. })
        ));
        assert_eq!(config, InferenceConfig::default());
    }
}
