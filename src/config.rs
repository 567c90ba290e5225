//! AI tuning configuration
//!
//! Supports loading from RON and JSON. Every field has a default, so a
//! config file only needs to list the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::MIN_STEP_DEGREES;

/// Tuning values for enemy navigation and perception
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Length of sight rays
    pub sight_range: f32,
    /// Radius in which enemies sense the player without seeing it
    pub proximity_range: f32,
    /// Reach of enemy attacks
    pub attack_range: f32,
    /// Enemy travel speed in world units per second
    pub move_speed: f32,
    /// Enemies closer than this to the player hold position
    pub adjacent_radius: f32,
    /// Distance under which a goal counts as reached
    pub arrival_epsilon: f32,
    /// Per-tick chance `(numerator, denominator)` of an unprompted repath
    pub repath_chance: (u32, u32),
    /// Half-width of the sight fan in degrees
    pub sight_half_angle_degrees: f32,
    /// Angle between sight rays in degrees
    pub sight_step_degrees: f32,
    /// Ticks between sentry turns
    pub sentry_cooldown: u32,
    /// Ticks of hit reaction
    pub hit_frames: u32,
    /// Ticks of knockback grace, counted from the hit
    pub knockback_frames: u32,
    /// Seed of the controller's random source
    pub seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            sight_range: 8.0,
            proximity_range: 3.0,
            attack_range: 4.0,
            move_speed: 2.0,
            adjacent_radius: 1.0,
            arrival_epsilon: 0.05,
            repath_chance: (1, 10),
            sight_half_angle_degrees: 30.0,
            sight_step_degrees: 5.0,
            sentry_cooldown: 120,
            hit_frames: 10,
            knockback_frames: 20,
            seed: 0,
        }
    }
}

impl AiConfig {
    /// Check that every value is usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("sight_range", self.sight_range),
            ("proximity_range", self.proximity_range),
            ("attack_range", self.attack_range),
            ("move_speed", self.move_speed),
            ("adjacent_radius", self.adjacent_radius),
            ("arrival_epsilon", self.arrival_epsilon),
            ("sight_step_degrees", self.sight_step_degrees),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if !(self.sight_half_angle_degrees >= 0.0 && self.sight_half_angle_degrees <= 180.0) {
            return Err(ConfigError::Invalid(format!(
                "sight_half_angle_degrees must be within 0..=180, got {}",
                self.sight_half_angle_degrees
            )));
        }

        if self.sight_step_degrees < MIN_STEP_DEGREES {
            return Err(ConfigError::Invalid(format!(
                "sight_step_degrees must be at least {MIN_STEP_DEGREES}, got {}",
                self.sight_step_degrees
            )));
        }

        let (numerator, denominator) = self.repath_chance;
        if denominator == 0 || numerator > denominator {
            return Err(ConfigError::Invalid(format!(
                "repath_chance must satisfy 0 <= n <= d and d > 0, got ({numerator}, {denominator})"
            )));
        }

        for (name, value) in [
            ("sentry_cooldown", self.sentry_cooldown),
            ("hit_frames", self.hit_frames),
            ("knockback_frames", self.knockback_frames),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }

        if self.knockback_frames < self.hit_frames {
            return Err(ConfigError::Invalid(format!(
                "knockback_frames ({}) must not be shorter than hit_frames ({})",
                self.knockback_frames, self.hit_frames
            )));
        }

        Ok(())
    }

    /// Parse and validate a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: AiConfig =
            ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: AiConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error
    Io(String),
    /// Deserialization error
    Parse(String),
    /// Serialization error
    Serialize(String),
    /// A value outside its allowed range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
            Self::Invalid(e) => write!(f, "Invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(AiConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = AiConfig::from_ron_str("(sight_range: 6.5, sentry_cooldown: 30)").unwrap();

        assert!((config.sight_range - 6.5).abs() < f32::EPSILON);
        assert_eq!(config.sentry_cooldown, 30);
        assert_eq!(config.repath_chance, (1, 10));
    }

    #[test]
    fn test_ron_round_trip() {
        let config = AiConfig {
            seed: 42,
            repath_chance: (1, 4),
            ..Default::default()
        };

        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let loaded = AiConfig::from_ron_str(&ron_str).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_config() {
        let config = AiConfig::from_json_str(r#"{"move_speed": 3.0, "seed": 7}"#).unwrap();

        assert!((config.move_speed - 3.0).abs() < f32::EPSILON);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            AiConfig {
                move_speed: 0.0,
                ..Default::default()
            },
            AiConfig {
                repath_chance: (3, 2),
                ..Default::default()
            },
            AiConfig {
                repath_chance: (0, 0),
                ..Default::default()
            },
            AiConfig {
                sentry_cooldown: 0,
                ..Default::default()
            },
            AiConfig {
                knockback_frames: 5,
                hit_frames: 10,
                ..Default::default()
            },
            AiConfig {
                arrival_epsilon: f32::NAN,
                ..Default::default()
            },
            AiConfig {
                sight_step_degrees: 1e-6,
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AiConfig::from_ron_str("(sight_range: \"far\")"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AiConfig::load_ron("/nonexistent/ai.ron"),
            Err(ConfigError::Io(_))
        ));
    }
}
