//! Game configuration loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::battle::BattleSettings;
use crate::sketch::Rgba;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "drones.toml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every field is optional in the file; missing ones fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target frame time in milliseconds.
    pub frame_ms: u64,
    /// Amount the scene transition timer drops per frame.
    pub transition_step: f64,
    pub starting_money: u32,
    /// Frames between enemy waves.
    pub wave_interval: u64,
    /// Fixed RNG seed for reproducible battles.
    pub seed: Option<u64>,
    pub log_file: String,
    pub log_level: String,
    pub player_color: [u8; 3],
    pub enemy_color: [u8; 3],
    pub show_fps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            transition_step: 0.05,
            starting_money: 150,
            wave_interval: 240,
            seed: None,
            log_file: "drones.log".to_string(),
            log_level: "info".to_string(),
            player_color: [153, 255, 170],
            enemy_color: [173, 196, 255],
            show_fps: false,
        }
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Loads `path` when given, else `drones.toml` if present, else defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load_from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.transition_step > 0.0 && self.transition_step <= 2.0) {
            return Err(ConfigError::Invalid {
                field: "transition_step",
                reason: format!("{} outside (0, 2]", self.transition_step),
            });
        }
        Ok(())
    }

    pub fn battle_settings(&self) -> BattleSettings {
        BattleSettings {
            starting_money: self.starting_money,
            wave_interval: self.wave_interval,
            seed: self.seed,
        }
    }

    pub fn player_color(&self) -> Rgba {
        let [r, g, b] = self.player_color;
        Rgba::rgb(r, g, b)
    }

    pub fn enemy_color(&self) -> Rgba {
        let [r, g, b] = self.enemy_color;
        Rgba::rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let config = Config::from_toml(
            r#"
            starting_money = 500
            seed = 7
            player_color = [10, 20, 30]
            "#,
        )
        .unwrap();

        assert_eq!(config.starting_money, 500);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.player_color(), Rgba::rgb(10, 20, 30));
        assert_eq!(config.frame_ms, 16);
        assert_eq!(config.battle_settings().starting_money, 500);
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml("frame_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_toml("frame_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "frame_ms", .. }));

        let err = Config::from_toml("transition_step = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "transition_step", .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load(Some("/nonexistent/drones.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
