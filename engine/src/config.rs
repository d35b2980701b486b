use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::{DEFAULT_MIN_SWIPE_DISTANCE, FoodStyleMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tick_interval_ms: u64,
    pub food_style_mode: FoodStyleMode,
    pub min_swipe_distance: f32,
    pub sound: SoundConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub enabled: bool,
    pub eat_volume: f32,
    pub game_over_volume: f32,
    pub background_volume: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 150,
            food_style_mode: FoodStyleMode::Rotating,
            min_swipe_distance: DEFAULT_MIN_SWIPE_DISTANCE,
            sound: SoundConfig::default(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            eat_volume: 0.3,
            game_over_volume: 0.4,
            background_volume: 0.2,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms < 50 || self.tick_interval_ms > 5000 {
            return Err("tick_interval_ms must be between 50 and 5000".to_string());
        }
        if self.min_swipe_distance <= 0.0 {
            return Err("min_swipe_distance must be greater than 0".to_string());
        }
        self.sound.validate()
    }

    /// Loads the config from a YAML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        let config: Self = serde_yaml_ng::from_str(&content)
            .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }
}

impl SoundConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, volume) in [
            ("eat_volume", self.eat_volume),
            ("game_over_volume", self.game_over_volume),
            ("background_volume", self.background_volume),
        ] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(format!("{} must be between 0.0 and 1.0", name));
            }
        }
        Ok(())
    }
}
