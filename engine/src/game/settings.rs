use std::time::Duration;

use crate::config::GameConfig;

use super::types::FoodStyleMode;

/// Validated, engine-facing session parameters derived from [`GameConfig`].
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub tick_interval: Duration,
    pub food_style_mode: FoodStyleMode,
    pub min_swipe_distance: f32,
}

impl From<&GameConfig> for SessionSettings {
    fn from(config: &GameConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            food_style_mode: config.food_style_mode,
            min_swipe_distance: config.min_swipe_distance,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}
