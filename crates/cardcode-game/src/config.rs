//! Session configuration.

use crate::error::ConfigError;
use cardcode_parser::{MAX_LEVEL, MIN_LEVEL};
use cardcode_wheel::{StrategicConfig, WheelConfig};
use serde::{Deserialize, Serialize};

/// Which wheel the session runs, with its settings inline.
///
/// `{"mode": "strategic", "totalRounds": 10}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum WheelSettings {
    Adaptive(WheelConfig),
    Strategic(StrategicConfig),
}

impl Default for WheelSettings {
    fn default() -> Self {
        WheelSettings::Adaptive(WheelConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Grammar level, 1 to 4.
    pub level: u8,
    pub wheel: WheelSettings,
    /// Seed for the wheel; overrides any seed in `wheel`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level: MIN_LEVEL,
            wheel: WheelSettings::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_level(self.level)?;
        match &self.wheel {
            WheelSettings::Adaptive(c) => c.validate()?,
            WheelSettings::Strategic(c) => c.validate()?,
        }
        Ok(())
    }

    /// Wheel settings with the top-level seed applied.
    pub(crate) fn seeded_wheel(&self) -> WheelSettings {
        let mut wheel = self.wheel.clone();
        if let Some(seed) = self.seed {
            match &mut wheel {
                WheelSettings::Adaptive(c) => c.seed = Some(seed),
                WheelSettings::Strategic(c) => c.seed = Some(seed),
            }
        }
        wheel
    }
}

pub(crate) fn check_level(level: u8) -> Result<(), ConfigError> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLevel(level))
    }
}
