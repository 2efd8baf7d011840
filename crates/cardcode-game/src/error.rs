use cardcode_wheel::WheelError;
use thiserror::Error;

/// Bad session configuration or import data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid level {0}: expected 1 to 4")]
    InvalidLevel(u8),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Wheel(#[from] WheelError),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidLevel(_) => "invalid_level",
            ConfigError::Json(_) => "invalid_json",
            ConfigError::Wheel(e) => e.code(),
        }
    }
}
