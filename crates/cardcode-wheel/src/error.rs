//! Wheel error types.

use cardcode_types::{Category, UnknownCategory};
use thiserror::Error;

/// Configuration and campaign errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WheelError {
    #[error("invalid category: '{0}'")]
    InvalidCategory(String),
    /// A weight that is negative, NaN or infinite.
    #[error("invalid probability for {category}: {value}")]
    InvalidProbability { category: Category, value: f64 },
    /// Every weight is zero.
    #[error("probabilities must not all be zero")]
    EmptyDistribution,
    #[error("invalid probability bounds: min {min}, max {max}")]
    InvalidBounds { min: f64, max: f64 },
    #[error("campaign finished after {0} rounds")]
    CampaignFinished(u32),
}

impl WheelError {
    pub fn code(&self) -> &'static str {
        match self {
            WheelError::InvalidCategory(_) => "invalid_category",
            WheelError::InvalidProbability { .. } => "invalid_probability",
            WheelError::EmptyDistribution => "empty_distribution",
            WheelError::InvalidBounds { .. } => "invalid_bounds",
            WheelError::CampaignFinished(_) => "campaign_finished",
        }
    }
}

impl From<UnknownCategory> for WheelError {
    fn from(e: UnknownCategory) -> Self {
        WheelError::InvalidCategory(e.0)
    }
}

/// Result alias for wheel operations.
pub type WheelResult<T> = Result<T, WheelError>;
