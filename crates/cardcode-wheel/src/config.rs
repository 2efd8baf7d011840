//! Wheel configuration, loadable from JSON.

use crate::error::{WheelError, WheelResult};
use crate::sampling::{self, Probabilities};
use cardcode_types::Category;
use serde::{Deserialize, Serialize};

/// Settings for [`AdaptiveWheel`](crate::AdaptiveWheel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WheelConfig {
    pub base_probabilities: Probabilities,
    /// Strength of the history correction.
    pub alpha: f64,
    pub min_probability: f64,
    pub max_probability: f64,
    pub max_history: usize,
    /// Fixed seed for reproducible draws; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            base_probabilities: sampling::uniform(),
            alpha: 0.6,
            min_probability: 0.12,
            max_probability: 0.5,
            max_history: 10,
            seed: None,
        }
    }
}

impl WheelConfig {
    pub fn validate(&self) -> WheelResult<()> {
        validate_bounds(self.min_probability, self.max_probability)?;
        validate_weights(&self.base_probabilities)
    }
}

/// Settings for [`StrategicWheel`](crate::StrategicWheel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategicConfig {
    pub total_rounds: u32,
    pub base_probabilities: Probabilities,
    pub min_probability: f64,
    pub max_probability: f64,
    /// Trailing spins inspected when balancing green against red.
    pub balance_window: usize,
    /// Share of the leading workhorse's weight moved to the other.
    pub balance_shift: f64,
    /// Share of the previous category's weight removed before the draw.
    pub repeat_penalty: f64,
    /// Weight added to the rare category per round it runs behind schedule.
    pub rare_boost: f64,
    pub seed: Option<u64>,
}

impl Default for StrategicConfig {
    fn default() -> Self {
        Self {
            total_rounds: 15,
            base_probabilities: Probabilities::from([
                (Category::Green, 0.45),
                (Category::Red, 0.30),
                (Category::Blue, 0.15),
                (Category::Yellow, 0.10),
            ]),
            min_probability: 0.05,
            max_probability: 0.60,
            balance_window: 6,
            balance_shift: 0.25,
            repeat_penalty: 0.3,
            rare_boost: 0.15,
            seed: None,
        }
    }
}

impl StrategicConfig {
    pub fn validate(&self) -> WheelResult<()> {
        validate_bounds(self.min_probability, self.max_probability)?;
        validate_weights(&self.base_probabilities)?;
        for value in [self.balance_shift, self.repeat_penalty] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WheelError::InvalidProbability {
                    category: Category::Green,
                    value,
                });
            }
        }
        if !self.rare_boost.is_finite() || self.rare_boost < 0.0 {
            return Err(WheelError::InvalidProbability {
                category: Category::Yellow,
                value: self.rare_boost,
            });
        }
        Ok(())
    }
}

/// `0 <= min <= max <= 1`, with room for four categories between them.
pub(crate) fn validate_bounds(min: f64, max: f64) -> WheelResult<()> {
    let n = Category::ALL.len() as f64;
    let ok = min.is_finite()
        && max.is_finite()
        && min >= 0.0
        && min <= max
        && max <= 1.0
        && min * n <= 1.0 + 1e-12
        && max * n >= 1.0 - 1e-12;
    if ok {
        Ok(())
    } else {
        Err(WheelError::InvalidBounds { min, max })
    }
}

/// Every weight finite and non-negative, not all zero.
pub(crate) fn validate_weights(weights: &Probabilities) -> WheelResult<()> {
    for (&category, &value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(WheelError::InvalidProbability { category, value });
        }
    }
    if weights.values().all(|&v| v == 0.0) {
        return Err(WheelError::EmptyDistribution);
    }
    Ok(())
}
