//! History-adaptive weighted wheel.

use crate::config::{validate_weights, WheelConfig};
use crate::error::WheelResult;
use crate::sampling::{self, Probabilities};
use cardcode_types::Category;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Result of a sampled spin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    pub category: Category,
    pub probabilities_used: Probabilities,
    /// The uniform draw in `[0, 1)` that picked `category`.
    pub random: f64,
    pub history: Vec<Category>,
}

/// Result of a facilitator override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForcedSpin {
    pub category: Category,
    pub forced: bool,
    pub history: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelStats {
    /// Spins currently held in history (at most `maxHistory`).
    pub total_spins: usize,
    pub counts: BTreeMap<Category, usize>,
    pub history: Vec<Category>,
    pub current_probabilities: Probabilities,
}

/// Weighted wheel that boosts categories under-represented in its recent
/// history and suppresses over-represented ones.
///
/// The distribution is recomputed from base weights and history on every
/// spin; only the history is carried between calls.
#[derive(Debug, Clone)]
pub struct AdaptiveWheel<R = ChaCha8Rng> {
    config: WheelConfig,
    history: VecDeque<Category>,
    rng: R,
}

impl AdaptiveWheel<ChaCha8Rng> {
    /// Build from config, seeding from `config.seed` or OS entropy.
    pub fn new(config: WheelConfig) -> WheelResult<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Default settings with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: WheelConfig {
                seed: Some(seed),
                ..WheelConfig::default()
            },
            history: VecDeque::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> AdaptiveWheel<R> {
    /// Build with a caller-supplied random source.
    pub fn with_rng(config: WheelConfig, rng: R) -> WheelResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            history: VecDeque::new(),
            rng,
        })
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn history(&self) -> Vec<Category> {
        self.history.iter().copied().collect()
    }

    fn count(&self, category: Category) -> usize {
        self.history.iter().filter(|&&c| c == category).count()
    }

    /// The distribution the next spin will use.
    pub fn probabilities(&self) -> Probabilities {
        let avg = self.history.len() as f64 / Category::ALL.len() as f64;
        let weights: Probabilities = Category::ALL
            .iter()
            .map(|&c| {
                let base = self
                    .config
                    .base_probabilities
                    .get(&c)
                    .copied()
                    .unwrap_or(0.0);
                let observed = self.count(c) as f64;
                let weight = base * (1.0 + self.config.alpha * (avg - observed));
                (c, weight)
            })
            .collect();
        sampling::project(
            &weights,
            self.config.min_probability,
            self.config.max_probability,
            false,
        )
    }

    fn record(&mut self, category: Category) {
        self.history.push_back(category);
        while self.history.len() > self.config.max_history {
            self.history.pop_front();
        }
    }

    pub fn spin(&mut self) -> SpinResult {
        let probabilities = self.probabilities();
        let random: f64 = self.rng.gen();
        let category = sampling::sample(&probabilities, random);
        self.record(category);
        log::debug!("wheel spun {category} (r = {random:.4})");
        SpinResult {
            category,
            probabilities_used: probabilities,
            random,
            history: self.history(),
        }
    }

    /// Record `category` without sampling.
    pub fn force_color(&mut self, category: Category) -> ForcedSpin {
        self.record(category);
        log::debug!("wheel forced to {category}");
        ForcedSpin {
            category,
            forced: true,
            history: self.history(),
        }
    }

    /// [`AdaptiveWheel::force_color`] from a category name.
    pub fn force_color_named(&mut self, name: &str) -> WheelResult<ForcedSpin> {
        let category = name.parse::<Category>()?;
        Ok(self.force_color(category))
    }

    /// Clear the history.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn get_stats(&self) -> WheelStats {
        WheelStats {
            total_spins: self.history.len(),
            counts: Category::ALL.iter().map(|&c| (c, self.count(c))).collect(),
            history: self.history(),
            current_probabilities: self.probabilities(),
        }
    }

    pub fn update_base_probabilities(&mut self, probabilities: Probabilities) -> WheelResult<()> {
        validate_weights(&probabilities)?;
        self.config.base_probabilities = probabilities;
        Ok(())
    }
}
