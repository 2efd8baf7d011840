//! Fixed-length campaign wheel with hard fairness rules.
//!
//! Rules, applied in order to the base weights before every draw:
//!
//! 1. The rare category (yellow, the print signal) has a campaign target. It
//!    is boosted while behind the pro-rata schedule, drops to 0 once the
//!    target is met, and is drawn outright when the rounds left only just
//!    fit the outstanding count.
//! 2. Yellow and blue never come up twice in a row.
//! 3. Green and red are balanced over a trailing window.
//! 4. The previous category pays a repeat penalty, spread proportionally
//!    over the other non-zero categories.
//!
//! The result is projected onto the probability bounds (non-zero entries
//! only) and sampled like the adaptive wheel.

use crate::config::StrategicConfig;
use crate::error::{WheelError, WheelResult};
use crate::sampling::{self, Probabilities};
use cardcode_types::Category;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The low-frequency category that signals a print round.
pub const RARE_CATEGORY: Category = Category::Yellow;

/// Categories that may not repeat on consecutive spins.
const NO_REPEAT: [Category; 2] = [Category::Yellow, Category::Blue];

/// The two categories kept in balance.
const WORKHORSES: (Category, Category) = (Category::Green, Category::Red);

/// Why a spin came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinReason {
    /// The remaining rounds only just fit the outstanding rare target.
    RareRequired,
    /// Rare category drawn while boosted.
    RareBoosted,
    /// A workhorse drawn while the balance rule favored it.
    Rebalanced,
    /// Ordinary weighted draw.
    Weighted,
    /// Facilitator override.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicSpin {
    pub category: Category,
    pub reason: SpinReason,
    /// 1-based round this spin filled.
    pub round: u32,
    /// Absent for forced spins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Probabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random: Option<f64>,
    pub forced: bool,
}

/// Campaign snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub current_round: u32,
    pub total_rounds: u32,
    pub remaining_rounds: u32,
    pub rare_count: u32,
    pub rare_target: u32,
    pub rare_deficit: u32,
    pub color_counts: BTreeMap<Category, usize>,
    pub history: Vec<Category>,
}

/// Rare-event target for a campaign: one per five rounds, between 2 and 3,
/// and never more than fit without consecutive repeats.
pub fn rare_target(total_rounds: u32) -> u32 {
    (total_rounds / 5).clamp(2, 3).min(total_rounds.div_ceil(2))
}

/// How many rare spins still fit in `rounds` when none may repeat.
fn rare_capacity(rounds: u32, last_was_rare: bool) -> u32 {
    if last_was_rare {
        rounds / 2
    } else {
        rounds.div_ceil(2)
    }
}

/// Distribution for one round plus the rules that shaped it.
#[derive(Debug, Clone)]
struct Plan {
    probabilities: Probabilities,
    rare_required: bool,
    rare_boosted: bool,
    favored: Option<Category>,
}

#[derive(Debug, Clone)]
pub struct StrategicWheel<R = ChaCha8Rng> {
    config: StrategicConfig,
    current_round: u32,
    rare_count: u32,
    rare_target: u32,
    history: Vec<Category>,
    rng: R,
}

impl StrategicWheel<ChaCha8Rng> {
    /// Build from config, seeding from `config.seed` or OS entropy.
    pub fn new(config: StrategicConfig) -> WheelResult<Self> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Default 15-round campaign with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        let config = StrategicConfig {
            seed: Some(seed),
            ..StrategicConfig::default()
        };
        Self::fresh(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> StrategicWheel<R> {
    pub fn with_rng(config: StrategicConfig, rng: R) -> WheelResult<Self> {
        config.validate()?;
        Ok(Self::fresh(config, rng))
    }

    fn fresh(config: StrategicConfig, rng: R) -> Self {
        Self {
            rare_target: rare_target(config.total_rounds),
            config,
            current_round: 0,
            rare_count: 0,
            history: Vec::new(),
            rng,
        }
    }

    pub fn config(&self) -> &StrategicConfig {
        &self.config
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn is_finished(&self) -> bool {
        self.current_round >= self.config.total_rounds
    }

    pub fn history(&self) -> &[Category] {
        &self.history
    }

    /// Restart with a new campaign length.
    pub fn reset(&mut self, total_rounds: u32) {
        self.config.total_rounds = total_rounds;
        self.rare_target = rare_target(total_rounds);
        self.current_round = 0;
        self.rare_count = 0;
        self.history.clear();
    }

    /// Preview the distribution the next spin would use.
    pub fn next_probabilities(&self) -> WheelResult<Probabilities> {
        self.ensure_running()?;
        Ok(self.plan().probabilities)
    }

    pub fn spin(&mut self) -> WheelResult<StrategicSpin> {
        self.ensure_running()?;
        let plan = self.plan();
        let random: f64 = self.rng.gen();
        let category = sampling::sample(&plan.probabilities, random);

        let reason = if plan.rare_required {
            SpinReason::RareRequired
        } else if category == RARE_CATEGORY && plan.rare_boosted {
            SpinReason::RareBoosted
        } else if plan.favored == Some(category) {
            SpinReason::Rebalanced
        } else {
            SpinReason::Weighted
        };
        let round = self.record(category);
        log::debug!("strategic round {round}: {category} ({reason:?})");
        Ok(StrategicSpin {
            category,
            reason,
            round,
            probabilities: Some(plan.probabilities),
            random: Some(random),
            forced: false,
        })
    }

    /// Record `category` without applying any rule. Still consumes a round.
    pub fn force_color(&mut self, category: Category) -> WheelResult<StrategicSpin> {
        self.ensure_running()?;
        let round = self.record(category);
        log::debug!("strategic round {round}: forced {category}");
        Ok(StrategicSpin {
            category,
            reason: SpinReason::Manual,
            round,
            probabilities: None,
            random: None,
            forced: true,
        })
    }

    pub fn force_color_named(&mut self, name: &str) -> WheelResult<StrategicSpin> {
        let category = name.parse::<Category>()?;
        self.force_color(category)
    }

    pub fn get_game_stats(&self) -> GameStats {
        GameStats {
            current_round: self.current_round,
            total_rounds: self.config.total_rounds,
            remaining_rounds: self.remaining_rounds(),
            rare_count: self.rare_count,
            rare_target: self.rare_target,
            rare_deficit: self.rare_target.saturating_sub(self.rare_count),
            color_counts: Category::ALL
                .iter()
                .map(|&c| (c, self.history.iter().filter(|&&h| h == c).count()))
                .collect(),
            history: self.history.clone(),
        }
    }

    fn remaining_rounds(&self) -> u32 {
        self.config.total_rounds.saturating_sub(self.current_round)
    }

    fn ensure_running(&self) -> WheelResult<()> {
        if self.is_finished() {
            Err(WheelError::CampaignFinished(self.config.total_rounds))
        } else {
            Ok(())
        }
    }

    fn record(&mut self, category: Category) -> u32 {
        self.current_round += 1;
        if category == RARE_CATEGORY {
            self.rare_count += 1;
        }
        self.history.push(category);
        self.current_round
    }

    fn plan(&self) -> Plan {
        let last = self.history.last().copied();
        let remaining = self.remaining_rounds();
        let deficit = self.rare_target.saturating_sub(self.rare_count);
        let last_was_rare = last == Some(RARE_CATEGORY);

        // Rule 1, hard half: out of slack, so the rare category must come now.
        if deficit > 0 && !last_was_rare && deficit >= rare_capacity(remaining, false) {
            let probabilities = Category::ALL
                .iter()
                .map(|&c| (c, if c == RARE_CATEGORY { 1.0 } else { 0.0 }))
                .collect();
            return Plan {
                probabilities,
                rare_required: true,
                rare_boosted: false,
                favored: None,
            };
        }

        let mut weights: Probabilities = Category::ALL
            .iter()
            .map(|&c| {
                let base = self.config.base_probabilities.get(&c).copied().unwrap_or(0.0);
                (c, base.max(0.0))
            })
            .collect();

        // Rule 1, soft half.
        let mut rare_boosted = false;
        if deficit == 0 {
            weights.insert(RARE_CATEGORY, 0.0);
        } else {
            let due = f64::from(self.rare_target) * f64::from(self.current_round + 1)
                / f64::from(self.config.total_rounds);
            let behind = due - f64::from(self.rare_count);
            if behind > 0.0 {
                if let Some(w) = weights.get_mut(&RARE_CATEGORY) {
                    *w += self.config.rare_boost * behind;
                    rare_boosted = true;
                }
            }
        }

        // Rule 2.
        if let Some(prev) = last.filter(|c| NO_REPEAT.contains(c)) {
            weights.insert(prev, 0.0);
        }

        // Rule 3.
        let favored = self.rebalance(&mut weights);

        // Rule 4.
        if let Some(prev) = last.filter(|c| !NO_REPEAT.contains(c)) {
            self.penalize_repeat(&mut weights, prev);
        }

        let probabilities = sampling::project(
            &weights,
            self.config.min_probability,
            self.config.max_probability,
            true,
        );
        Plan {
            probabilities,
            rare_required: false,
            rare_boosted,
            favored,
        }
    }

    /// Move weight from the workhorse that leads the trailing window by two
    /// or more to the other one. Returns the favored category.
    fn rebalance(&self, weights: &mut Probabilities) -> Option<Category> {
        let start = self.history.len().saturating_sub(self.config.balance_window);
        let window = &self.history[start..];
        let (a, b) = WORKHORSES;
        let count = |c: Category| window.iter().filter(|&&h| h == c).count();
        let (count_a, count_b) = (count(a), count(b));
        if count_a.abs_diff(count_b) < 2 {
            return None;
        }
        let (leader, trailer) = if count_a > count_b { (a, b) } else { (b, a) };
        let shift = weights.get(&leader).copied().unwrap_or(0.0) * self.config.balance_shift;
        *weights.entry(leader).or_insert(0.0) -= shift;
        *weights.entry(trailer).or_insert(0.0) += shift;
        Some(trailer)
    }

    fn penalize_repeat(&self, weights: &mut Probabilities, prev: Category) {
        let current = weights.get(&prev).copied().unwrap_or(0.0);
        let removed = current * self.config.repeat_penalty;
        let others: f64 = weights
            .iter()
            .filter(|(&c, &w)| c != prev && w > 0.0)
            .map(|(_, w)| w)
            .sum();
        if removed <= 0.0 || others <= 0.0 {
            return;
        }
        for (&c, w) in weights.iter_mut() {
            if c == prev {
                *w -= removed;
            } else if *w > 0.0 {
                *w += removed * *w / others;
            }
        }
    }
}
