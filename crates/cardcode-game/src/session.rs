//! The game session facade.

use crate::config::{check_level, GameConfig, WheelSettings};
use crate::error::ConfigError;
use crate::export::{ExportBundle, WheelSnapshot};
use cardcode_eval::{
    Evaluator, ExecutionReport, LogEntry, StateSnapshot, Variables, INITIAL_VARIABLE,
};
use cardcode_parser::{ParseReport, Parser};
use cardcode_types::ast::InstructionTree;
use cardcode_types::{Card, Category};
use cardcode_wheel::{
    AdaptiveWheel, ForcedSpin, SpinResult, StrategicSpin, StrategicWheel, WheelResult,
};
use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Actor recorded for wheel spins.
pub const SPIN_ACTOR: &str = "system";

/// Actor recorded for facilitator overrides.
pub const TEACHER_ACTOR: &str = "teacher";

/// Values [`GameSession::randomize_global`] draws from.
pub const GLOBAL_RANDOM_RANGE: RangeInclusive<i64> = 5..=15;

/// Result of submitting a card sequence.
///
/// Parse failures give `{valid: false, error, code}` and touch neither the
/// store nor the log; otherwise the command ran and `execution` holds the
/// evaluator's report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<InstructionTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionReport>,
}

/// What a spin or override produced, by wheel mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SpinOutcome {
    Adaptive(SpinResult),
    Forced(ForcedSpin),
    Strategic(StrategicSpin),
}

impl SpinOutcome {
    pub fn category(&self) -> Category {
        match self {
            SpinOutcome::Adaptive(s) => s.category,
            SpinOutcome::Forced(f) => f.category,
            SpinOutcome::Strategic(s) => s.category,
        }
    }
}

#[derive(Debug, Clone)]
enum Wheel {
    Adaptive(AdaptiveWheel),
    Strategic(StrategicWheel),
}

impl Wheel {
    fn build(settings: WheelSettings) -> WheelResult<Self> {
        Ok(match settings {
            WheelSettings::Adaptive(c) => Wheel::Adaptive(AdaptiveWheel::new(c)?),
            WheelSettings::Strategic(c) => Wheel::Strategic(StrategicWheel::new(c)?),
        })
    }

    fn snapshot(&self) -> WheelSnapshot {
        match self {
            Wheel::Adaptive(w) => WheelSnapshot::Adaptive(w.get_stats()),
            Wheel::Strategic(w) => WheelSnapshot::Strategic(w.get_game_stats()),
        }
    }
}

/// One classroom game: a parser at the current level, the evaluator that
/// owns the variables and log, and the configured wheel.
#[derive(Debug, Clone)]
pub struct GameSession {
    parser: Parser,
    evaluator: Evaluator,
    wheel: Wheel,
    /// Facilitator draws; a separate stream from the wheel's.
    rng: ChaCha8Rng,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(1);
                rng
            }
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            parser: Parser::new(config.level),
            evaluator: Evaluator::new(),
            wheel: Wheel::build(config.seeded_wheel())?,
            rng,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(GameConfig::from_json(json)?)
    }

    pub fn level(&self) -> u8 {
        self.parser.level()
    }

    pub fn set_level(&mut self, level: u8) -> Result<(), ConfigError> {
        check_level(level)?;
        self.parser.set_level(level);
        Ok(())
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Parse without executing, for live validation while cards are laid.
    pub fn check(&self, cards: &[Card]) -> ParseReport {
        ParseReport::from(self.parser.parse(cards))
    }

    /// Parse and execute a card sequence on behalf of `actor`.
    pub fn submit(&mut self, cards: &[Card], actor: &str) -> CommandReport {
        match self.parser.parse(cards) {
            Ok(parsed) => {
                let execution = self.evaluator.run(&parsed.tree, actor);
                CommandReport {
                    valid: true,
                    command: Some(parsed.command),
                    tree: Some(parsed.tree),
                    error: None,
                    code: None,
                    execution: Some(execution),
                }
            }
            Err(e) => {
                log::debug!("submission from {actor} rejected: {e}");
                CommandReport {
                    valid: false,
                    command: None,
                    tree: None,
                    error: Some(e.to_string()),
                    code: Some(e.code()),
                    execution: None,
                }
            }
        }
    }

    // ── Wheel ─────────────────────────────────────────────────────────────

    pub fn spin(&mut self) -> WheelResult<SpinOutcome> {
        let outcome = match &mut self.wheel {
            Wheel::Adaptive(w) => SpinOutcome::Adaptive(w.spin()),
            Wheel::Strategic(w) => SpinOutcome::Strategic(w.spin()?),
        };
        let result = self.describe(&outcome);
        self.evaluator.log_action(SPIN_ACTOR, "wheel spun", &result);
        log::info!("wheel spun: {result}");
        Ok(outcome)
    }

    /// Facilitator override; `name` is a category name.
    pub fn force_color(&mut self, name: &str) -> WheelResult<SpinOutcome> {
        let outcome = match &mut self.wheel {
            Wheel::Adaptive(w) => SpinOutcome::Forced(w.force_color_named(name)?),
            Wheel::Strategic(w) => SpinOutcome::Strategic(w.force_color_named(name)?),
        };
        let result = self.describe(&outcome);
        self.evaluator
            .log_action(TEACHER_ACTOR, "color forced", &result);
        log::info!("color forced: {result}");
        Ok(outcome)
    }

    fn describe(&self, outcome: &SpinOutcome) -> String {
        match outcome {
            SpinOutcome::Strategic(s) => format!("round {}: color {}", s.round, s.category),
            other => format!("color {}", other.category()),
        }
    }

    pub fn wheel_stats(&self) -> WheelSnapshot {
        self.wheel.snapshot()
    }

    // ── Variables and log ─────────────────────────────────────────────────

    /// Facilitator override of variable values, logged per variable.
    pub fn set_variables(&mut self, variables: Variables) {
        for (name, value) in variables {
            let shown = value.map_or_else(|| "null".to_string(), |v| v.to_string());
            self.evaluator
                .set_variables(Variables::from([(name.clone(), value)]));
            self.evaluator.log_action(
                TEACHER_ACTOR,
                "variable set manually",
                &format!("{name} = {shown}"),
            );
        }
    }

    /// Set `global_1` to a random value in [`GLOBAL_RANDOM_RANGE`].
    pub fn randomize_global(&mut self) -> i64 {
        let value = self.rng.gen_range(GLOBAL_RANDOM_RANGE);
        self.evaluator
            .set_variables(Variables::from([(INITIAL_VARIABLE.to_string(), Some(value))]));
        self.evaluator.log_action(
            TEACHER_ACTOR,
            "global variable randomized",
            &format!(
                "{INITIAL_VARIABLE} = {value} (random {}-{})",
                GLOBAL_RANDOM_RANGE.start(),
                GLOBAL_RANDOM_RANGE.end()
            ),
        );
        log::info!("{INITIAL_VARIABLE} randomized to {value}");
        value
    }

    pub fn variables(&self) -> Variables {
        self.evaluator.get_variables()
    }

    pub fn log(&self) -> Vec<LogEntry> {
        self.evaluator.get_log()
    }

    /// Fresh store, empty log, and a restarted wheel.
    pub fn reset(&mut self) {
        self.evaluator.reset();
        match &mut self.wheel {
            Wheel::Adaptive(w) => w.reset(),
            Wheel::Strategic(w) => {
                let rounds = w.config().total_rounds;
                w.reset(rounds);
            }
        }
    }

    // ── Export ────────────────────────────────────────────────────────────

    pub fn export_state(&self) -> ExportBundle {
        let StateSnapshot { variables, log, .. } = self.evaluator.export_state();
        ExportBundle {
            variables,
            log,
            wheel_stats: self.wheel.snapshot(),
            timestamp: Utc::now(),
        }
    }

    /// Restore variables and log from a bundle. Wheel statistics in the
    /// bundle are informational and leave the running wheel untouched.
    pub fn import_state(&mut self, bundle: ExportBundle) {
        self.evaluator.import_state(StateSnapshot {
            variables: bundle.variables,
            log: bundle.log,
            timestamp: bundle.timestamp,
        });
    }
}
