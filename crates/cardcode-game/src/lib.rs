//! CardCode game session.
//!
//! ```text
//! cards → Parser → Evaluator → variable store + audit log
//! spin  → Wheel (adaptive | strategic) → audit log
//! ```
//!
//! [`GameSession`] owns one of each engine and is the only thing the UI
//! binding talks to.

mod config;
mod error;
mod export;
mod session;

pub use config::{GameConfig, WheelSettings};
pub use error::ConfigError;
pub use export::{ExportBundle, WheelSnapshot};
pub use session::{
    CommandReport, GameSession, SpinOutcome, GLOBAL_RANDOM_RANGE, SPIN_ACTOR, TEACHER_ACTOR,
};
