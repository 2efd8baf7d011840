//! CardCode color wheel.
//!
//! [`AdaptiveWheel`] rebalances a weighted draw against its recent history.
//! [`StrategicWheel`] runs a fixed-length campaign with hard fairness rules
//! on top of the same bounded sampling primitive.

mod adaptive;
mod config;
mod error;
pub mod sampling;
mod strategic;

pub use adaptive::{AdaptiveWheel, ForcedSpin, SpinResult, WheelStats};
pub use config::{StrategicConfig, WheelConfig};
pub use error::{WheelError, WheelResult};
pub use sampling::Probabilities;
pub use strategic::{rare_target, GameStats, SpinReason, StrategicSpin, StrategicWheel, RARE_CATEGORY};
