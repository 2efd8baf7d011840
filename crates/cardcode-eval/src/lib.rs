//! CardCode tree-walking evaluator.
//!
//! Executes parsed instruction trees against a small variable store and
//! keeps an append-only audit log of every action.

mod audit;
mod env;
mod error;
mod evaluator;
mod outcome;

pub use audit::{LogEntry, LogKind};
pub use env::{VariableStore, Variables, INITIAL_VARIABLE};
pub use error::{EvalResult, RuntimeError};
pub use evaluator::{Evaluator, LOOP_VARIABLE, MAX_WHILE_ITERATIONS};
pub use outcome::{ExecutionOutcome, ExecutionReport, Flow, PrintValue, StateSnapshot};
