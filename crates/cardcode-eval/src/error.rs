//! Runtime error types for the CardCode evaluator.

use thiserror::Error;

/// Evaluation error. Aborts the current command only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A variable was read while still `null`.
    #[error("variable '{0}' is not initialized")]
    UninitializedVariable(String),
    /// `/` with a zero right operand.
    #[error("division by zero")]
    DivisionByZero,
}

impl RuntimeError {
    /// Stable snake_case identifier for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::UninitializedVariable(_) => "uninitialized_variable",
            RuntimeError::DivisionByZero => "division_by_zero",
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, RuntimeError>;
