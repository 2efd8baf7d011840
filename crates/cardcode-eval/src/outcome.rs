//! Results of executing an instruction tree.

use crate::audit::LogEntry;
use crate::env::Variables;
use crate::error::RuntimeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A value produced by a `print` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintValue {
    pub variable: String,
    pub value: i64,
}

/// What kind of control flow a command took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Flow {
    /// A single assignment, expression or print.
    Statement,
    /// An `if`; `executed` is false when the condition failed and there was no `else`.
    #[serde(rename_all = "camelCase")]
    Branch { condition_met: bool, executed: bool },
    /// A `while` or `for`.
    #[serde(rename_all = "camelCase")]
    Loop { iterations: u32, max_reached: bool },
}

/// Successful execution of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    /// Human-readable one-line summary.
    pub summary: String,
    /// Final value of every variable the command wrote.
    pub updated_variables: Variables,
    /// Every print, in execution order.
    pub printed: Vec<PrintValue>,
    pub flow: Flow,
}

/// The tagged `{success, result?, error?, updatedVariables?, printValue?}` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_variables: Option<Variables>,
    /// The last value printed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_value: Option<PrintValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub printed: Vec<PrintValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_met: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reached: Option<bool>,
}

impl From<Result<ExecutionOutcome, RuntimeError>> for ExecutionReport {
    fn from(result: Result<ExecutionOutcome, RuntimeError>) -> Self {
        match result {
            Ok(outcome) => {
                let (condition_met, iterations, max_reached) = match outcome.flow {
                    Flow::Statement => (None, None, None),
                    Flow::Branch { condition_met, .. } => (Some(condition_met), None, None),
                    Flow::Loop {
                        iterations,
                        max_reached,
                    } => (None, Some(iterations), Some(max_reached)),
                };
                let updated_variables = if outcome.updated_variables.is_empty() {
                    None
                } else {
                    Some(outcome.updated_variables)
                };
                Self {
                    success: true,
                    result: Some(outcome.summary),
                    error: None,
                    code: None,
                    updated_variables,
                    print_value: outcome.printed.last().cloned(),
                    printed: outcome.printed,
                    condition_met,
                    iterations,
                    max_reached,
                }
            }
            Err(e) => Self {
                success: false,
                result: None,
                error: Some(e.to_string()),
                code: Some(e.code()),
                updated_variables: None,
                print_value: None,
                printed: Vec::new(),
                condition_met: None,
                iterations: None,
                max_reached: None,
            },
        }
    }
}

/// Point-in-time copy of the evaluator's store and log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub variables: Variables,
    pub log: Vec<LogEntry>,
    pub timestamp: DateTime<Utc>,
}
