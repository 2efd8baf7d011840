//! Variable store for the CardCode evaluator.

use crate::error::{EvalResult, RuntimeError};
use cardcode_types::clamp_value;
use std::collections::BTreeMap;

/// A copy of the store: name → value, `None` meaning uninitialized.
pub type Variables = BTreeMap<String, Option<i64>>;

/// The variable every fresh game starts with, uninitialized.
pub const INITIAL_VARIABLE: &str = "global_1";

/// Flat variable store.
///
/// Names are not declared up front: any identifier may be written. Every
/// write is clamped to the representable range. `None` (uninitialized) is
/// distinct from `Some(0)`; a name that was never written reads the same
/// as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableStore {
    bindings: Variables,
}

impl VariableStore {
    /// Create a store holding only an uninitialized [`INITIAL_VARIABLE`].
    pub fn new() -> Self {
        let mut bindings = BTreeMap::new();
        bindings.insert(INITIAL_VARIABLE.to_string(), None);
        Self { bindings }
    }

    /// Look up a variable's value. Unknown and uninitialized both give `None`.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.bindings.get(name).copied().flatten()
    }

    /// Read a variable that must be initialized.
    pub fn read(&self, name: &str) -> EvalResult<i64> {
        self.get(name)
            .ok_or_else(|| RuntimeError::UninitializedVariable(name.to_string()))
    }

    /// The raw binding: `None` if the name was never written.
    pub fn binding(&self, name: &str) -> Option<Option<i64>> {
        self.bindings.get(name).copied()
    }

    /// Write a variable, clamping the value. Returns the stored value.
    pub fn set(&mut self, name: &str, value: Option<i64>) -> Option<i64> {
        let stored = value.map(clamp_value);
        self.bindings.insert(name.to_string(), stored);
        stored
    }

    /// Put back a binding captured with [`VariableStore::binding`].
    pub fn restore(&mut self, name: &str, prior: Option<Option<i64>>) {
        match prior {
            Some(value) => {
                self.bindings.insert(name.to_string(), value);
            }
            None => {
                self.bindings.remove(name);
            }
        }
    }

    /// Copy of all bindings.
    pub fn snapshot(&self) -> Variables {
        self.bindings.clone()
    }

    /// Replace every binding, clamping values.
    pub fn replace(&mut self, variables: Variables) {
        self.bindings = variables
            .into_iter()
            .map(|(name, value)| (name, value.map(clamp_value)))
            .collect();
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}
