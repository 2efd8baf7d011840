//! Tree-walking evaluator for CardCode instruction trees.

use crate::audit::{LogEntry, LogKind};
use crate::env::{VariableStore, Variables};
use crate::error::{EvalResult, RuntimeError};
use crate::outcome::{ExecutionOutcome, ExecutionReport, Flow, PrintValue, StateSnapshot};
use cardcode_types::ast::*;
use cardcode_types::clamp_value;
use chrono::Utc;
use std::collections::BTreeSet;

/// Iteration cap for `while` loops.
pub const MAX_WHILE_ITERATIONS: u32 = 50;

/// The counter a `for` loop binds.
pub const LOOP_VARIABLE: &str = "i";

/// Executes instruction trees against its own variable store, appending to
/// its own audit log.
#[derive(Debug, Clone)]
pub struct Evaluator {
    store: VariableStore,
    log: Vec<LogEntry>,
    max_iterations: u32,
}

/// Writes and prints accumulated while one command runs.
#[derive(Debug, Default)]
struct Trace {
    written: BTreeSet<String>,
    printed: Vec<PrintValue>,
}

impl Evaluator {
    /// Create an evaluator with a fresh store and an empty log.
    pub fn new() -> Self {
        Self::with_max_iterations(MAX_WHILE_ITERATIONS)
    }

    /// Create an evaluator with a custom `while` cap.
    pub fn with_max_iterations(max_iterations: u32) -> Self {
        Self {
            store: VariableStore::new(),
            log: Vec::new(),
            max_iterations,
        }
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Back to `{global_1: null}` with an empty log.
    pub fn reset(&mut self) {
        self.store = VariableStore::new();
        self.log.clear();
    }

    // ── Store and log accessors ───────────────────────────────────────────

    /// Merge facilitator overrides into the store. Values are clamped.
    pub fn set_variables(&mut self, variables: Variables) {
        for (name, value) in variables {
            self.store.set(&name, value);
        }
    }

    pub fn get_variables(&self) -> Variables {
        self.store.snapshot()
    }

    /// A single variable's value; `None` when unset or uninitialized.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.store.get(name)
    }

    pub fn get_log(&self) -> Vec<LogEntry> {
        self.log.clone()
    }

    /// Append an info entry on behalf of a collaborator.
    pub fn log_action(&mut self, actor: &str, action: &str, result: &str) {
        self.push_entry(actor, action.to_string(), result.to_string(), LogKind::Info);
    }

    pub fn export_state(&self) -> StateSnapshot {
        StateSnapshot {
            variables: self.store.snapshot(),
            log: self.log.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Replace both store and log.
    pub fn import_state(&mut self, snapshot: StateSnapshot) {
        self.store.replace(snapshot.variables);
        self.log = snapshot.log;
    }

    fn push_entry(&mut self, actor: &str, action_text: String, result_text: String, kind: LogKind) {
        self.log.push(LogEntry {
            timestamp: Utc::now(),
            actor_id: actor.to_string(),
            action_text,
            result_text,
            variables_snapshot: self.store.snapshot(),
            kind,
        });
    }

    // ══════════════════════════════════════════════════════════════════════
    // Execution
    // ══════════════════════════════════════════════════════════════════════

    /// Execute one command.
    ///
    /// A runtime error aborts the rest of the command; writes made before the
    /// failure stay applied. The failure is logged as an error entry.
    pub fn execute(
        &mut self,
        tree: &InstructionTree,
        actor: &str,
    ) -> EvalResult<ExecutionOutcome> {
        let mut trace = Trace::default();
        match self.exec_tree(tree, actor, &mut trace) {
            Ok((summary, flow)) => {
                let updated_variables = trace
                    .written
                    .iter()
                    .map(|name| (name.clone(), self.store.get(name)))
                    .collect();
                Ok(ExecutionOutcome {
                    summary,
                    updated_variables,
                    printed: trace.printed,
                    flow,
                })
            }
            Err(e) => {
                log::warn!("command `{tree}` failed for {actor}: {e}");
                self.push_entry(actor, tree.to_string(), format!("Error: {e}"), LogKind::Error);
                Err(e)
            }
        }
    }

    /// [`Evaluator::execute`] folded into the tagged report.
    pub fn run(&mut self, tree: &InstructionTree, actor: &str) -> ExecutionReport {
        ExecutionReport::from(self.execute(tree, actor))
    }

    fn exec_tree(
        &mut self,
        tree: &InstructionTree,
        actor: &str,
        trace: &mut Trace,
    ) -> EvalResult<(String, Flow)> {
        match tree {
            InstructionTree::Assignment(a) => self
                .exec_assignment(a, actor, trace)
                .map(|s| (s, Flow::Statement)),
            InstructionTree::Expression(e) => self
                .exec_expression(e, actor, trace)
                .map(|s| (s, Flow::Statement)),
            InstructionTree::Print(p) => {
                self.exec_print(p, actor, trace).map(|s| (s, Flow::Statement))
            }
            InstructionTree::If(stmt) => self.exec_if(stmt, actor, trace),
            InstructionTree::While(w) => self.exec_while(w, actor, trace),
            InstructionTree::For(f) => self.exec_for(f, actor, trace),
        }
    }

    fn exec_simple(
        &mut self,
        stmt: &SimpleStatement,
        actor: &str,
        trace: &mut Trace,
    ) -> EvalResult<String> {
        match stmt {
            SimpleStatement::Assignment(a) => self.exec_assignment(a, actor, trace),
            SimpleStatement::Expression(e) => self.exec_expression(e, actor, trace),
            SimpleStatement::Print(p) => self.exec_print(p, actor, trace),
        }
    }

    // ── Simple statements ─────────────────────────────────────────────────

    fn exec_assignment(
        &mut self,
        a: &Assignment,
        actor: &str,
        trace: &mut Trace,
    ) -> EvalResult<String> {
        let value = clamp_value(a.literal);
        if value != a.literal {
            log::debug!("clamped {} to {value} for '{}'", a.literal, a.variable);
        }
        self.store.set(&a.variable, Some(value));
        trace.written.insert(a.variable.clone());
        self.push_entry(
            actor,
            format!("{} = {}", a.variable, a.literal),
            format!("{} → {value}", a.variable),
            LogKind::Info,
        );
        Ok(format!("{} was set to {value}", a.variable))
    }

    fn exec_expression(
        &mut self,
        e: &Expression,
        actor: &str,
        trace: &mut Trace,
    ) -> EvalResult<String> {
        let left = self.store.read(&e.left_var)?;
        let right = e.right_literal;
        let raw = match e.operator {
            ArithOp::Add => left.saturating_add(right),
            ArithOp::Sub => left.saturating_sub(right),
            ArithOp::Mul => left.saturating_mul(right),
            ArithOp::Div => {
                if right == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                left / right
            }
        };
        let value = clamp_value(raw);
        if value != raw {
            log::debug!("clamped {raw} to {value} for '{}'", e.variable);
        }
        self.store.set(&e.variable, Some(value));
        trace.written.insert(e.variable.clone());

        let worked = format!("{left} {} {right} = {value}", e.operator);
        self.push_entry(actor, e.to_string(), worked.clone(), LogKind::Info);
        Ok(format!("{} = {worked}", e.variable))
    }

    fn exec_print(&mut self, p: &Print, actor: &str, trace: &mut Trace) -> EvalResult<String> {
        let value = self.store.read(&p.variable)?;
        let shown = format!("{} = {value}", p.variable);
        self.push_entry(actor, p.to_string(), shown.clone(), LogKind::Info);
        trace.printed.push(PrintValue {
            variable: p.variable.clone(),
            value,
        });
        Ok(shown)
    }

    // ── Control flow ──────────────────────────────────────────────────────

    fn condition_holds(&self, condition: &Condition) -> EvalResult<bool> {
        let left = self.store.read(&condition.variable)?;
        Ok(condition.operator.holds(left, condition.literal))
    }

    fn exec_if(
        &mut self,
        stmt: &IfStmt,
        actor: &str,
        trace: &mut Trace,
    ) -> EvalResult<(String, Flow)> {
        let condition_met = self.condition_holds(&stmt.condition)?;
        let branch = if condition_met {
            Some(&stmt.then_branch)
        } else {
            stmt.else_branch.as_ref()
        };
        if let Some(branch) = branch {
            self.exec_simple(branch, actor, trace)?;
        }

        let verdict = if condition_met {
            "condition met"
        } else {
            "condition not met"
        };
        self.push_entry(
            actor,
            format!("if {} then ...", stmt.condition),
            verdict.to_string(),
            LogKind::Info,
        );
        Ok((
            format!("if statement executed ({verdict})"),
            Flow::Branch {
                condition_met,
                executed: branch.is_some(),
            },
        ))
    }

    fn exec_while(
        &mut self,
        w: &WhileLoop,
        actor: &str,
        trace: &mut Trace,
    ) -> EvalResult<(String, Flow)> {
        let mut iterations = 0;
        let mut max_reached = false;
        // The cap only trips when the condition still holds after the last run.
        loop {
            if !self.condition_holds(&w.condition)? {
                break;
            }
            if iterations == self.max_iterations {
                max_reached = true;
                break;
            }
            self.exec_simple(&w.body, actor, trace)?;
            iterations += 1;
        }

        let ran = format!("{iterations} iterations");
        self.push_entry(
            actor,
            format!("while {} do ...", w.condition),
            ran.clone(),
            LogKind::Info,
        );
        if max_reached {
            log::warn!("while loop `{}` hit the {} iteration cap", w.condition, self.max_iterations);
            self.push_entry(
                actor,
                "WARNING".to_string(),
                format!("while loop stopped after {} iterations", self.max_iterations),
                LogKind::Warning,
            );
        }
        Ok((
            format!("while loop: {ran}"),
            Flow::Loop {
                iterations,
                max_reached,
            },
        ))
    }

    fn exec_for(
        &mut self,
        f: &ForLoop,
        actor: &str,
        trace: &mut Trace,
    ) -> EvalResult<(String, Flow)> {
        let prior = self.store.binding(LOOP_VARIABLE);
        let result = self.for_iterations(f, actor, trace);
        self.store.restore(LOOP_VARIABLE, prior);
        trace.written.remove(LOOP_VARIABLE);
        result?;

        let ran = format!("{} iterations", f.count);
        self.push_entry(
            actor,
            format!("for {LOOP_VARIABLE} = 1 to {} do ...", f.count),
            ran.clone(),
            LogKind::Info,
        );
        Ok((
            format!("for loop: {ran}"),
            Flow::Loop {
                iterations: f.count,
                max_reached: false,
            },
        ))
    }

    fn for_iterations(&mut self, f: &ForLoop, actor: &str, trace: &mut Trace) -> EvalResult<()> {
        for i in 1..=f.count {
            self.store.set(LOOP_VARIABLE, Some(i64::from(i)));
            self.exec_simple(&f.body, actor, trace)?;
        }
        Ok(())
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
