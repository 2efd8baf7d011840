//! Evaluator tests: statements, control flow, safety limits, and state export.
//!
//! Commands are built from card sequences through the real parser so each
//! test exercises the path the UI takes.

use cardcode_eval::{
    Evaluator, ExecutionReport, Flow, LogKind, PrintValue, RuntimeError, Variables,
    MAX_WHILE_ITERATIONS,
};
use cardcode_parser::Parser;
use cardcode_types::ast::InstructionTree;
use cardcode_types::{Card, CardType};
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

use CardType::{
    Assign as A, Compare as C, Conditional as If, For as F, Loop as L, Number as N,
    Operator as O, Print as P, Varref as V,
};

/// Parse a card sequence at level 4.
fn tree(spec: &[(CardType, &str)]) -> InstructionTree {
    let cards: Vec<Card> = spec.iter().map(|(t, v)| Card::of(*t, *v)).collect();
    match Parser::new(4).parse(&cards) {
        Ok(parsed) => parsed.tree,
        Err(e) => panic!("unexpected parse error: {e}"),
    }
}

fn vars(pairs: &[(&str, Option<i64>)]) -> Variables {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

fn evaluator_with(pairs: &[(&str, Option<i64>)]) -> Evaluator {
    let mut ev = Evaluator::new();
    ev.set_variables(vars(pairs));
    ev
}

// ─────────────────────────────────────────────────────────────────────
// Simple statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_assignment_reports_updated_variables() {
    let mut ev = Evaluator::new();
    let report = ev.run(&tree(&[(A, "x ="), (N, "5")]), "group-1");
    assert!(report.success);
    assert_eq!(report.updated_variables, Some(vars(&[("x", Some(5))])));
    assert_eq!(ev.get("x"), Some(5));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["updatedVariables"]["x"], 5);
}

#[test]
fn test_expression_reads_left_variable() {
    let mut ev = evaluator_with(&[("y", Some(7))]);
    let out = ev
        .execute(&tree(&[(A, "x ="), (V, "y"), (O, "*"), (N, "3")]), "g")
        .unwrap();
    assert_eq!(out.updated_variables, vars(&[("x", Some(21))]));
    assert_eq!(ev.get("y"), Some(7));
}

#[test]
fn test_expression_uninitialized_left() {
    let mut ev = Evaluator::new();
    let err = ev
        .execute(&tree(&[(A, "x ="), (V, "global_1"), (O, "+"), (N, "1")]), "g")
        .unwrap_err();
    assert_eq!(err, RuntimeError::UninitializedVariable("global_1".into()));
    assert_eq!(ev.get("x"), None);
}

#[test]
fn test_division_by_zero_leaves_target_unchanged() {
    let mut ev = evaluator_with(&[("x", Some(9)), ("y", Some(4))]);
    let report = ev.run(&tree(&[(A, "x ="), (V, "y"), (O, "/"), (N, "0")]), "g");
    assert!(!report.success);
    assert_eq!(report.error.as_deref(), Some("division by zero"));
    assert_eq!(ev.get("x"), Some(9));
}

#[test]
fn test_print_value() {
    let mut ev = evaluator_with(&[("score", Some(12))]);
    let report = ev.run(&tree(&[(P, "print")]), "g");
    assert_eq!(
        report.print_value,
        Some(PrintValue {
            variable: "score".into(),
            value: 12
        })
    );
    assert!(report.updated_variables.is_none());
}

#[test]
fn test_print_uninitialized_fails() {
    let mut ev = Evaluator::new();
    let report = ev.run(&tree(&[(P, "print(global_1)")]), "g");
    assert!(!report.success);
    assert_eq!(report.code, Some("uninitialized_variable"));
}

// ─────────────────────────────────────────────────────────────────────
// If
// ─────────────────────────────────────────────────────────────────────

fn if_else_tree() -> InstructionTree {
    tree(&[
        (If, "if"),
        (V, "global_1"),
        (C, "<"),
        (N, "5"),
        (If, "then"),
        (A, "global_1 ="),
        (N, "1"),
        (If, "else"),
        (A, "global_1 ="),
        (N, "2"),
    ])
}

#[test]
fn test_if_uninitialized_condition_leaves_store_unchanged() {
    let mut ev = Evaluator::new();
    let before = ev.get_variables();
    let err = ev.execute(&if_else_tree(), "g").unwrap_err();
    assert_eq!(err, RuntimeError::UninitializedVariable("global_1".into()));
    assert_eq!(ev.get_variables(), before);
}

#[test]
fn test_if_takes_then_branch() {
    let mut ev = evaluator_with(&[("global_1", Some(3))]);
    let out = ev.execute(&if_else_tree(), "g").unwrap();
    assert_eq!(ev.get("global_1"), Some(1));
    assert_eq!(
        out.flow,
        Flow::Branch {
            condition_met: true,
            executed: true
        }
    );
}

#[test]
fn test_if_takes_else_branch() {
    let mut ev = evaluator_with(&[("global_1", Some(8))]);
    ev.execute(&if_else_tree(), "g").unwrap();
    assert_eq!(ev.get("global_1"), Some(2));
}

#[test]
fn test_if_without_else_does_nothing_when_false() {
    let mut ev = evaluator_with(&[("x", Some(8))]);
    let t = tree(&[
        (If, "if"),
        (V, "x"),
        (C, "=="),
        (N, "0"),
        (If, "then"),
        (A, "x ="),
        (N, "1"),
    ]);
    let out = ev.execute(&t, "g").unwrap();
    assert_eq!(ev.get("x"), Some(8));
    assert!(out.updated_variables.is_empty());
    assert_eq!(
        out.flow,
        Flow::Branch {
            condition_met: false,
            executed: false
        }
    );
}

#[test]
fn test_if_verdict_logged_after_branch() {
    let mut ev = evaluator_with(&[("global_1", Some(3))]);
    ev.execute(&if_else_tree(), "g").unwrap();
    let log = ev.get_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].action_text, "global_1 = 1");
    assert_eq!(log[1].action_text, "if global_1 < 5 then ...");
    assert_eq!(log[1].result_text, "condition met");
}

// ─────────────────────────────────────────────────────────────────────
// Loops
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_while_counts_up() {
    let mut ev = evaluator_with(&[("x", Some(0))]);
    let t = tree(&[
        (L, "while"),
        (V, "x"),
        (C, "<"),
        (N, "4"),
        (L, "do"),
        (A, "x ="),
        (V, "x"),
        (O, "+"),
        (N, "1"),
        (L, "end"),
    ]);
    let report = ev.run(&t, "g");
    assert!(report.success);
    assert_eq!(report.iterations, Some(4));
    assert_eq!(report.max_reached, Some(false));
    assert_eq!(ev.get("x"), Some(4));
}

#[test]
fn test_while_never_false_hits_cap() {
    let mut ev = evaluator_with(&[("x", Some(1))]);
    let t = tree(&[
        (L, "while"),
        (V, "x"),
        (C, ">"),
        (N, "0"),
        (L, "do"),
        (A, "x ="),
        (V, "x"),
        (O, "+"),
        (N, "1"),
        (L, "end"),
    ]);
    let report = ev.run(&t, "g");
    assert!(report.success);
    assert_eq!(report.iterations, Some(MAX_WHILE_ITERATIONS));
    assert_eq!(report.max_reached, Some(true));
    assert_eq!(ev.get("x"), Some(51));

    let log = ev.get_log();
    let warnings: Vec<_> = log.iter().filter(|e| e.kind == LogKind::Warning).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].action_text, "WARNING");
    assert_eq!(log.last().map(|e| e.kind), Some(LogKind::Warning));
}

#[test]
fn test_while_ending_exactly_at_cap_is_not_capped() {
    let mut ev = evaluator_with(&[("x", Some(0))]);
    let t = tree(&[
        (L, "while"),
        (V, "x"),
        (C, "<"),
        (N, "50"),
        (L, "do"),
        (A, "x ="),
        (V, "x"),
        (O, "+"),
        (N, "1"),
        (L, "end"),
    ]);
    let report = ev.run(&t, "g");
    assert!(report.success);
    assert_eq!(report.iterations, Some(MAX_WHILE_ITERATIONS));
    assert_eq!(report.max_reached, Some(false));
    assert_eq!(ev.get("x"), Some(50));
    assert!(ev.get_log().iter().all(|e| e.kind != LogKind::Warning));
}

#[test]
fn test_while_false_at_start_runs_zero_times() {
    let mut ev = evaluator_with(&[("x", Some(10))]);
    let t = tree(&[
        (L, "while"),
        (V, "x"),
        (C, "<"),
        (N, "0"),
        (L, "do"),
        (P, "print(x)"),
        (L, "end"),
    ]);
    let out = ev.execute(&t, "g").unwrap();
    assert_eq!(
        out.flow,
        Flow::Loop {
            iterations: 0,
            max_reached: false
        }
    );
    assert!(out.printed.is_empty());
}

fn for_print_i(count: u32) -> InstructionTree {
    let header = format!("for i = 1 to {count}");
    tree(&[
        (F, header.as_str()),
        (F, "do"),
        (P, "print(i)"),
        (F, "end"),
    ])
}

#[test]
fn test_for_observes_counter_and_restores_null() {
    let mut ev = evaluator_with(&[("i", None)]);
    let out = ev.execute(&for_print_i(5), "g").unwrap();
    let seen: Vec<i64> = out.printed.iter().map(|p| p.value).collect();
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    assert_eq!(ev.get_variables().get("i"), Some(&None));
    assert!(!out.updated_variables.contains_key("i"));
}

#[test]
fn test_for_restores_absent_counter() {
    let mut ev = Evaluator::new();
    ev.execute(&for_print_i(3), "g").unwrap();
    assert!(!ev.get_variables().contains_key("i"));
}

#[test]
fn test_for_restores_counter_on_error() {
    let mut ev = evaluator_with(&[("i", Some(42))]);
    let t = tree(&[
        (F, "for i = 1 to 3"),
        (F, "do"),
        (A, "x ="),
        (V, "i"),
        (O, "/"),
        (N, "0"),
        (F, "end"),
    ]);
    assert_eq!(ev.execute(&t, "g"), Err(RuntimeError::DivisionByZero));
    assert_eq!(ev.get("i"), Some(42));
}

#[test]
fn test_for_accumulates() {
    let mut ev = evaluator_with(&[("x", Some(1))]);
    let t = tree(&[
        (F, "for i = 1 to 3"),
        (F, "do"),
        (A, "x ="),
        (V, "x"),
        (O, "*"),
        (N, "2"),
        (F, "end"),
    ]);
    let out = ev.execute(&t, "g").unwrap();
    assert_eq!(out.updated_variables, vars(&[("x", Some(8))]));
}

// ─────────────────────────────────────────────────────────────────────
// Log, state, and reports
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_error_appends_error_entry() {
    let mut ev = Evaluator::new();
    ev.run(&tree(&[(P, "print(global_1)")]), "group-2");
    let log = ev.get_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].kind, LogKind::Error);
    assert_eq!(log[0].actor_id, "group-2");
    assert_eq!(log[0].action_text, "print(global_1)");
    assert_eq!(
        log[0].result_text,
        "Error: variable 'global_1' is not initialized"
    );
}

#[test]
fn test_log_action_appends_info() {
    let mut ev = Evaluator::new();
    ev.log_action("teacher", "color forced", "color: red");
    let log = ev.get_log();
    assert_eq!(log[0].kind, LogKind::Info);
    assert_eq!(log[0].result_text, "color: red");
}

#[test]
fn test_accessors_return_copies() {
    let mut ev = evaluator_with(&[("x", Some(1))]);
    let mut copy = ev.get_variables();
    copy.insert("x".into(), Some(99));
    assert_eq!(ev.get("x"), Some(1));

    ev.log_action("system", "a", "b");
    let mut log = ev.get_log();
    log.clear();
    assert_eq!(ev.get_log().len(), 1);
}

#[test]
fn test_set_variables_merges_and_clamps() {
    let mut ev = Evaluator::new();
    ev.set_variables(vars(&[("x", Some(2_000_000_000))]));
    let all = ev.get_variables();
    assert_eq!(all.get("x"), Some(&Some(1_000_000_000)));
    assert_eq!(all.get("global_1"), Some(&None));
}

#[test]
fn test_export_import_round_trip_through_json() {
    let mut ev = evaluator_with(&[("x", Some(3))]);
    ev.execute(&tree(&[(A, "y ="), (N, "4")]), "g").unwrap();
    let json = serde_json::to_string(&ev.export_state()).unwrap();

    let mut restored = Evaluator::new();
    restored.import_state(serde_json::from_str(&json).unwrap());
    assert_eq!(restored.get_variables(), ev.get_variables());
    assert_eq!(restored.get_log(), ev.get_log());
}

#[test]
fn test_reset_restores_initial_store() {
    let mut ev = evaluator_with(&[("x", Some(3))]);
    ev.log_action("system", "a", "b");
    ev.reset();
    assert_eq!(ev.get_variables(), vars(&[("global_1", None)]));
    assert!(ev.get_log().is_empty());
}

#[test]
fn test_report_failure_shape() {
    let report = ExecutionReport::from(Err(RuntimeError::DivisionByZero));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["success"], false);
    assert!(json.get("result").is_none());
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_determinism_100_iterations() {
    let t = for_print_i(4);
    let first = evaluator_with(&[("x", Some(0))]).execute(&t, "g").unwrap();
    for _ in 0..100 {
        let again = evaluator_with(&[("x", Some(0))]).execute(&t, "g").unwrap();
        assert_eq!(again, first);
    }
}

proptest! {
    /// Property: `[assign, '=', number]` stores exactly the clamped literal.
    #[test]
    fn prop_assignment_executes_to_clamped_value(n in any::<i64>()) {
        let text = n.to_string();
        let t = tree(&[(A, "v"), (O, "="), (N, text.as_str())]);
        let mut ev = Evaluator::new();
        let out = ev.execute(&t, "g").unwrap();
        let expected = n.clamp(-1_000_000_000, 1_000_000_000);
        prop_assert_eq!(ev.get("v"), Some(expected));
        prop_assert_eq!(out.updated_variables.get("v"), Some(&Some(expected)));
    }

    /// Property: every stored value stays in range whatever the arithmetic.
    #[test]
    fn prop_expression_stays_in_range(left in -1_000_000_000i64..=1_000_000_000, right in any::<i32>(), op in 0usize..4) {
        let symbol = ["+", "-", "*", "/"][op];
        let right_text = right.to_string();
        let t = tree(&[(A, "x ="), (V, "y"), (O, symbol), (N, right_text.as_str())]);
        let mut ev = evaluator_with(&[("y", Some(left))]);
        if ev.execute(&t, "g").is_ok() {
            let x = ev.get("x").unwrap();
            prop_assert!((-1_000_000_000..=1_000_000_000).contains(&x));
        }
    }
}
