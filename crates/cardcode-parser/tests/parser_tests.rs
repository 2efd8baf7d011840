//! Parser tests for all four grammar levels.
//!
//! Covers: level-1 statements, if/else (level 2), while (level 3),
//! for (level 4), level gating, structural diagnostics, and determinism.

use cardcode_parser::{ParsedCommand, Parser};
use cardcode_types::ast::*;
use cardcode_types::{BranchKind, Card, CardType, Construct, Keyword, ParseError};
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Build a card sequence from `(type, value)` pairs.
fn cards(spec: &[(CardType, &str)]) -> Vec<Card> {
    spec.iter().map(|(t, v)| Card::of(*t, *v)).collect()
}

/// Parse at `level`, panicking on errors.
fn parse_ok(level: u8, spec: &[(CardType, &str)]) -> ParsedCommand {
    match Parser::new(level).parse(&cards(spec)) {
        Ok(parsed) => parsed,
        Err(e) => panic!("unexpected parse error: {e} ({})", e.code()),
    }
}

/// Parse at `level`, returning the error.
fn parse_err(level: u8, spec: &[(CardType, &str)]) -> ParseError {
    Parser::new(level)
        .parse(&cards(spec))
        .expect_err("expected a parse error")
}

use CardType::{
    Assign as A, Compare as C, Conditional as If, For as F, Loop as L, Number as N,
    Operator as O, Print as P, Varref as V,
};

fn assign(variable: &str, literal: i64) -> SimpleStatement {
    SimpleStatement::Assignment(Assignment {
        variable: variable.into(),
        literal,
    })
}

// ─────────────────────────────────────────────────────────────────────
// Level 1
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_assignment_embedded_equals() {
    let parsed = parse_ok(1, &[(A, "x ="), (N, "5")]);
    assert_eq!(parsed.tree, InstructionTree::from(assign("x", 5)));
    assert_eq!(parsed.command, "x = 5");
}

#[test]
fn test_assignment_separate_equals_card() {
    let parsed = parse_ok(1, &[(A, "x"), (O, "="), (N, "5")]);
    assert_eq!(parsed.tree, InstructionTree::from(assign("x", 5)));
}

#[test]
fn test_expression() {
    let parsed = parse_ok(1, &[(A, "x ="), (V, "y"), (O, "-"), (N, "3")]);
    assert_eq!(
        parsed.tree,
        InstructionTree::Expression(Expression {
            variable: "x".into(),
            left_var: "y".into(),
            operator: ArithOp::Sub,
            right_literal: 3,
        })
    );
}

#[test]
fn test_print() {
    let parsed = parse_ok(1, &[(P, "print(global_1)")]);
    assert_eq!(
        parsed.tree,
        InstructionTree::Print(Print {
            variable: "global_1".into()
        })
    );
}

#[test]
fn test_missing_equals() {
    let err = parse_err(1, &[(A, "x"), (N, "5")]);
    assert_eq!(err.to_string(), "expected '=' after variable");
}

#[test]
fn test_invalid_expression_format() {
    let err = parse_err(1, &[(A, "x ="), (N, "1"), (O, "+"), (N, "3")]);
    assert_eq!(err.to_string(), "invalid expression format");
}

#[test]
fn test_must_start_with_assignment() {
    let err = parse_err(1, &[(N, "5"), (O, "="), (N, "5")]);
    assert_eq!(err.to_string(), "command must start with an assignment");
}

#[test]
fn test_print_alone() {
    let err = parse_err(1, &[(P, "print(x)"), (N, "5")]);
    assert_eq!(err.code(), "invalid_structure");
}

#[test]
fn test_empty_command() {
    assert_eq!(Parser::new(1).parse(&[]), Err(ParseError::EmptyCommand));
}

#[test]
fn test_oversized_literal_is_clamped() {
    let parsed = parse_ok(1, &[(A, "x ="), (N, "-7000000000")]);
    assert_eq!(parsed.tree, InstructionTree::from(assign("x", -1_000_000_000)));
}

// ─────────────────────────────────────────────────────────────────────
// Level 2: if / else
// ─────────────────────────────────────────────────────────────────────

fn if_else_cards() -> Vec<(CardType, &'static str)> {
    vec![
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
    ]
}

#[test]
fn test_if_else() {
    let parsed = parse_ok(2, &if_else_cards());
    assert_eq!(
        parsed.tree,
        InstructionTree::If(IfStmt {
            condition: Condition {
                variable: "global_1".into(),
                operator: CompareOp::Less,
                literal: 5,
            },
            then_branch: assign("global_1", 1),
            else_branch: Some(assign("global_1", 2)),
        })
    );
    assert_eq!(
        parsed.command,
        "if global_1 < 5 then global_1 = 1 else global_1 = 2"
    );
}

#[test]
fn test_if_without_else() {
    let parsed = parse_ok(
        2,
        &[(If, "if"), (V, "x"), (C, "=="), (N, "0"), (If, "then"), (P, "print(x)")],
    );
    match parsed.tree {
        InstructionTree::If(stmt) => assert!(stmt.else_branch.is_none()),
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_if_missing_then() {
    let err = parse_err(2, &[(If, "if"), (V, "x"), (C, "<"), (N, "5"), (A, "x ="), (N, "1")]);
    assert_eq!(err, ParseError::MissingThen);
}

#[test]
fn test_if_condition_wrong_count() {
    let err = parse_err(2, &[(If, "if"), (V, "x"), (C, "<"), (If, "then"), (P, "print")]);
    assert_eq!(
        err,
        ParseError::InvalidCondition("expected 3 cards, found 2".into())
    );
}

#[test]
fn test_if_condition_wrong_types() {
    let err = parse_err(
        2,
        &[(If, "if"), (N, "1"), (C, "<"), (N, "5"), (If, "then"), (P, "print")],
    );
    assert_eq!(err.code(), "invalid_condition");
}

#[test]
fn test_if_bad_else_branch() {
    let err = parse_err(
        2,
        &[
            (If, "if"),
            (V, "x"),
            (C, ">"),
            (N, "5"),
            (If, "then"),
            (P, "print(x)"),
            (If, "else"),
            (A, "x"),
            (N, "2"),
        ],
    );
    assert_eq!(
        err,
        ParseError::structure("expected '=' after variable").in_branch(BranchKind::Else)
    );
    assert_eq!(
        err.to_string(),
        "invalid else branch: expected '=' after variable"
    );
}

#[test]
fn test_if_rejects_nested_control() {
    let err = parse_err(
        4,
        &[
            (If, "if"),
            (V, "x"),
            (C, ">"),
            (N, "5"),
            (If, "then"),
            (L, "while"),
            (V, "x"),
            (C, ">"),
            (N, "0"),
            (L, "do"),
            (A, "x ="),
            (N, "0"),
            (L, "end"),
        ],
    );
    assert_eq!(
        err.to_string(),
        "invalid then branch: nested control structures are not allowed"
    );
}

#[test]
fn test_if_rejected_below_level_two() {
    let err = parse_err(1, &if_else_cards());
    assert_eq!(
        err,
        ParseError::LevelTooLow {
            construct: Construct::If,
            level: 1
        }
    );
}

#[test]
fn test_level_two_still_accepts_level_one() {
    let parsed = parse_ok(2, &[(A, "x ="), (N, "5")]);
    assert_eq!(parsed.tree, InstructionTree::from(assign("x", 5)));
}

// ─────────────────────────────────────────────────────────────────────
// Level 3: while
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_while_loop() {
    let parsed = parse_ok(
        3,
        &[
            (L, "while"),
            (V, "x"),
            (C, "<"),
            (N, "10"),
            (L, "do"),
            (A, "x ="),
            (V, "x"),
            (O, "+"),
            (N, "1"),
            (L, "end"),
        ],
    );
    assert_eq!(parsed.tree.to_string(), "while x < 10 do x = x + 1 end");
}

#[test]
fn test_while_missing_do() {
    let err = parse_err(3, &[(L, "while"), (V, "x"), (C, "<"), (N, "10"), (P, "print"), (L, "end")]);
    assert_eq!(
        err,
        ParseError::MissingKeyword {
            keyword: Keyword::Do,
            construct: Construct::While
        }
    );
}

#[test]
fn test_while_missing_end() {
    let err = parse_err(3, &[(L, "while"), (V, "x"), (C, "<"), (N, "10"), (L, "do"), (P, "print")]);
    assert_eq!(
        err,
        ParseError::MissingKeyword {
            keyword: Keyword::End,
            construct: Construct::While
        }
    );
}

#[test]
fn test_while_empty_body() {
    let err = parse_err(3, &[(L, "while"), (V, "x"), (C, "<"), (N, "10"), (L, "do"), (L, "end")]);
    assert_eq!(err.to_string(), "invalid while body: expected a statement");
}

#[test]
fn test_while_trailing_cards() {
    let err = parse_err(
        3,
        &[
            (L, "while"),
            (V, "x"),
            (C, "<"),
            (N, "10"),
            (L, "do"),
            (P, "print(x)"),
            (L, "end"),
            (N, "4"),
        ],
    );
    assert_eq!(err, ParseError::TrailingCards(Construct::While));
}

#[test]
fn test_while_rejected_at_level_two() {
    let err = parse_err(
        2,
        &[(L, "while"), (V, "x"), (C, "<"), (N, "10"), (L, "do"), (P, "print"), (L, "end")],
    );
    assert_eq!(err.code(), "level_too_low");
}

// ─────────────────────────────────────────────────────────────────────
// Level 4: for
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_for_loop() {
    let parsed = parse_ok(
        4,
        &[(F, "for i = 1 to 5"), (L, "do"), (P, "print(i)"), (L, "end")],
    );
    assert_eq!(
        parsed.tree,
        InstructionTree::For(ForLoop {
            count: 5,
            body: SimpleStatement::Print(Print {
                variable: "i".into()
            }),
        })
    );
}

#[test]
fn test_for_requires_do_after_header() {
    let err = parse_err(
        4,
        &[(F, "for i = 1 to 5"), (N, "3"), (L, "do"), (P, "print(i)"), (L, "end")],
    );
    assert_eq!(err.to_string(), "expected 'do' directly after the for card");
}

#[test]
fn test_for_bad_header() {
    let err = parse_err(4, &[(F, "for i = 1 to many"), (L, "do"), (P, "print"), (L, "end")]);
    assert_eq!(err.code(), "invalid_for_header");
}

#[test]
fn test_for_rejected_at_level_three() {
    let err = parse_err(3, &[(F, "for i = 1 to 2"), (L, "do"), (P, "print"), (L, "end")]);
    assert_eq!(
        err.to_string(),
        "for loop requires level 4, current level is 3"
    );
}

#[test]
fn test_for_missing_end() {
    let err = parse_err(4, &[(F, "for i = 1 to 2"), (L, "do"), (P, "print")]);
    assert_eq!(
        err,
        ParseError::MissingKeyword {
            keyword: Keyword::End,
            construct: Construct::For
        }
    );
}

// ─────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────

proptest! {
    /// Property: `[assign, '=', number]` parses to the clamped literal at every level.
    #[test]
    fn prop_assignment_literal_is_clamped(n in any::<i64>(), level in 1u8..=4) {
        let text = n.to_string();
        let parsed = Parser::new(level)
            .parse(&cards(&[(A, "v"), (O, "="), (N, text.as_str())]))
            .unwrap();
        prop_assert_eq!(parsed.tree, InstructionTree::from(assign("v", n.clamp(-1_000_000_000, 1_000_000_000))));
    }

    /// Property: parsing never panics on arbitrary card values.
    #[test]
    fn prop_parse_is_total(values in proptest::collection::vec("[a-z0-9=<>+* ()]{0,12}", 0..8)) {
        let types = [A, N, O, V, P, If, C, L, F];
        let seq: Vec<Card> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Card::of(types[i % types.len()], v.as_str()))
            .collect();
        let _ = Parser::new(4).parse(&seq);
    }
}

#[test]
fn test_determinism_100_iterations() {
    let seq = if_else_cards();
    let first = parse_ok(2, &seq);
    for i in 0..100 {
        assert_eq!(first, parse_ok(2, &seq), "Determinism failure at iteration {i}");
    }
}
