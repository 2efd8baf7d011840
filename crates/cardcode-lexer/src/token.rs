//! Token types for the CardCode lexer.
//!
//! A [`Token`] is one card read for its meaning: the number on a number
//! card, the variable on an assign card, the bound on a for card.

use cardcode_types::ast::{ArithOp, CompareOp};
use cardcode_types::Keyword;
use std::fmt;

/// Variable printed by a print card that does not name one.
pub const DEFAULT_PRINT_VARIABLE: &str = "score";

/// Largest bound a for card may carry.
pub const MAX_FOR_COUNT: u32 = 1_000;

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single classified card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the card means.
    pub kind: TokenKind,
    /// Index of the card in the sequence (0-based).
    pub position: usize,
    /// The card's printed value, used when rendering the command text.
    pub text: String,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, position: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            text: text.into(),
        }
    }

    /// Returns `true` if this token is the given keyword.
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every meaning a card can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Integer literal, already clamped to the variable range.
    Number(i64),
    /// A standalone `=` card.
    Equals,
    /// `+ - * /`
    Operator(ArithOp),
    /// Assignment target. `embeds_equals` is set for cards printed `x =`.
    Assign {
        variable: String,
        embeds_equals: bool,
    },
    /// Variable read.
    VarRef(String),
    /// `print(name)`
    Print(String),
    /// `if then else while do end`
    Keyword(Keyword),
    /// `== < > <= >= !=`
    Compare(CompareOp),
    /// `for i = 1 to N`
    ForHeader { count: u32 },
    /// `and`, `or`, `not`. Dealt at level 3 but not part of any statement.
    Logical(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number {n}"),
            TokenKind::Equals => f.write_str("'='"),
            TokenKind::Operator(op) => write!(f, "operator '{op}'"),
            TokenKind::Assign { variable, .. } => write!(f, "assignment to '{variable}'"),
            TokenKind::VarRef(name) => write!(f, "variable '{name}'"),
            TokenKind::Print(name) => write!(f, "print({name})"),
            TokenKind::Keyword(kw) => write!(f, "'{kw}'"),
            TokenKind::Compare(op) => write!(f, "comparison '{op}'"),
            TokenKind::ForHeader { count } => write!(f, "for i = 1 to {count}"),
            TokenKind::Logical(text) => write!(f, "logical '{text}'"),
        }
    }
}
