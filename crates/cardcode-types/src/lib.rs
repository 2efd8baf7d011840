//! Shared types for the CardCode engines.
//!
//! This crate defines the card model, wheel categories, the instruction
//! tree produced by the parser, and the structural parse errors shared by
//! the lexer and parser stages.

mod card;
mod error;
pub mod ast;

pub use card::{Card, CardType, Category, Keyword, UnknownCategory};
pub use error::{BranchKind, Construct, ParseError};

/// Smallest value a variable can hold.
pub const MIN_VALUE: i64 = -1_000_000_000;

/// Largest value a variable can hold.
pub const MAX_VALUE: i64 = 1_000_000_000;

/// Clamp a value to the representable variable range.
pub fn clamp_value(value: i64) -> i64 {
    value.clamp(MIN_VALUE, MAX_VALUE)
}

/// Result type used by the lexer and parser.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
