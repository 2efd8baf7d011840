//! Core CardCode lexer: reads each card's printed value for its meaning.
//!
//! Cards arrive already typed, so lexing is per card and never looks at
//! neighbours. The first card that cannot be read stops the scan.

use cardcode_types::ast::{ArithOp, CompareOp};
use cardcode_types::{clamp_value, Card, CardType, Keyword, ParseError, ParseResult};
use std::num::IntErrorKind;

use crate::token::{Token, TokenKind, DEFAULT_PRINT_VARIABLE, MAX_FOR_COUNT};

/// The CardCode lexer.
pub struct Lexer<'cards> {
    cards: &'cards [Card],
}

impl<'cards> Lexer<'cards> {
    /// Create a new lexer over a card sequence.
    pub fn new(cards: &'cards [Card]) -> Self {
        Self { cards }
    }

    /// Classify every card, failing on the first malformed one.
    pub fn lex(self) -> ParseResult<Vec<Token>> {
        self.cards
            .iter()
            .enumerate()
            .map(|(position, card)| classify(card, position))
            .collect()
    }
}

/// Classify a single card at `position` in its sequence.
pub fn classify(card: &Card, position: usize) -> ParseResult<Token> {
    let value = card.value.trim();
    let malformed = |message: String| ParseError::MalformedCard {
        position: position + 1,
        message,
    };

    let kind = match card.card_type {
        CardType::Number => TokenKind::Number(parse_number(value).map_err(malformed)?),
        CardType::Operator => {
            if value == "=" {
                TokenKind::Equals
            } else {
                let op = ArithOp::from_symbol(value)
                    .ok_or_else(|| malformed(format!("unknown operator '{value}'")))?;
                TokenKind::Operator(op)
            }
        }
        CardType::Assign => {
            if value == "=" {
                TokenKind::Equals
            } else {
                let (name, embeds_equals) = match value.strip_suffix('=') {
                    Some(name) => (name.trim_end(), true),
                    None => (value, false),
                };
                TokenKind::Assign {
                    variable: identifier(name).map_err(malformed)?,
                    embeds_equals,
                }
            }
        }
        CardType::Varref => TokenKind::VarRef(identifier(value).map_err(malformed)?),
        CardType::Print => TokenKind::Print(print_target(value).map_err(malformed)?),
        CardType::Compare => {
            let op = CompareOp::from_symbol(value)
                .ok_or_else(|| malformed(format!("unknown comparison '{value}'")))?;
            TokenKind::Compare(op)
        }
        CardType::Conditional | CardType::Loop => {
            let kw = Keyword::from_value(value)
                .ok_or_else(|| malformed(format!("unknown keyword '{value}'")))?;
            TokenKind::Keyword(kw)
        }
        CardType::For => match Keyword::from_value(value) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::ForHeader {
                count: parse_for_header(value)?,
            },
        },
        CardType::Logical => TokenKind::Logical(value.to_string()),
    };

    Ok(Token::new(kind, position, value))
}

/// Parse a decimal integer, clamping values outside the variable range.
fn parse_number(text: &str) -> Result<i64, String> {
    match text.parse::<i64>() {
        Ok(n) => {
            let clamped = clamp_value(n);
            if clamped != n {
                log::debug!("number card {n} clamped to {clamped}");
            }
            Ok(clamped)
        }
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(clamp_value(i64::MAX)),
            IntErrorKind::NegOverflow => Ok(clamp_value(i64::MIN)),
            _ => Err(format!("expected a number, got '{text}'")),
        },
    }
}

/// Validate a variable name: a letter or `_`, then letters, digits or `_`.
fn identifier(text: &str) -> Result<String, String> {
    let mut chars = text.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_alphanumeric() || c == '_') {
        Ok(text.to_string())
    } else {
        Err(format!("invalid variable name '{text}'"))
    }
}

/// `print(name)` names its variable; a bare print card prints the score.
fn print_target(text: &str) -> Result<String, String> {
    let inner = text
        .strip_prefix("print")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .map(str::trim);
    match inner {
        Some(name) if !name.is_empty() => identifier(name),
        _ => Ok(DEFAULT_PRINT_VARIABLE.to_string()),
    }
}

/// `for i = 1 to N` with `0 <= N <= MAX_FOR_COUNT`.
fn parse_for_header(text: &str) -> ParseResult<u32> {
    let invalid = || ParseError::InvalidForHeader(text.to_string());
    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.as_slice() {
        ["for", "i", "=", "1", "to", bound] if bound.bytes().all(|b| b.is_ascii_digit()) => {
            let count: u32 = bound.parse().map_err(|_| invalid())?;
            if count > MAX_FOR_COUNT {
                return Err(invalid());
            }
            Ok(count)
        }
        _ => Err(invalid()),
    }
}
