//! The card model: what students lay down, and which wheel color it belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────
// Category
// ─────────────────────────────────────────────────────────────────────

/// A wheel color. Every card belongs to exactly one category.
///
/// The declaration order is the order the wheel walks when sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Number cards.
    Green,
    /// Assignment and control-flow cards.
    Red,
    /// Operator and comparison cards.
    Blue,
    /// Variable and print cards. The rare "print" signal on the wheel.
    Yellow,
}

impl Category {
    /// All categories in sampling order.
    pub const ALL: [Category; 4] = [
        Category::Green,
        Category::Red,
        Category::Blue,
        Category::Yellow,
    ];

    /// The lowercase color name.
    pub fn name(self) -> &'static str {
        match self {
            Category::Green => "green",
            Category::Red => "red",
            Category::Blue => "blue",
            Category::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a wheel category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid category: '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Card
// ─────────────────────────────────────────────────────────────────────

/// The printed type of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Number,
    Operator,
    Assign,
    Varref,
    Print,
    Conditional,
    Compare,
    Loop,
    For,
    Logical,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardType::Number => "number",
            CardType::Operator => "operator",
            CardType::Assign => "assign",
            CardType::Varref => "varref",
            CardType::Print => "print",
            CardType::Conditional => "conditional",
            CardType::Compare => "compare",
            CardType::Loop => "loop",
            CardType::For => "for",
            CardType::Logical => "logical",
        };
        f.write_str(name)
    }
}

/// A single instruction card.
///
/// Cards are reusable: a sequence may contain the same card more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub value: String,
    pub color: Category,
}

impl Card {
    /// Create a new card.
    pub fn new(
        id: impl Into<String>,
        card_type: CardType,
        value: impl Into<String>,
        color: Category,
    ) -> Self {
        Self {
            id: id.into(),
            card_type,
            value: value.into(),
            color,
        }
    }

    /// Create a card with a generated id and the color its type is dealt in.
    pub fn of(card_type: CardType, value: impl Into<String>) -> Self {
        let value = value.into();
        let color = match card_type {
            CardType::Number => Category::Green,
            CardType::Assign
            | CardType::Conditional
            | CardType::Loop
            | CardType::For => Category::Red,
            CardType::Operator | CardType::Compare | CardType::Logical => Category::Blue,
            CardType::Varref | CardType::Print => Category::Yellow,
        };
        Self::new(format!("{card_type}:{value}"), card_type, value, color)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Keyword
// ─────────────────────────────────────────────────────────────────────

/// Control-flow keyword cards, recognised by their value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    If,
    Then,
    Else,
    While,
    Do,
    End,
}

impl Keyword {
    /// Match a card value against the keyword vocabulary.
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            "if" => Some(Keyword::If),
            "then" => Some(Keyword::Then),
            "else" => Some(Keyword::Else),
            "while" => Some(Keyword::While),
            "do" => Some(Keyword::Do),
            "end" => Some(Keyword::End),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Keyword::If => "if",
            Keyword::Then => "then",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Do => "do",
            Keyword::End => "end",
        };
        f.write_str(text)
    }
}
