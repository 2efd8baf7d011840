use crate::Keyword;
use std::fmt;
use thiserror::Error;

/// A control structure, named for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    If,
    While,
    For,
}

impl Construct {
    /// The lowest grammar level that admits this construct.
    pub fn required_level(self) -> u8 {
        match self {
            Construct::If => 2,
            Construct::While => 3,
            Construct::For => 4,
        }
    }
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Construct::If => write!(f, "if statement"),
            Construct::While => write!(f, "while loop"),
            Construct::For => write!(f, "for loop"),
        }
    }
}

/// The nested statement slot a branch error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Then,
    Else,
    WhileBody,
    ForBody,
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchKind::Then => write!(f, "then branch"),
            BranchKind::Else => write!(f, "else branch"),
            BranchKind::WhileBody => write!(f, "while body"),
            BranchKind::ForBody => write!(f, "for body"),
        }
    }
}

/// A structural error in a card sequence.
///
/// Parse errors never touch evaluator state. The UI shows the `Display`
/// text; `code()` is stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    EmptyCommand,

    #[error("invalid level {0}: expected 1 to 4")]
    InvalidLevel(u8),

    /// A card whose value cannot be read as its printed type.
    #[error("card {position}: {message}")]
    MalformedCard { position: usize, message: String },

    #[error("missing 'then' in if statement")]
    MissingThen,

    #[error("missing '{keyword}' in {construct}")]
    MissingKeyword {
        keyword: Keyword,
        construct: Construct,
    },

    #[error("invalid condition: {0}")]
    InvalidCondition(String),

    #[error("invalid for loop header '{0}'")]
    InvalidForHeader(String),

    /// A simple statement with the wrong shape.
    #[error("{0}")]
    InvalidStructure(String),

    #[error("invalid {branch}: {source}")]
    InvalidBranch {
        branch: BranchKind,
        #[source]
        source: Box<ParseError>,
    },

    #[error("{construct} requires level {}, current level is {level}", .construct.required_level())]
    LevelTooLow { construct: Construct, level: u8 },

    #[error("unexpected cards after 'end' in {0}")]
    TrailingCards(Construct),
}

impl ParseError {
    /// Stable snake_case identifier for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::EmptyCommand => "empty_command",
            ParseError::InvalidLevel(_) => "invalid_level",
            ParseError::MalformedCard { .. } => "malformed_card",
            ParseError::MissingThen => "missing_then",
            ParseError::MissingKeyword { .. } => "missing_keyword",
            ParseError::InvalidCondition(_) => "invalid_condition",
            ParseError::InvalidForHeader(_) => "invalid_for_header",
            ParseError::InvalidStructure(_) => "invalid_structure",
            ParseError::InvalidBranch { .. } => "invalid_branch",
            ParseError::LevelTooLow { .. } => "level_too_low",
            ParseError::TrailingCards(_) => "trailing_cards",
        }
    }

    /// Shorthand for a structural diagnostic.
    pub fn structure(message: impl Into<String>) -> Self {
        ParseError::InvalidStructure(message.into())
    }

    /// Wrap an error from a nested statement slot.
    pub fn in_branch(self, branch: BranchKind) -> Self {
        ParseError::InvalidBranch {
            branch,
            source: Box::new(self),
        }
    }
}
