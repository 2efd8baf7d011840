//! Core parser infrastructure: level gating, dispatch, token helpers.

use cardcode_lexer::{Lexer, Token, TokenKind};
use cardcode_types::ast::InstructionTree;
use cardcode_types::{Card, Construct, Keyword, ParseError, ParseResult};
use serde::Serialize;

/// Lowest grammar level.
pub const MIN_LEVEL: u8 = 1;

/// Highest grammar level.
pub const MAX_LEVEL: u8 = 4;

/// A successfully parsed card sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCommand {
    pub tree: InstructionTree,
    /// The card values joined by single spaces, as laid down.
    pub command: String,
}

/// The CardCode parser.
///
/// The grammar is cumulative: level *n* accepts everything level *n − 1*
/// accepts. Every call parses from scratch; no state survives between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parser {
    level: u8,
}

impl Parser {
    /// Create a parser for the given grammar level.
    ///
    /// Out-of-range levels are accepted here and reported by [`Parser::parse`].
    pub fn new(level: u8) -> Self {
        Self { level }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn set_level(&mut self, level: u8) {
        self.level = level;
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse a card sequence into an instruction tree.
    pub fn parse(&self, cards: &[Card]) -> ParseResult<ParsedCommand> {
        let result = self.parse_inner(cards);
        if let Err(e) = &result {
            log::debug!("level {} parse rejected: {e}", self.level);
        }
        result
    }

    fn parse_inner(&self, cards: &[Card]) -> ParseResult<ParsedCommand> {
        if cards.is_empty() {
            return Err(ParseError::EmptyCommand);
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(ParseError::InvalidLevel(self.level));
        }
        let tokens = Lexer::new(cards).lex()?;
        let tree = self.parse_tokens(&tokens)?;
        let command = tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(ParsedCommand { tree, command })
    }

    /// Dispatch on the leading card.
    fn parse_tokens(&self, tokens: &[Token]) -> ParseResult<InstructionTree> {
        let construct = match tokens.first().map(|t| &t.kind) {
            Some(TokenKind::Keyword(Keyword::If)) => Some(Construct::If),
            Some(TokenKind::Keyword(Keyword::While)) => Some(Construct::While),
            Some(TokenKind::ForHeader { .. }) => Some(Construct::For),
            _ => None,
        };
        match construct {
            None => self.parse_simple(tokens).map(InstructionTree::from),
            Some(construct) if self.level < construct.required_level() => {
                Err(ParseError::LevelTooLow {
                    construct,
                    level: self.level,
                })
            }
            Some(Construct::If) => self.parse_if(tokens),
            Some(Construct::While) => self.parse_while(tokens),
            Some(Construct::For) => self.parse_for(tokens),
        }
    }
}

// ── Token Helpers ─────────────────────────────────────────────────────────────

/// Index of the first `keyword` card in `tokens`.
pub(crate) fn find_keyword(tokens: &[Token], keyword: Keyword) -> Option<usize> {
    tokens.iter().position(|t| t.is_keyword(keyword))
}
