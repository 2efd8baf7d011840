//! CardCode lexer: classifies a card sequence into a token stream.

pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind, DEFAULT_PRINT_VARIABLE, MAX_FOR_COUNT};
