//! CardCode parser: turns a card sequence into an instruction tree.
//!
//! ```text
//! Cards → Lexer → Parser (level 1..=4) → InstructionTree
//! ```

mod parse_control;
mod parse_stmt;
mod parser;
mod report;

pub use parser::{ParsedCommand, Parser, MAX_LEVEL, MIN_LEVEL};
pub use report::ParseReport;
