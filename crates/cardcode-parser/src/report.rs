use crate::parser::ParsedCommand;
use cardcode_types::ast::InstructionTree;
use cardcode_types::ParseResult;
use serde::Serialize;

/// The tagged parse result handed to the UI.
///
/// `{valid: true, command, tree}` or `{valid: false, error, code}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<InstructionTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl From<ParseResult<ParsedCommand>> for ParseReport {
    fn from(result: ParseResult<ParsedCommand>) -> Self {
        match result {
            Ok(parsed) => Self {
                valid: true,
                command: Some(parsed.command),
                tree: Some(parsed.tree),
                error: None,
                code: None,
            },
            Err(e) => Self {
                valid: false,
                command: None,
                tree: None,
                error: Some(e.to_string()),
                code: Some(e.code()),
            },
        }
    }
}
