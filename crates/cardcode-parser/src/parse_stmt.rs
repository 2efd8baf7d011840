//! Level-1 statement parsing: print, assignment, expression.

use crate::parser::Parser;
use cardcode_lexer::{Token, TokenKind};
use cardcode_types::ast::*;
use cardcode_types::{Keyword, ParseError, ParseResult};

impl Parser {
    /// Parse a statement without control flow.
    ///
    /// Used for whole level-1 commands and for every branch and loop body.
    pub(crate) fn parse_simple(&self, tokens: &[Token]) -> ParseResult<SimpleStatement> {
        let Some((first, rest)) = tokens.split_first() else {
            return Err(ParseError::structure("expected a statement"));
        };
        match &first.kind {
            TokenKind::Print(variable) => {
                if rest.is_empty() {
                    Ok(SimpleStatement::Print(Print {
                        variable: variable.clone(),
                    }))
                } else {
                    Err(ParseError::structure("print must be the only card"))
                }
            }
            TokenKind::Assign {
                variable,
                embeds_equals,
            } => {
                let value_cards = if *embeds_equals {
                    rest
                } else {
                    match rest.split_first() {
                        Some((eq, tail)) if eq.kind == TokenKind::Equals => tail,
                        _ => return Err(ParseError::structure("expected '=' after variable")),
                    }
                };
                self.parse_assignment_value(variable, value_cards)
            }
            TokenKind::Keyword(Keyword::If | Keyword::While) | TokenKind::ForHeader { .. } => {
                Err(ParseError::structure(
                    "nested control structures are not allowed",
                ))
            }
            _ => Err(ParseError::structure("command must start with an assignment")),
        }
    }

    /// After `x =`: either `number` or `varref operator number`.
    fn parse_assignment_value(
        &self,
        variable: &str,
        tokens: &[Token],
    ) -> ParseResult<SimpleStatement> {
        let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
        match kinds.as_slice() {
            [TokenKind::Number(literal)] => Ok(SimpleStatement::Assignment(Assignment {
                variable: variable.to_string(),
                literal: *literal,
            })),
            [TokenKind::VarRef(left_var), TokenKind::Operator(operator), TokenKind::Number(right_literal)] => {
                Ok(SimpleStatement::Expression(Expression {
                    variable: variable.to_string(),
                    left_var: left_var.clone(),
                    operator: *operator,
                    right_literal: *right_literal,
                }))
            }
            [] => Err(ParseError::structure("expected a value after '='")),
            [_, _, _] => Err(ParseError::structure("invalid expression format")),
            [other] => Err(ParseError::structure(format!(
                "expected a number after '=', got {other}"
            ))),
            _ => Err(ParseError::structure("invalid command structure for level 1")),
        }
    }
}
