//! Control-flow parsing: `if` (level 2), `while` (level 3), `for` (level 4).

use crate::parser::{find_keyword, Parser};
use cardcode_lexer::{Token, TokenKind};
use cardcode_types::ast::*;
use cardcode_types::{BranchKind, Construct, Keyword, ParseError, ParseResult};

impl Parser {
    /// `if <varref> <compare> <number> then <stmt> [else <stmt>]`
    pub(crate) fn parse_if(&self, tokens: &[Token]) -> ParseResult<InstructionTree> {
        let then_idx = find_keyword(tokens, Keyword::Then).ok_or(ParseError::MissingThen)?;
        let condition = parse_condition(&tokens[1..then_idx])?;

        let after_then = &tokens[then_idx + 1..];
        let (then_cards, else_cards) = match find_keyword(after_then, Keyword::Else) {
            Some(else_idx) => (&after_then[..else_idx], Some(&after_then[else_idx + 1..])),
            None => (after_then, None),
        };

        let then_branch = self
            .parse_simple(then_cards)
            .map_err(|e| e.in_branch(BranchKind::Then))?;
        let else_branch = else_cards
            .map(|cards| {
                self.parse_simple(cards)
                    .map_err(|e| e.in_branch(BranchKind::Else))
            })
            .transpose()?;

        Ok(InstructionTree::If(IfStmt {
            condition,
            then_branch,
            else_branch,
        }))
    }

    /// `while <varref> <compare> <number> do <stmt> end`
    pub(crate) fn parse_while(&self, tokens: &[Token]) -> ParseResult<InstructionTree> {
        let (do_idx, end_idx) = locate_do_end(tokens, Construct::While)?;
        let condition = parse_condition(&tokens[1..do_idx])?;
        let body = self
            .parse_simple(&tokens[do_idx + 1..end_idx])
            .map_err(|e| e.in_branch(BranchKind::WhileBody))?;
        Ok(InstructionTree::While(WhileLoop { condition, body }))
    }

    /// `for i = 1 to <N> do <stmt> end`, with `N` printed on the for card.
    pub(crate) fn parse_for(&self, tokens: &[Token]) -> ParseResult<InstructionTree> {
        let TokenKind::ForHeader { count } = tokens[0].kind else {
            return Err(ParseError::InvalidForHeader(tokens[0].text.clone()));
        };
        let (do_idx, end_idx) = locate_do_end(tokens, Construct::For)?;
        if do_idx != 1 {
            return Err(ParseError::structure(
                "expected 'do' directly after the for card",
            ));
        }
        let body = self
            .parse_simple(&tokens[do_idx + 1..end_idx])
            .map_err(|e| e.in_branch(BranchKind::ForBody))?;
        Ok(InstructionTree::For(ForLoop { count, body }))
    }
}

/// `<varref> <compare> <number>`
fn parse_condition(tokens: &[Token]) -> ParseResult<Condition> {
    let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
    match kinds.as_slice() {
        [TokenKind::VarRef(variable), TokenKind::Compare(operator), TokenKind::Number(literal)] => {
            Ok(Condition {
                variable: variable.clone(),
                operator: *operator,
                literal: *literal,
            })
        }
        [_, _, _] => Err(ParseError::InvalidCondition(
            "expected variable, comparison, number".into(),
        )),
        other => Err(ParseError::InvalidCondition(format!(
            "expected 3 cards, found {}",
            other.len()
        ))),
    }
}

/// Find `do` and the `end` after it; nothing may follow `end`.
fn locate_do_end(tokens: &[Token], construct: Construct) -> ParseResult<(usize, usize)> {
    let do_idx = find_keyword(tokens, Keyword::Do).ok_or(ParseError::MissingKeyword {
        keyword: Keyword::Do,
        construct,
    })?;
    let end_idx = find_keyword(&tokens[do_idx + 1..], Keyword::End)
        .map(|i| do_idx + 1 + i)
        .ok_or(ParseError::MissingKeyword {
            keyword: Keyword::End,
            construct,
        })?;
    if end_idx + 1 != tokens.len() {
        return Err(ParseError::TrailingCards(construct));
    }
    Ok((do_idx, end_idx))
}
