//! Instruction tree produced by the card parser.
//!
//! Branches and loop bodies are [`SimpleStatement`]s: the card grammar does
//! not admit nested control structures, and the types make that impossible
//! to construct.

use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

/// Arithmetic operator between a variable and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl ArithOp {
    /// Parse an operator card value.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Comparison operator used in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessEq,
    #[serde(rename = ">=")]
    GreaterEq,
    #[serde(rename = "!=")]
    NotEq,
}

impl CompareOp {
    /// Parse a compare card value.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "==" => Some(CompareOp::Eq),
            "<" => Some(CompareOp::Less),
            ">" => Some(CompareOp::Greater),
            "<=" => Some(CompareOp::LessEq),
            ">=" => Some(CompareOp::GreaterEq),
            "!=" => Some(CompareOp::NotEq),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Less => "<",
            CompareOp::Greater => ">",
            CompareOp::LessEq => "<=",
            CompareOp::GreaterEq => ">=",
            CompareOp::NotEq => "!=",
        }
    }

    /// Apply the comparison to two integers.
    pub fn holds(self, left: i64, right: i64) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Less => left < right,
            CompareOp::Greater => left > right,
            CompareOp::LessEq => left <= right,
            CompareOp::GreaterEq => left >= right,
            CompareOp::NotEq => left != right,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Simple statements
// ══════════════════════════════════════════════════════════════════════════════

/// `x = 5`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub variable: String,
    pub literal: i64,
}

/// `x = y + 3`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expression {
    pub variable: String,
    pub left_var: String,
    pub operator: ArithOp,
    pub right_literal: i64,
}

/// `print(x)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Print {
    pub variable: String,
}

/// A statement without control flow: the only thing allowed inside a
/// branch or loop body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SimpleStatement {
    Assignment(Assignment),
    Expression(Expression),
    Print(Print),
}

// ══════════════════════════════════════════════════════════════════════════════
// Control flow
// ══════════════════════════════════════════════════════════════════════════════

/// `x < 5`: a variable compared against a literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub variable: String,
    pub operator: CompareOp,
    pub literal: i64,
}

/// `if cond then stmt [else stmt]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfStmt {
    pub condition: Condition,
    pub then_branch: SimpleStatement,
    pub else_branch: Option<SimpleStatement>,
}

/// `while cond do stmt end`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhileLoop {
    pub condition: Condition,
    pub body: SimpleStatement,
}

/// `for i = 1 to count do stmt end`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForLoop {
    pub count: u32,
    pub body: SimpleStatement,
}

/// A validated command, ready for the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InstructionTree {
    Assignment(Assignment),
    Expression(Expression),
    Print(Print),
    If(IfStmt),
    While(WhileLoop),
    For(ForLoop),
}

impl From<SimpleStatement> for InstructionTree {
    fn from(stmt: SimpleStatement) -> Self {
        match stmt {
            SimpleStatement::Assignment(a) => InstructionTree::Assignment(a),
            SimpleStatement::Expression(e) => InstructionTree::Expression(e),
            SimpleStatement::Print(p) => InstructionTree::Print(p),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Canonical rendering
// ══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.variable, self.operator, self.literal)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.variable, self.literal)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} {} {}",
            self.variable, self.left_var, self.operator, self.right_literal
        )
    }
}

impl fmt::Display for Print {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "print({})", self.variable)
    }
}

impl fmt::Display for SimpleStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleStatement::Assignment(a) => write!(f, "{a}"),
            SimpleStatement::Expression(e) => write!(f, "{e}"),
            SimpleStatement::Print(p) => write!(f, "{p}"),
        }
    }
}

impl fmt::Display for InstructionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionTree::Assignment(a) => write!(f, "{a}"),
            InstructionTree::Expression(e) => write!(f, "{e}"),
            InstructionTree::Print(p) => write!(f, "{p}"),
            InstructionTree::If(stmt) => {
                write!(f, "if {} then {}", stmt.condition, stmt.then_branch)?;
                if let Some(else_branch) = &stmt.else_branch {
                    write!(f, " else {else_branch}")?;
                }
                Ok(())
            }
            InstructionTree::While(w) => {
                write!(f, "while {} do {} end", w.condition, w.body)
            }
            InstructionTree::For(l) => {
                write!(f, "for i = 1 to {} do {} end", l.count, l.body)
            }
        }
    }
}
