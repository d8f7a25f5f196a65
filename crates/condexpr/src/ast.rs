use serde::Deserialize;

/// A compiled condition expression. This closed set of node kinds is the
/// whole language: there is no way to represent a function call, a statement
/// or any other SQL construct with it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum CondExpr {
    And(Box<CondExpr>, Box<CondExpr>),
    Or(Box<CondExpr>, Box<CondExpr>),
    Not(Box<CondExpr>),
    Compare(CmpOp, Operand, Operand),
    /// A bare identifier used as a boolean, e.g. `#if user_id`.
    Truthy(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Operand {
    Identifier(String),
    StringLiteral(String),
    NumberLiteral(String), // kept as written, converted at evaluation time
}
