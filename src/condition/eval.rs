use std::cmp::Ordering;

use condexpr::{CmpOp, CondExpr, Operand};

use crate::error::EvalError;
use crate::params::{Params, Value};

/// Evaluate a compiled condition against the parameter mapping. Pure: the
/// mapping is never mutated and the result is only ever a branch-selection
/// boolean, never text.
pub fn eval(expr: &CondExpr, params: &Params) -> Result<bool, EvalError> {
    match expr {
        // AND / OR short-circuit left to right
        CondExpr::And(lhs, rhs) => Ok(eval(lhs, params)? && eval(rhs, params)?),
        CondExpr::Or(lhs, rhs) => Ok(eval(lhs, params)? || eval(rhs, params)?),
        CondExpr::Not(inner) => Ok(!eval(inner, params)?),
        // absent key reads as false; only comparisons require presence
        CondExpr::Truthy(name) => Ok(params.get(name).is_some_and(Value::is_truthy)),
        CondExpr::Compare(op, lhs, rhs) => compare(*op, lhs, rhs, params),
    }
}

enum Scalar {
    Text(String),
    Number(f64),
}

impl Scalar {
    fn type_name(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "string",
            Scalar::Number(_) => "number",
        }
    }
}

fn resolve(operand: &Operand, params: &Params) -> Result<Scalar, EvalError> {
    match operand {
        Operand::Identifier(name) => match params.get(name) {
            // an undefined operand cannot satisfy any comparison; null
            // counts as undefined here
            None | Some(Value::Null) => Err(EvalError::UnboundParameter(name.clone())),
            Some(Value::Bool(_)) => Err(EvalError::NotComparable {
                name: name.clone(),
                type_name: "boolean",
            }),
            Some(Value::Number(n)) => Ok(Scalar::Number(*n)),
            Some(Value::Text(s)) => Ok(Scalar::Text(s.clone())),
        },
        Operand::StringLiteral(s) => Ok(Scalar::Text(s.clone())),
        Operand::NumberLiteral(raw) => raw
            .parse()
            .map(Scalar::Number)
            .map_err(|_| EvalError::BadNumber(raw.clone())),
    }
}

fn compare(op: CmpOp, lhs: &Operand, rhs: &Operand, params: &Params) -> Result<bool, EvalError> {
    let lhs = resolve(lhs, params)?;
    let rhs = resolve(rhs, params)?;

    let ordering = match (&lhs, &rhs) {
        (Scalar::Number(a), Scalar::Number(b)) => {
            a.partial_cmp(b).ok_or(EvalError::TypeMismatch {
                lhs: "number",
                rhs: "number",
            })?
        }
        (Scalar::Text(a), Scalar::Text(b)) => a.cmp(b),
        _ => {
            return Err(EvalError::TypeMismatch {
                lhs: lhs.type_name(),
                rhs: rhs.type_name(),
            });
        }
    };

    Ok(match op {
        CmpOp::Eq => ordering == Ordering::Equal,
        CmpOp::Ne => ordering != Ordering::Equal,
        CmpOp::Lt => ordering == Ordering::Less,
        CmpOp::Gt => ordering == Ordering::Greater,
        CmpOp::Le => ordering != Ordering::Greater,
        CmpOp::Ge => ordering != Ordering::Less,
    })
}
