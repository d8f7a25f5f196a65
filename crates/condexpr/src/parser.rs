use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::ast::*; // CondExpr, CmpOp, Operand

// ──────────────────────────────
// pest parser definition
// ──────────────────────────────
#[derive(Parser)]
#[grammar = "condexpr.pest"]
pub struct CondExprParser;

// ──────────────────────────────
// public entry-point
// ──────────────────────────────
pub fn static_parse_condition(input: &str) -> Result<CondExpr, pest::error::Error<Rule>> {
    let mut pairs = CondExprParser::parse(Rule::condition, input)?;
    let cond_pair = pairs
        .next()
        .expect("Expected top-level condition rule to yield one pair");
    Ok(build_condition(cond_pair))
}

// ──────────────────────────────
// condition = SOI ~ expr ~ EOI
// ──────────────────────────────
fn build_condition(pair: Pair<Rule>) -> CondExpr {
    debug_assert_eq!(pair.as_rule(), Rule::condition);
    let expr_pair = pair
        .into_inner()
        .next()
        .expect("condition must contain exactly one expr pair");
    build_expr(expr_pair)
}

// ──────────────────────────────
// expr = and_expr (OR and_expr)*
// ──────────────────────────────
fn build_expr(pair: Pair<Rule>) -> CondExpr {
    debug_assert_eq!(pair.as_rule(), Rule::expr);
    let mut inner = pair.into_inner().filter(|p| p.as_rule() == Rule::and_expr);

    let mut expr = build_and_expr(inner.next().expect("expr must start with and_expr"));
    for rhs_pair in inner {
        let rhs = build_and_expr(rhs_pair);
        expr = CondExpr::Or(Box::new(expr), Box::new(rhs));
    }
    expr
}

fn build_and_expr(pair: Pair<Rule>) -> CondExpr {
    debug_assert_eq!(pair.as_rule(), Rule::and_expr);
    let mut inner = pair.into_inner().filter(|p| p.as_rule() == Rule::not_expr);

    let mut expr = build_not_expr(inner.next().expect("and_expr must start with not_expr"));
    for rhs_pair in inner {
        let rhs = build_not_expr(rhs_pair);
        expr = CondExpr::And(Box::new(expr), Box::new(rhs));
    }
    expr
}

fn build_not_expr(pair: Pair<Rule>) -> CondExpr {
    debug_assert_eq!(pair.as_rule(), Rule::not_expr);
    let mut inner = pair.into_inner();
    let first = inner.next().expect("not_expr must not be empty");
    match first.as_rule() {
        Rule::NOT => {
            let atom = inner.next().expect("NOT must be followed by atom");
            CondExpr::Not(Box::new(build_atom(atom)))
        }
        Rule::atom => build_atom(first),
        _ => unreachable!("unexpected not_expr child"),
    }
}

// ──────────────────────────────
// atom = comparison | "(" expr ")" | identifier
// ──────────────────────────────
fn build_atom(pair: Pair<Rule>) -> CondExpr {
    debug_assert_eq!(pair.as_rule(), Rule::atom);
    let inner = pair.into_inner().next().expect("atom must not be empty");
    match inner.as_rule() {
        Rule::comparison => build_comparison(inner),
        Rule::expr => build_expr(inner),
        Rule::identifier => CondExpr::Truthy(inner.as_str().to_owned()),
        _ => unreachable!("unexpected atom child"),
    }
}

fn build_comparison(pair: Pair<Rule>) -> CondExpr {
    let mut inner = pair.into_inner();
    let lhs = build_operand(inner.next().expect("comparison missing left operand"));
    let op_pair = inner.next().expect("comparison missing operator");
    let rhs = build_operand(inner.next().expect("comparison missing right operand"));

    let op = match op_pair.as_str() {
        "=" | "==" => CmpOp::Eq,
        "!=" => CmpOp::Ne,
        "<" => CmpOp::Lt,
        ">" => CmpOp::Gt,
        "<=" => CmpOp::Le,
        ">=" => CmpOp::Ge,
        _ => unreachable!("unhandled comparison operator"),
    };
    CondExpr::Compare(op, lhs, rhs)
}

fn build_operand(pair: Pair<Rule>) -> Operand {
    let inner = pair.into_inner().next().expect("operand must not be empty");
    match inner.as_rule() {
        Rule::identifier => Operand::Identifier(inner.as_str().to_owned()),
        Rule::string_literal => Operand::StringLiteral(unquote(inner.as_str())),
        Rule::number_literal => Operand::NumberLiteral(inner.as_str().to_owned()),
        _ => unreachable!("unexpected operand child"),
    }
}

/// Strip the surrounding quotes and collapse doubled quotes, the only escape
/// the grammar admits.
fn unquote(raw: &str) -> String {
    let body = &raw[1..raw.len() - 1];
    if raw.starts_with('\'') {
        body.replace("''", "'")
    } else {
        body.replace("\"\"", "\"")
    }
}
