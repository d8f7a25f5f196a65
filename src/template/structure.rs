use std::iter::Peekable;

use condexpr::{static_parse_condition, CondExpr};

use crate::error::ParseError;
use crate::template::scanner::{scan, DirectiveKind, ScannedLine};

/// The parsed form of a template: literal spans interleaved with
/// conditional blocks. Built once per template and cached; rendering never
/// re-reads the raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Consecutive text lines, joined with `\n`.
    Literal(String),
    Conditional(ConditionalBlock),
}

/// An `#if` group: the `#if` branch, any `#elif` branches in order, and an
/// optional `#else` body. Bodies are full structures, so blocks nest.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalBlock {
    pub branches: Vec<Branch>,
    pub else_branch: Option<Vec<Segment>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: CondExpr,
    pub body: Vec<Segment>,
}

/// Scan raw template text and group its lines into a `Structure`.
/// Conditions are compiled here, once, so any `ConditionSyntaxError`
/// surfaces before the first evaluation.
pub fn build(text: &str) -> Result<Structure, ParseError> {
    let lines = scan(text)?;
    let mut iter = lines.into_iter().peekable();

    let (segments, terminator) = parse_segments(&mut iter)?;
    if let Some(ScannedLine::Directive { kind, line, .. }) = terminator {
        return Err(ParseError::structure(
            line,
            format!("`#{}` without an open `#if`", kind.as_str()),
        ));
    }
    Ok(Structure { segments })
}

type LineIter<'a> = Peekable<std::vec::IntoIter<ScannedLine<'a>>>;

/// Consume lines until end of input or an `#elif` / `#else` / `#endif`
/// belonging to the caller. The unconsumed terminator is handed back.
fn parse_segments<'a>(
    iter: &mut LineIter<'a>,
) -> Result<(Vec<Segment>, Option<ScannedLine<'a>>), ParseError> {
    let mut segments = Vec::new();
    let mut literal: Option<String> = None;

    while let Some(scanned) = iter.next() {
        match scanned {
            ScannedLine::Text(content) => match literal.as_mut() {
                Some(buf) => {
                    buf.push('\n');
                    buf.push_str(content);
                }
                None => literal = Some(content.to_owned()),
            },
            ScannedLine::Directive {
                kind: DirectiveKind::If,
                condition,
                line,
            } => {
                if let Some(buf) = literal.take() {
                    segments.push(Segment::Literal(buf));
                }
                segments.push(Segment::Conditional(parse_block(iter, condition, line)?));
            }
            terminator @ ScannedLine::Directive { .. } => {
                if let Some(buf) = literal.take() {
                    segments.push(Segment::Literal(buf));
                }
                return Ok((segments, Some(terminator)));
            }
        }
    }

    if let Some(buf) = literal.take() {
        segments.push(Segment::Literal(buf));
    }
    Ok((segments, None))
}

/// Parse the branches of one conditional block, starting just after its
/// `#if` line.
fn parse_block(
    iter: &mut LineIter<'_>,
    if_condition: &str,
    if_line: usize,
) -> Result<ConditionalBlock, ParseError> {
    let mut branches = Vec::new();
    let mut pending = compile_condition(if_condition, if_line)?;

    loop {
        let (body, terminator) = parse_segments(iter)?;
        let Some(ScannedLine::Directive {
            kind,
            condition,
            line,
        }) = terminator
        else {
            return Err(ParseError::structure(
                if_line,
                "`#if` is missing its matching `#endif`",
            ));
        };

        match kind {
            DirectiveKind::Elif => {
                branches.push(Branch {
                    condition: pending,
                    body,
                });
                pending = compile_condition(condition, line)?;
            }
            DirectiveKind::Else => {
                branches.push(Branch {
                    condition: pending,
                    body,
                });
                let (else_body, terminator) = parse_segments(iter)?;
                return match terminator {
                    Some(ScannedLine::Directive {
                        kind: DirectiveKind::Endif,
                        ..
                    }) => Ok(ConditionalBlock {
                        branches,
                        else_branch: Some(else_body),
                    }),
                    Some(ScannedLine::Directive {
                        kind: DirectiveKind::Elif,
                        line,
                        ..
                    }) => Err(ParseError::structure(line, "`#elif` after `#else`")),
                    Some(ScannedLine::Directive {
                        kind: DirectiveKind::Else,
                        line,
                        ..
                    }) => Err(ParseError::structure(line, "duplicate `#else`")),
                    _ => Err(ParseError::structure(
                        if_line,
                        "`#if` is missing its matching `#endif`",
                    )),
                };
            }
            DirectiveKind::Endif => {
                branches.push(Branch {
                    condition: pending,
                    body,
                });
                return Ok(ConditionalBlock {
                    branches,
                    else_branch: None,
                });
            }
            DirectiveKind::If => unreachable!("`#if` is consumed by parse_segments"),
        }
    }
}

fn compile_condition(text: &str, line: usize) -> Result<CondExpr, ParseError> {
    static_parse_condition(text).map_err(|e| ParseError::ConditionSyntax {
        line,
        message: e.variant.message().into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_template_is_one_literal() {
        let s = build("SELECT 1\nFROM t").unwrap();
        assert_eq!(
            s.segments,
            vec![Segment::Literal("SELECT 1\nFROM t".to_owned())]
        );
    }

    #[test]
    fn groups_if_else_into_block() {
        let s = build("A\n#if x\nB\n#else\nC\n#endif\nD").unwrap();
        assert_eq!(s.segments.len(), 3);
        assert_eq!(s.segments[0], Segment::Literal("A".to_owned()));
        let Segment::Conditional(block) = &s.segments[1] else {
            panic!("expected conditional block");
        };
        assert_eq!(block.branches.len(), 1);
        assert_eq!(
            block.branches[0].body,
            vec![Segment::Literal("B".to_owned())]
        );
        assert_eq!(
            block.else_branch,
            Some(vec![Segment::Literal("C".to_owned())])
        );
        assert_eq!(s.segments[2], Segment::Literal("D".to_owned()));
    }

    #[test]
    fn elif_chain_keeps_order() {
        let s = build("#if a\nA\n#elif b\nB\n#elif c\nC\n#endif").unwrap();
        let Segment::Conditional(block) = &s.segments[0] else {
            panic!("expected conditional block");
        };
        assert_eq!(block.branches.len(), 3);
        assert!(block.else_branch.is_none());
    }

    #[test]
    fn nested_blocks_parse_recursively() {
        let s = build("#if a\n#if b\nX\n#endif\n#endif").unwrap();
        let Segment::Conditional(outer) = &s.segments[0] else {
            panic!("expected conditional block");
        };
        assert!(matches!(
            outer.branches[0].body[0],
            Segment::Conditional(_)
        ));
    }

    #[test]
    fn missing_endif_is_structure_error() {
        let err = build("#if a\nX").unwrap_err();
        assert!(matches!(err, ParseError::Structure { line: 1, .. }));
    }

    #[test]
    fn endif_without_if_is_structure_error() {
        let err = build("X\n#endif").unwrap_err();
        assert!(matches!(err, ParseError::Structure { line: 2, .. }));
    }

    #[test]
    fn elif_after_else_is_structure_error() {
        let err = build("#if a\nA\n#else\nB\n#elif c\nC\n#endif").unwrap_err();
        assert!(matches!(err, ParseError::Structure { line: 5, .. }));
    }

    #[test]
    fn duplicate_else_is_structure_error() {
        let err = build("#if a\nA\n#else\nB\n#else\nC\n#endif").unwrap_err();
        assert!(matches!(err, ParseError::Structure { line: 5, .. }));
    }

    #[test]
    fn bad_condition_is_condition_syntax_error() {
        let err = build("#if user_id; DROP TABLE t_user; --\nX\n#endif").unwrap_err();
        assert!(matches!(err, ParseError::ConditionSyntax { line: 1, .. }));
    }

    #[test]
    fn bad_condition_in_unreached_elif_still_fails_at_parse_time() {
        // 조건 컴파일은 평가와 무관하게 구조 생성 시 전부 수행된다
        let err = build("#if a\nA\n#elif b;;\nB\n#endif").unwrap_err();
        assert!(matches!(err, ParseError::ConditionSyntax { line: 3, .. }));
    }
}
