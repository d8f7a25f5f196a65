// src/lib.rs
pub mod ast;
pub mod parser;

// re-export for convenience
pub use ast::{CmpOp, CondExpr, Operand};
pub use parser::static_parse_condition;

#[cfg(test)]
mod tests {
    use super::*; // static_parse_condition, CondExpr, …

    // ────────────── 기본 동작 ──────────────
    #[test]
    fn test_bare_identifier() {
        let expr = static_parse_condition("user_id").unwrap();
        assert_eq!(expr, CondExpr::Truthy("user_id".to_owned()));
    }

    #[test]
    fn test_underscore_identifier() {
        let expr = static_parse_condition("_internal_flag9").unwrap();
        assert_eq!(expr, CondExpr::Truthy("_internal_flag9".to_owned()));
    }

    #[test]
    fn test_empty_input() {
        assert!(static_parse_condition("").is_err());
        assert!(static_parse_condition("   ").is_err());
    }

    // ────────────── 비교 연산자 ──────────────
    #[test]
    fn test_equality_comparison() {
        let expr = static_parse_condition("target = 'upload'").unwrap();
        assert_eq!(
            expr,
            CondExpr::Compare(
                CmpOp::Eq,
                Operand::Identifier("target".to_owned()),
                Operand::StringLiteral("upload".to_owned()),
            )
        );
    }

    #[test]
    fn test_double_equals_synonym() {
        // `target == 'upload'` 형태도 허용
        let a = static_parse_condition("target == 'upload'").unwrap();
        let b = static_parse_condition("target = 'upload'").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_comparison_operators() {
        for (text, op) in [
            ("a = 1", CmpOp::Eq),
            ("a != 1", CmpOp::Ne),
            ("a < 1", CmpOp::Lt),
            ("a > 1", CmpOp::Gt),
            ("a <= 1", CmpOp::Le),
            ("a >= 1", CmpOp::Ge),
        ] {
            let expr = static_parse_condition(text).unwrap();
            assert_eq!(
                expr,
                CondExpr::Compare(
                    op,
                    Operand::Identifier("a".to_owned()),
                    Operand::NumberLiteral("1".to_owned()),
                ),
                "for input {text:?}"
            );
        }
    }

    #[test]
    fn test_number_literals() {
        let expr = static_parse_condition("amount >= -123.45").unwrap();
        assert_eq!(
            expr,
            CondExpr::Compare(
                CmpOp::Ge,
                Operand::Identifier("amount".to_owned()),
                Operand::NumberLiteral("-123.45".to_owned()),
            )
        );
    }

    #[test]
    fn test_literal_on_both_sides() {
        assert!(static_parse_condition("1 < 2").is_ok());
        assert!(static_parse_condition("'a' != 'b'").is_ok());
    }

    // ────────────── 문자열 리터럴 ──────────────
    #[test]
    fn test_single_and_double_quote_strings() {
        let a = static_parse_condition("kind = 'F'").unwrap();
        let b = static_parse_condition("kind = \"F\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_doubled_quote_escape() {
        let expr = static_parse_condition("name = 'O''Brien'").unwrap();
        assert_eq!(
            expr,
            CondExpr::Compare(
                CmpOp::Eq,
                Operand::Identifier("name".to_owned()),
                Operand::StringLiteral("O'Brien".to_owned()),
            )
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert!(static_parse_condition("name = 'oops").is_err());
    }

    // ────────────── 논리 연산자 / 우선순위 ──────────────
    #[test]
    fn test_and_or_precedence() {
        // a OR b AND c  ==  a OR (b AND c)
        let expr = static_parse_condition("a OR b AND c").unwrap();
        assert_eq!(
            expr,
            CondExpr::Or(
                Box::new(CondExpr::Truthy("a".to_owned())),
                Box::new(CondExpr::And(
                    Box::new(CondExpr::Truthy("b".to_owned())),
                    Box::new(CondExpr::Truthy("c".to_owned())),
                )),
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expr = static_parse_condition("(a OR b) AND c").unwrap();
        assert_eq!(
            expr,
            CondExpr::And(
                Box::new(CondExpr::Or(
                    Box::new(CondExpr::Truthy("a".to_owned())),
                    Box::new(CondExpr::Truthy("b".to_owned())),
                )),
                Box::new(CondExpr::Truthy("c".to_owned())),
            )
        );
    }

    #[test]
    fn test_not_binds_to_atom() {
        let expr = static_parse_condition("NOT a AND b").unwrap();
        assert_eq!(
            expr,
            CondExpr::And(
                Box::new(CondExpr::Not(Box::new(CondExpr::Truthy("a".to_owned())))),
                Box::new(CondExpr::Truthy("b".to_owned())),
            )
        );
    }

    #[test]
    fn test_nested_not_via_parentheses() {
        let expr = static_parse_condition("NOT (NOT a)").unwrap();
        assert_eq!(
            expr,
            CondExpr::Not(Box::new(CondExpr::Not(Box::new(CondExpr::Truthy(
                "a".to_owned()
            )))))
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        // lowercase `and` reads as two identifiers, which the grammar rejects
        assert!(static_parse_condition("a and b").is_err());
        assert!(static_parse_condition("not a").is_err());
    }

    #[test]
    fn test_keyword_is_not_identifier() {
        assert!(static_parse_condition("AND").is_err());
        assert!(static_parse_condition("NOT").is_err());
        // but an identifier may merely start with a keyword
        assert!(static_parse_condition("ANDroid").is_ok());
        assert!(static_parse_condition("ORDER_kind").is_ok());
    }

    // ────────────── 주석 ──────────────
    #[test]
    fn test_line_comment_is_discarded() {
        let a = static_parse_condition("is_table -- 테이블 여부").unwrap();
        assert_eq!(a, CondExpr::Truthy("is_table".to_owned()));
    }

    #[test]
    fn test_comment_between_tokens() {
        assert!(static_parse_condition("a = -- note\n 1").is_ok());
    }

    // ────────────── 오류 케이스 (보안) ──────────────
    #[test]
    fn test_rejects_statement_injection() {
        let input = "user_id; DROP TABLE t_user; --";
        assert!(static_parse_condition(input).is_err());
    }

    #[test]
    fn test_rejects_quote_breakout() {
        assert!(static_parse_condition("name = 'a' OR '1'='1'; --").is_err());
        assert!(static_parse_condition("x = 1)) UNION SELECT password").is_err());
    }

    #[test]
    fn test_rejects_stray_punctuation() {
        for input in ["a;", "a\\", "a = 1;", "a || b", "a & b", "a %", "`a`"] {
            assert!(
                static_parse_condition(input).is_err(),
                "should reject {input:?}"
            );
        }
    }

    #[test]
    fn test_rejects_function_call_shape() {
        // parentheses only group expressions, they never call anything
        assert!(static_parse_condition("pg_sleep(10)").is_err());
    }

    #[test]
    fn test_unmatched_parenthesis() {
        assert!(static_parse_condition("(a OR (b AND c)").is_err());
        assert!(static_parse_condition("a)").is_err());
    }

    #[test]
    fn test_logical_expr_missing_rhs() {
        assert!(static_parse_condition("a AND ").is_err());
        assert!(static_parse_condition("OR b").is_err());
    }

    #[test]
    fn test_comparison_missing_operand() {
        assert!(static_parse_condition("a =").is_err());
        assert!(static_parse_condition("= 1").is_err());
    }

    #[test]
    fn test_rejects_sql_style_inequality() {
        // `<>` is not in the operator whitelist
        assert!(static_parse_condition("a <> 1").is_err());
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(static_parse_condition("a = 1 b").is_err());
    }
}
