//! Default scalar formatter.
//!
//! Renders filter, ordering and grouping operands in the protocol's
//! expression syntax:
//!
//! ```text
//! Age gt 10 and contains(Name,'ab')
//! Orders/any(o:o/Price ge 5)
//! (Price add Tax) mul 2
//! ```
//!
//! Parentheses are only written where operator precedence needs them.

use crate::ast::{BinOp, Expr, Literal, UnaryOp};
use crate::context::ScalarFormatter;
use crate::error::TranslateError;
use crate::version::{ProtocolVersion, VersionTracker};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionWriter;

impl ExpressionWriter {
    pub fn new() -> Self {
        ExpressionWriter
    }

    fn write_expr(
        &self,
        expr: &Expr,
        in_path: bool,
        version: &mut VersionTracker,
    ) -> Result<String, TranslateError> {
        match expr {
            Expr::Literal(literal) => Ok(self.write_literal(literal, in_path)),
            Expr::Member { object, name } => match object {
                Some(object) => {
                    let prefix = self.write_expr(object, in_path, version)?;
                    Ok(format!("{}/{}", prefix, name))
                }
                None => Ok(name.clone()),
            },
            Expr::Parameter(name) => Ok(name.clone()),
            Expr::Unary { op, operand } => {
                let inner = self.write_operand(operand, u8::MAX, false, in_path, version)?;
                Ok(match op {
                    UnaryOp::Not => format!("not {}", inner),
                    UnaryOp::Negate => format!("-{}", inner),
                })
            }
            Expr::Binary { op, left, right } => {
                if *op == BinOp::In {
                    version.raise(ProtocolVersion::V4_01);
                }
                let precedence = op.precedence();
                let left = self.write_operand(left, precedence, false, in_path, version)?;
                let right = self.write_operand(right, precedence, true, in_path, version)?;
                Ok(format!("{} {} {}", left, op.keyword(), right))
            }
            Expr::Call { function, args } => {
                let args = self.write_list(args, in_path, version)?;
                Ok(format!("{}({})", function, args))
            }
            Expr::Lambda {
                kind,
                collection,
                variable,
                body,
            } => {
                let collection = self.write_expr(collection, in_path, version)?;
                let body = self.write_expr(body, in_path, version)?;
                Ok(format!(
                    "{}/{}({}:{})",
                    collection,
                    kind.keyword(),
                    variable,
                    body
                ))
            }
            Expr::List(items) => Ok(format!("({})", self.write_list(items, in_path, version)?)),
            Expr::Resource(_)
            | Expr::Conditional { .. }
            | Expr::TypeIs { .. }
            | Expr::New { .. }
            | Expr::Invocation { .. } => {
                Err(TranslateError::UnsupportedExpressionKind(expr.kind()))
            }
        }
    }

    /// Wraps a binary child in parentheses when it binds looser than its
    /// parent, or equally loose on the right-hand side.
    fn write_operand(
        &self,
        operand: &Expr,
        parent_precedence: u8,
        right_side: bool,
        in_path: bool,
        version: &mut VersionTracker,
    ) -> Result<String, TranslateError> {
        let text = self.write_expr(operand, in_path, version)?;
        let needs_parens = match operand {
            Expr::Binary { op, .. } => {
                let child = op.precedence();
                child < parent_precedence || (right_side && child == parent_precedence)
            }
            _ => false,
        };
        if needs_parens {
            Ok(format!("({})", text))
        } else {
            Ok(text)
        }
    }

    fn write_list(
        &self,
        items: &[Expr],
        in_path: bool,
        version: &mut VersionTracker,
    ) -> Result<String, TranslateError> {
        let parts = items
            .iter()
            .map(|item| self.write_expr(item, in_path, version))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(","))
    }

    fn write_literal(&self, literal: &Literal, in_path: bool) -> String {
        let text = literal.to_uri_string();
        if in_path && matches!(literal, Literal::String(_)) {
            escape_path_chars(&text)
        } else {
            text
        }
    }
}

impl ScalarFormatter for ExpressionWriter {
    fn format(
        &self,
        expr: &Expr,
        in_path: bool,
        version: &mut VersionTracker,
    ) -> Result<String, TranslateError> {
        self.write_expr(expr, in_path, version)
    }
}

/// Characters that would end or split a path segment.
fn escape_path_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LambdaKind;

    fn write(expr: &Expr) -> String {
        let mut version = VersionTracker::new();
        ExpressionWriter::new()
            .format(expr, false, &mut version)
            .unwrap()
    }

    fn int(n: i32) -> Expr {
        Expr::Literal(Literal::Int32(n))
    }

    #[test]
    fn test_comparison() {
        let expr = Expr::binary(BinOp::GreaterThan, Expr::property("Age"), int(10));
        assert_eq!(write(&expr), "Age gt 10");
    }

    #[test]
    fn test_member_path() {
        let expr = Expr::binary(
            BinOp::Equal,
            Expr::property("Address/City"),
            Expr::Literal(Literal::String("Oslo".into())),
        );
        assert_eq!(write(&expr), "Address/City eq 'Oslo'");
    }

    #[test]
    fn test_precedence_parentheses() {
        // (Price add Tax) mul 2
        let sum = Expr::binary(BinOp::Add, Expr::property("Price"), Expr::property("Tax"));
        let expr = Expr::binary(BinOp::Multiply, sum, int(2));
        assert_eq!(write(&expr), "(Price add Tax) mul 2");

        // a or b and c needs no parentheses
        let and = Expr::binary(BinOp::And, Expr::property("B"), Expr::property("C"));
        let expr = Expr::binary(BinOp::Or, Expr::property("A"), and);
        assert_eq!(write(&expr), "A or B and C");
    }

    #[test]
    fn test_right_side_same_precedence() {
        let inner = Expr::binary(BinOp::Subtract, Expr::property("B"), Expr::property("C"));
        let expr = Expr::binary(BinOp::Subtract, Expr::property("A"), inner);
        assert_eq!(write(&expr), "A sub (B sub C)");
    }

    #[test]
    fn test_not_and_call() {
        let call = Expr::Call {
            function: "contains".into(),
            args: vec![
                Expr::property("Name"),
                Expr::Literal(Literal::String("ab".into())),
            ],
        };
        let expr = Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(call),
        };
        assert_eq!(write(&expr), "not contains(Name,'ab')");
    }

    #[test]
    fn test_lambda() {
        let body = Expr::binary(
            BinOp::GreaterEqual,
            Expr::Member {
                object: Some(Box::new(Expr::Parameter("o".into()))),
                name: "Price".into(),
            },
            int(5),
        );
        let expr = Expr::Lambda {
            kind: LambdaKind::Any,
            collection: Box::new(Expr::property("Orders")),
            variable: "o".into(),
            body: Box::new(body),
        };
        assert_eq!(write(&expr), "Orders/any(o:o/Price ge 5)");
    }

    #[test]
    fn test_in_raises_version() {
        let expr = Expr::binary(
            BinOp::In,
            Expr::property("Id"),
            Expr::List(vec![int(1), int(2)]),
        );
        let mut version = VersionTracker::new();
        let text = ExpressionWriter::new()
            .format(&expr, false, &mut version)
            .unwrap();
        assert_eq!(text, "Id in (1,2)");
        assert_eq!(version.current(), ProtocolVersion::V4_01);
    }

    #[test]
    fn test_path_strings_escaped() {
        let expr = Expr::Literal(Literal::String("a/b".into()));
        let mut version = VersionTracker::new();
        let text = ExpressionWriter::new()
            .format(&expr, true, &mut version)
            .unwrap();
        assert_eq!(text, "'a%2Fb'");
    }

    #[test]
    fn test_conditional_rejected() {
        let expr = Expr::Conditional {
            test: Box::new(Expr::Literal(Literal::Boolean(true))),
            if_true: Box::new(int(1)),
            if_false: Box::new(int(2)),
        };
        let mut version = VersionTracker::new();
        let err = ExpressionWriter::new()
            .format(&expr, false, &mut version)
            .unwrap_err();
        assert_eq!(
            err,
            TranslateError::UnsupportedExpressionKind(crate::ast::ExprKind::Conditional)
        );
    }
}
