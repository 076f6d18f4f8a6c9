use thiserror::Error;

use crate::ast::ExprKind;

/// Errors raised while writing a URI.
///
/// Each of these means the tree was built wrong upstream; the writer stops
/// at the first one and returns no partial output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The node has no representation in a request URI.
    #[error("Unsupported expression kind: {0} expressions cannot be written to a URI")]
    UnsupportedExpressionKind(ExprKind),

    /// The aggregation method has no keyword in `$apply`.
    #[error("Unsupported aggregation method: {0}")]
    UnsupportedAggregationMethod(String),

    /// The writer reached a state the tree shape should have ruled out.
    #[error("Internal invariant violation: {0}")]
    InternalInvariantViolation(String),
}
