//! Collaborators the writer delegates to, and the context that bundles them.
//!
//! The writer itself only knows the URI grammar. Turning a scalar operand
//! into text, resolving where a collection lives, choosing a key style and
//! binding raw sub-trees are all pluggable through the traits below.

use crate::ast::Expr;
use crate::error::TranslateError;
use crate::expression_writer::ExpressionWriter;
use crate::version::VersionTracker;

/// Renders leaf and operand expressions to their canonical text.
pub trait ScalarFormatter {
    /// `in_path` is set for text that lands in a path segment rather than
    /// in the query string. Implementations raise `version` for any
    /// construct that needs a newer protocol.
    fn format(
        &self,
        expr: &Expr,
        in_path: bool,
        version: &mut VersionTracker,
    ) -> Result<String, TranslateError>;
}

/// Knows where the service and its collections live.
pub trait BaseUriResolver {
    fn collection_uri(&self, name: &str) -> String;
    fn root_uri(&self) -> String;
}

/// Appends a key lookup to the path.
///
/// `pairs` holds `(property, value)` with each value already rendered by the
/// scalar formatter for use inside a path.
pub trait KeyFormatter {
    fn append_key(&self, pairs: &[(String, String)], target: &mut String);
}

/// Normalizes and binds a raw sub-tree into a resource expression.
pub trait ExpressionBinder {
    fn bind(&self, raw: &Expr) -> Result<Expr, TranslateError>;
}

impl<F> ExpressionBinder for F
where
    F: Fn(&Expr) -> Result<Expr, TranslateError>,
{
    fn bind(&self, raw: &Expr) -> Result<Expr, TranslateError> {
        self(raw)
    }
}

/// Resolves every collection against one fixed service root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticBaseUri {
    base: String,
}

impl StaticBaseUri {
    pub fn new(base: impl Into<String>) -> Self {
        StaticBaseUri { base: base.into() }
    }
}

impl BaseUriResolver for StaticBaseUri {
    fn collection_uri(&self, name: &str) -> String {
        if self.base.ends_with('/') {
            format!("{}{}", self.base, name)
        } else {
            format!("{}/{}", self.base, name)
        }
    }

    fn root_uri(&self) -> String {
        self.base.clone()
    }
}

/// Key rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDelimiter {
    /// `People(1)`, `Lines(OrderId=1,Line=2)`
    #[default]
    Parentheses,
    /// `People/1`; composite keys still use parentheses
    Slash,
}

impl KeyFormatter for KeyDelimiter {
    fn append_key(&self, pairs: &[(String, String)], target: &mut String) {
        match (self, pairs) {
            (_, []) => {}
            (KeyDelimiter::Slash, [(_, value)]) => {
                target.push('/');
                // key-as-segment strings are not quoted
                target.push_str(&unquote(value));
            }
            (_, [(_, value)]) => {
                target.push('(');
                target.push_str(value);
                target.push(')');
            }
            (_, composite) => {
                let parts: Vec<String> = composite
                    .iter()
                    .map(|(property, value)| format!("{}={}", property, value))
                    .collect();
                target.push('(');
                target.push_str(&parts.join(","));
                target.push(')');
            }
        }
    }
}

/// `'a''b'` becomes `a'b`; anything not wrapped in quotes is kept as is.
fn unquote(value: &str) -> String {
    match value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
        Some(inner) => inner.replace("''", "'"),
        _ => value.to_string(),
    }
}

/// Binder for trees that arrive fully bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughBinder;

impl ExpressionBinder for PassThroughBinder {
    fn bind(&self, raw: &Expr) -> Result<Expr, TranslateError> {
        Ok(raw.clone())
    }
}

/// Everything a translation needs besides the tree.
pub struct ServiceContext {
    resolver: Box<dyn BaseUriResolver>,
    keys: Box<dyn KeyFormatter>,
    formatter: Box<dyn ScalarFormatter>,
    binder: Box<dyn ExpressionBinder>,
}

impl ServiceContext {
    /// Default collaborators rooted at `base_uri`.
    pub fn new(base_uri: impl Into<String>) -> Self {
        ServiceContext {
            resolver: Box::new(StaticBaseUri::new(base_uri)),
            keys: Box::new(KeyDelimiter::default()),
            formatter: Box::new(ExpressionWriter::new()),
            binder: Box::new(PassThroughBinder),
        }
    }

    pub fn with_resolver(mut self, resolver: impl BaseUriResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_key_formatter(mut self, keys: impl KeyFormatter + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    pub fn with_formatter(mut self, formatter: impl ScalarFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn with_binder(mut self, binder: impl ExpressionBinder + 'static) -> Self {
        self.binder = Box::new(binder);
        self
    }

    pub(crate) fn resolver(&self) -> &dyn BaseUriResolver {
        self.resolver.as_ref()
    }

    pub(crate) fn keys(&self) -> &dyn KeyFormatter {
        self.keys.as_ref()
    }

    pub(crate) fn formatter(&self) -> &dyn ScalarFormatter {
        self.formatter.as_ref()
    }

    pub(crate) fn binder(&self) -> &dyn ExpressionBinder {
        self.binder.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(property: &str, value: &str) -> (String, String) {
        (property.to_string(), value.to_string())
    }

    #[test]
    fn test_collection_uri_joins_with_one_slash() {
        assert_eq!(
            StaticBaseUri::new("http://host/svc").collection_uri("People"),
            "http://host/svc/People"
        );
        assert_eq!(
            StaticBaseUri::new("http://host/svc/").collection_uri("People"),
            "http://host/svc/People"
        );
    }

    #[test]
    fn test_parentheses_single_and_composite() {
        let mut out = String::new();
        KeyDelimiter::Parentheses.append_key(&[key("Id", "1")], &mut out);
        assert_eq!(out, "(1)");

        let mut out = String::new();
        KeyDelimiter::Parentheses.append_key(
            &[key("OrderId", "1"), key("Sku", "'a''b'")],
            &mut out,
        );
        assert_eq!(out, "(OrderId=1,Sku='a''b')");
    }

    #[test]
    fn test_slash_single_key_unquoted() {
        let mut out = String::from("People");
        KeyDelimiter::Slash.append_key(&[key("UserName", "'o''neil'")], &mut out);
        assert_eq!(out, "People/o'neil");

        let mut out = String::from("People");
        KeyDelimiter::Slash.append_key(&[key("Id", "7")], &mut out);
        assert_eq!(out, "People/7");
    }

    #[test]
    fn test_slash_composite_falls_back() {
        let mut out = String::new();
        KeyDelimiter::Slash.append_key(&[key("A", "1"), key("B", "2")], &mut out);
        assert_eq!(out, "(A=1,B=2)");
    }

    #[test]
    fn test_unquote_leaves_lone_quote() {
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("NS.Color'Red'"), "NS.Color'Red'");
    }
}
