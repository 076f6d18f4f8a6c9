use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Serialised text that starts a JSON object or array.
static STRUCTURED_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[\[{]").expect("structured text pattern is valid"));

/// A constant value appearing in a key predicate, a filter operand or an
/// operation parameter.
///
/// Numeric literals are written without type suffixes, the way protocol
/// version 4 expects them.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,

    /// `true` / `false`
    Boolean(bool),

    /// 32-bit integer
    Int32(i32),

    /// 64-bit integer (no `L` suffix)
    Int64(i64),

    /// Single precision float (no `f` suffix)
    Single(f32),

    /// Double precision float (no `d` suffix)
    Double(f64),

    /// Decimal (no `M` suffix)
    ///
    /// # Example
    /// ```text
    /// 12.50
    /// ```
    Decimal(Decimal),

    /// Quoted string, single quotes doubled
    ///
    /// # Example
    /// ```text
    /// 'O''Neil'
    /// ```
    String(String),

    /// Guid, written bare
    Guid(String),

    /// Date-time with offset, written bare
    DateTimeOffset(String),

    /// Enum member qualified by its type
    ///
    /// # Example
    /// ```text
    /// NS.Color'Red'
    /// ```
    Enum { type_name: String, member: String },

    /// Complex or collection value, written as JSON
    Json(serde_json::Value),
}

impl Literal {
    /// Only complex and collection values are non-primitive.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Literal::Json(_))
    }

    /// Renders the literal in its canonical URI form.
    pub fn to_uri_string(&self) -> String {
        match self {
            Literal::Null => "null".to_string(),
            Literal::Boolean(b) => b.to_string(),
            Literal::Int32(n) => n.to_string(),
            Literal::Int64(n) => n.to_string(),
            Literal::Single(n) => format_float(f64::from(*n), n.to_string()),
            Literal::Double(n) => format_float(*n, n.to_string()),
            Literal::Decimal(d) => d.to_string(),
            Literal::String(s) => format!("'{}'", s.replace('\'', "''")),
            Literal::Guid(g) => g.clone(),
            Literal::DateTimeOffset(d) => d.clone(),
            Literal::Enum { type_name, member } => {
                format!("{}'{}'", type_name, member.replace('\'', "''"))
            }
            Literal::Json(value) => value.to_string(),
        }
    }
}

fn format_float(value: f64, text: String) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}INF")
    } else {
        text
    }
}

/// Value passed to a function parameter, already serialised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    /// Written inline in the parameter list.
    Primitive(String),
    /// Moved out of the path into a parameter alias.
    NonPrimitive(String),
}

impl ParameterValue {
    pub fn from_literal(literal: &Literal) -> Self {
        let text = literal.to_uri_string();
        if literal.is_primitive() {
            ParameterValue::Primitive(text)
        } else {
            ParameterValue::NonPrimitive(text)
        }
    }

    /// Classifies text that was serialised elsewhere: JSON objects and
    /// arrays are non-primitive, anything else is inlined.
    pub fn from_serialized(text: impl Into<String>) -> Self {
        let text = text.into();
        if STRUCTURED_TEXT.is_match(&text) {
            ParameterValue::NonPrimitive(text)
        } else {
            ParameterValue::Primitive(text)
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, ParameterValue::Primitive(_))
    }

    pub fn text(&self) -> &str {
        match self {
            ParameterValue::Primitive(text) | ParameterValue::NonPrimitive(text) => text,
        }
    }
}

impl From<Literal> for ParameterValue {
    fn from(literal: Literal) -> Self {
        ParameterValue::from_literal(&literal)
    }
}
