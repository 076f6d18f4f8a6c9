use std::fmt;

use crate::ast::{BinOp, Literal, ResourceExpr, UnaryOp};

/// Bound expression tree node.
///
/// A translation starts at a [`Expr::Resource`] node. The scalar variants
/// appear as operands of query options and key predicates. The last group of
/// variants can be built by a binder but has no URI form; writing any of them
/// fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Entity set, singleton, navigation hop or service root
    Resource(Box<ResourceExpr>),

    // Scalars
    /// Constant value
    Literal(Literal),

    /// Property access
    ///
    /// # Examples
    /// ```text
    /// Age              // Member { object: None, name: "Age" }
    /// Address/City     // Member { object: Some(Address), name: "City" }
    /// o/Price          // Member { object: Some(Parameter("o")), name: "Price" }
    /// ```
    Member {
        object: Option<Box<Expr>>,
        name: String,
    },

    /// Range variable of a lambda
    Parameter(String),

    /// Unary operation
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation (comparison, arithmetic, logical)
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Canonical function call
    ///
    /// # Example
    /// ```text
    /// contains(Name,'ab')
    /// ```
    Call { function: String, args: Vec<Expr> },

    /// `any` / `all` over a collection
    ///
    /// # Example
    /// ```text
    /// Orders/any(o:o/Price gt 5)
    /// ```
    Lambda {
        kind: LambdaKind,
        collection: Box<Expr>,
        variable: String,
        body: Box<Expr>,
    },

    /// Parenthesised list, the right operand of `in`
    List(Vec<Expr>),

    // Kinds with no URI form
    /// Ternary conditional
    Conditional {
        test: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },

    /// Runtime type test
    TypeIs { operand: Box<Expr>, type_name: String },

    /// Object construction
    New { type_name: String, args: Vec<Expr> },

    /// Delegate invocation
    Invocation { target: Box<Expr>, args: Vec<Expr> },
}

/// Quantifier of a lambda expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaKind {
    Any,
    All,
}

impl LambdaKind {
    pub fn keyword(self) -> &'static str {
        match self {
            LambdaKind::Any => "any",
            LambdaKind::All => "all",
        }
    }
}

/// Discriminant of [`Expr`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    Resource,
    Literal,
    Member,
    Parameter,
    Unary,
    Binary,
    Call,
    Lambda,
    List,
    Conditional,
    TypeIs,
    New,
    Invocation,
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExprKind::Resource => "resource",
            ExprKind::Literal => "literal",
            ExprKind::Member => "member access",
            ExprKind::Parameter => "parameter",
            ExprKind::Unary => "unary",
            ExprKind::Binary => "binary",
            ExprKind::Call => "call",
            ExprKind::Lambda => "lambda",
            ExprKind::List => "list",
            ExprKind::Conditional => "conditional",
            ExprKind::TypeIs => "type test",
            ExprKind::New => "new",
            ExprKind::Invocation => "invocation",
        };
        f.write_str(name)
    }
}

impl Expr {
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Resource(_) => ExprKind::Resource,
            Expr::Literal(_) => ExprKind::Literal,
            Expr::Member { .. } => ExprKind::Member,
            Expr::Parameter(_) => ExprKind::Parameter,
            Expr::Unary { .. } => ExprKind::Unary,
            Expr::Binary { .. } => ExprKind::Binary,
            Expr::Call { .. } => ExprKind::Call,
            Expr::Lambda { .. } => ExprKind::Lambda,
            Expr::List(_) => ExprKind::List,
            Expr::Conditional { .. } => ExprKind::Conditional,
            Expr::TypeIs { .. } => ExprKind::TypeIs,
            Expr::New { .. } => ExprKind::New,
            Expr::Invocation { .. } => ExprKind::Invocation,
        }
    }

    /// Builds a member chain from a `/`-separated property path.
    pub fn property(path: &str) -> Expr {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next().unwrap_or_default();
        let mut expr = Expr::Member {
            object: None,
            name: first.to_string(),
        };
        for name in segments {
            expr = Expr::Member {
                object: Some(Box::new(expr)),
                name: name.to_string(),
            };
        }
        expr
    }

    pub fn literal(literal: Literal) -> Expr {
        Expr::Literal(literal)
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn resource(resource: ResourceExpr) -> Expr {
        Expr::Resource(Box::new(resource))
    }
}

impl From<ResourceExpr> for Expr {
    fn from(resource: ResourceExpr) -> Self {
        Expr::resource(resource)
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Expr::Literal(literal)
    }
}
