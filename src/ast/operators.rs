/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Comparison
    /// Equal (`eq`)
    Equal,
    /// Not equal (`ne`)
    NotEqual,
    /// Less than (`lt`)
    LessThan,
    /// Greater than (`gt`)
    GreaterThan,
    /// Less than or equal (`le`)
    LessEqual,
    /// Greater than or equal (`ge`)
    GreaterEqual,
    /// Enum flag test (`has`)
    Has,
    /// Membership in a literal list (`in`, protocol 4.01)
    In,

    // Arithmetic
    /// Addition (`add`)
    Add,
    /// Subtraction (`sub`)
    Subtract,
    /// Multiplication (`mul`)
    Multiply,
    /// Division (`div`)
    Divide,
    /// Modulo (`mod`)
    Modulo,

    // Logical
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
}

impl BinOp {
    /// The operator keyword as written in a filter expression.
    pub fn keyword(self) -> &'static str {
        match self {
            BinOp::Equal => "eq",
            BinOp::NotEqual => "ne",
            BinOp::LessThan => "lt",
            BinOp::GreaterThan => "gt",
            BinOp::LessEqual => "le",
            BinOp::GreaterEqual => "ge",
            BinOp::Has => "has",
            BinOp::In => "in",
            BinOp::Add => "add",
            BinOp::Subtract => "sub",
            BinOp::Multiply => "mul",
            BinOp::Divide => "div",
            BinOp::Modulo => "mod",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }

    /// Looks an operator up by its keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let op = match keyword {
            "eq" => BinOp::Equal,
            "ne" => BinOp::NotEqual,
            "lt" => BinOp::LessThan,
            "gt" => BinOp::GreaterThan,
            "le" => BinOp::LessEqual,
            "ge" => BinOp::GreaterEqual,
            "has" => BinOp::Has,
            "in" => BinOp::In,
            "add" => BinOp::Add,
            "sub" => BinOp::Subtract,
            "mul" => BinOp::Multiply,
            "div" => BinOp::Divide,
            "mod" => BinOp::Modulo,
            "and" => BinOp::And,
            "or" => BinOp::Or,
            _ => return None,
        };
        Some(op)
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Equal
            | BinOp::NotEqual
            | BinOp::LessThan
            | BinOp::GreaterThan
            | BinOp::LessEqual
            | BinOp::GreaterEqual
            | BinOp::Has
            | BinOp::In => 3,
            BinOp::Add | BinOp::Subtract => 4,
            BinOp::Multiply | BinOp::Divide | BinOp::Modulo => 5,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation (`not`)
    Not,
    /// Arithmetic negation (`-`)
    Negate,
}
