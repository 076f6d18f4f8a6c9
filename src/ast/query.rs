use crate::ast::Expr;

/// Query options attached to a resource node.
///
/// `sequence` keeps the order in which the options were composed; the other
/// lists are written after it regardless of when they were added.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryOptions {
    pub sequence: Vec<QueryOption>,

    /// Navigation paths for `$expand`
    pub expand: Vec<String>,

    /// Property paths for `$select`
    pub select: Vec<String>,

    /// Free-form `(key, value)` pairs; keys may repeat
    pub custom: Vec<(String, String)>,
}

impl QueryOptions {
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
            && self.expand.is_empty()
            && self.select.is_empty()
            && self.custom.is_empty()
    }
}

/// One sequence-ordered query option.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOption {
    /// `$skip`
    Skip(Expr),
    /// `$top`
    Take(Expr),
    /// `$orderby`
    OrderBy(Vec<OrderBySelector>),
    /// `$filter`
    Filter(Expr),
    /// `$apply`
    Apply(ApplyClause),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBySelector {
    pub expr: Expr,
    pub descending: bool,
}

impl OrderBySelector {
    pub fn ascending(expr: Expr) -> Self {
        OrderBySelector {
            expr,
            descending: false,
        }
    }

    pub fn descending(expr: Expr) -> Self {
        OrderBySelector {
            expr,
            descending: true,
        }
    }
}

/// Grouping and aggregation request.
///
/// # Example
/// ```text
/// filter(Amount gt 1)/groupby((Category),aggregate(Amount with sum as Total))
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplyClause {
    /// Grouped property paths, in declaration order
    pub grouping: Vec<Expr>,
    pub aggregations: Vec<Aggregation>,
    /// Filter applied before grouping
    pub predicate: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub method: AggregationMethod,
    /// Aggregated property; unused for [`AggregationMethod::VirtualPropertyCount`]
    pub expr: Option<Expr>,
    pub alias: Option<String>,
}

impl Aggregation {
    pub fn new(method: AggregationMethod, expr: Expr) -> Self {
        Aggregation {
            method,
            expr: Some(expr),
            alias: None,
        }
    }

    /// Row count (`$count as <alias>`).
    pub fn count_rows() -> Self {
        Aggregation {
            method: AggregationMethod::VirtualPropertyCount,
            expr: None,
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationMethod {
    Sum,
    Average,
    Min,
    Max,
    CountDistinct,
    /// Number of rows in the input set
    VirtualPropertyCount,
    /// Service-defined aggregate with no standard keyword
    Custom(String),
}

impl AggregationMethod {
    /// Method name used when an alias has to be made up.
    pub fn name(&self) -> &str {
        match self {
            AggregationMethod::Sum => "Sum",
            AggregationMethod::Average => "Average",
            AggregationMethod::Min => "Min",
            AggregationMethod::Max => "Max",
            AggregationMethod::CountDistinct => "CountDistinct",
            AggregationMethod::VirtualPropertyCount => "VirtualPropertyCount",
            AggregationMethod::Custom(name) => name,
        }
    }
}
