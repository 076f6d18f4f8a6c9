use crate::ast::{Expr, Literal, ParameterValue, QueryOption, QueryOptions};
use crate::version::ProtocolVersion;

/// A navigable resource: the left-hand part of a request URI plus the
/// query options that apply to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceExpr {
    pub kind: ResourceKind,

    /// Derived type the resource is narrowed to
    pub type_cast: Option<TypeCast>,

    /// Key values in declaration order; empty when no key is selected
    pub key: Vec<KeyPredicate>,

    /// Bound function or action invoked on the resource
    pub operation: Option<OperationInvocation>,

    pub count: CountOption,

    /// Minimum protocol version required by this node itself
    pub uri_version: ProtocolVersion,

    pub options: QueryOptions,
}

/// What a resource node addresses.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceKind {
    /// Named entity collection at the root of the service
    ///
    /// # Example
    /// ```text
    /// https://host/service/People
    /// ```
    EntitySet(String),

    /// Bare service container, used by unbound function imports
    ServiceRoot,

    /// Collection-valued navigation from `source`
    Navigation { source: Expr, member: String },

    /// Single-valued navigation from `source`
    Singleton { source: Expr, member: String },
}

/// Type segment appended after the key.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCast {
    /// Namespace-qualified type name, e.g. `NS.Employee`
    pub qualified_name: String,
    pub min_version: ProtocolVersion,
}

impl TypeCast {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        TypeCast {
            qualified_name: qualified_name.into(),
            min_version: ProtocolVersion::BASELINE,
        }
    }
}

/// One `(property, literal)` pair of a key lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPredicate {
    /// Property name as declared on the server
    pub property: String,
    pub value: Literal,
}

/// Function or action segment.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationInvocation {
    pub name: String,
    /// Actions never carry a parameter list in the URI
    pub is_action: bool,
    pub parameters: Vec<OperationParameter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationParameter {
    pub name: String,
    pub value: ParameterValue,
}

/// How a count was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountOption {
    #[default]
    None,
    /// `/$count` path segment
    Segment,
    /// `$count=true`
    QueryTrue,
    /// `$count=false`
    QueryFalse,
}

impl ResourceExpr {
    pub fn new(kind: ResourceKind) -> Self {
        ResourceExpr {
            kind,
            type_cast: None,
            key: Vec::new(),
            operation: None,
            count: CountOption::None,
            uri_version: ProtocolVersion::BASELINE,
            options: QueryOptions::default(),
        }
    }

    pub fn entity_set(name: impl Into<String>) -> Self {
        Self::new(ResourceKind::EntitySet(name.into()))
    }

    pub fn service_root() -> Self {
        Self::new(ResourceKind::ServiceRoot)
    }

    pub fn navigation(source: impl Into<Expr>, member: impl Into<String>) -> Self {
        Self::new(ResourceKind::Navigation {
            source: source.into(),
            member: member.into(),
        })
    }

    pub fn singleton(source: impl Into<Expr>, member: impl Into<String>) -> Self {
        Self::new(ResourceKind::Singleton {
            source: source.into(),
            member: member.into(),
        })
    }

    pub fn with_key(mut self, property: impl Into<String>, value: Literal) -> Self {
        self.key.push(KeyPredicate {
            property: property.into(),
            value,
        });
        self
    }

    pub fn with_cast(mut self, cast: TypeCast) -> Self {
        self.type_cast = Some(cast);
        self
    }

    pub fn with_function(
        mut self,
        name: impl Into<String>,
        parameters: Vec<OperationParameter>,
    ) -> Self {
        self.operation = Some(OperationInvocation {
            name: name.into(),
            is_action: false,
            parameters,
        });
        self
    }

    pub fn with_action(mut self, name: impl Into<String>) -> Self {
        self.operation = Some(OperationInvocation {
            name: name.into(),
            is_action: true,
            parameters: Vec::new(),
        });
        self
    }

    pub fn with_count(mut self, count: CountOption) -> Self {
        self.count = count;
        self
    }

    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.uri_version = version;
        self
    }

    pub fn with_option(mut self, option: QueryOption) -> Self {
        self.options.sequence.push(option);
        self
    }

    pub fn with_expand(mut self, path: impl Into<String>) -> Self {
        self.options.expand.push(path.into());
        self
    }

    pub fn with_select(mut self, path: impl Into<String>) -> Self {
        self.options.select.push(path.into());
        self
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.custom.push((key.into(), value.into()));
        self
    }
}

impl OperationParameter {
    pub fn new(name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        OperationParameter {
            name: name.into(),
            value: value.into(),
        }
    }
}
