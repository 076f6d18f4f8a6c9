//! # Bound Query Tree
//!
//! This module defines the tree that the URI writer consumes: a resource
//! path (entity set, navigation hops, key lookups, type casts, bound
//! operations) with the query options attached to each resource node.
//!
//! ## Organization
//!
//! - **[expressions]** - The [`Expr`] node type and its kind discriminant
//! - **[resource]** - Resource nodes and their path decorations
//! - **[query]** - Query options, ordering and `$apply` clauses
//! - **[literal]** - Constant values and operation parameter values
//! - **[operators]** - Unary and binary operators
//!
//! ## Shape of a Tree
//!
//! ```text
//! Navigation("Orders")            -> .../People(1)/Orders?$top=5
//!   source: EntitySet("People")
//!             key: [Id = 1]
//!   options: [Take(5)]
//! ```
//!
//! Trees are assumed to be bound and validated already. The writer never
//! looks anything up in a data model.
pub mod expressions;
pub mod literal;
pub mod operators;
pub mod query;
pub mod resource;

pub use expressions::{Expr, ExprKind, LambdaKind};
pub use literal::{Literal, ParameterValue};
pub use operators::{BinOp, UnaryOp};
pub use query::{
    Aggregation, AggregationMethod, ApplyClause, OrderBySelector, QueryOption, QueryOptions,
};
pub use resource::{
    CountOption, KeyPredicate, OperationInvocation, OperationParameter, ResourceExpr,
    ResourceKind, TypeCast,
};
