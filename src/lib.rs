pub mod alias;
pub mod apply;
pub mod ast;
pub mod cli;
pub mod context;
pub mod error;
pub mod expression_writer;
pub mod query_options;
pub mod version;
pub mod writer;

pub use ast::{Expr, Literal, ResourceExpr};
pub use context::{
    BaseUriResolver, ExpressionBinder, KeyDelimiter, KeyFormatter, PassThroughBinder,
    ScalarFormatter, ServiceContext, StaticBaseUri,
};
pub use error::TranslateError;
pub use expression_writer::ExpressionWriter;
pub use version::{ProtocolVersion, VersionTracker};
pub use writer::{Translation, UriWriter, translate};
