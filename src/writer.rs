//! Translation of a bound resource tree into a request URI.
//!
//! The writer walks the tree depth first. Path segments are written while
//! the recursion unwinds from the innermost source outwards, so the entity
//! set always comes first:
//!
//! ```text
//! <set or root>[/<member>...][<key>][/<cast>][/<operation>][/$count][?<options>][&<aliases>]
//! ```
//!
//! Query options from every visited node go into one bucket map that is
//! written once the path is complete. Function parameters that cannot be
//! inlined are moved into aliases, which always come last.

use crate::alias::AliasTable;
use crate::apply::build_apply;
use crate::ast::{CountOption, Expr, OperationInvocation, QueryOption, ResourceExpr, ResourceKind};
use crate::context::ServiceContext;
use crate::error::TranslateError;
use crate::query_options::{QueryOptionBuckets, keys};
use crate::version::{ProtocolVersion, VersionTracker};

/// Result of a successful translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub uri: String,
    /// Lowest protocol version able to serve the request
    pub version: ProtocolVersion,
}

/// Writes `tree` as a request URI.
///
/// # Examples
///
/// ```
/// use odata_uri_writer::{translate, ServiceContext};
/// use odata_uri_writer::ast::{Literal, ResourceExpr};
///
/// let context = ServiceContext::new("http://host/service");
/// let tree = ResourceExpr::entity_set("People")
///     .with_key("Id", Literal::Int32(1))
///     .with_action("DoThing");
///
/// let translation = translate(&context, &tree.into()).unwrap();
/// assert_eq!(translation.uri, "http://host/service/People(1)/DoThing");
/// assert_eq!(translation.version.to_string(), "4.0");
/// ```
pub fn translate(context: &ServiceContext, tree: &Expr) -> Result<Translation, TranslateError> {
    let mut writer = UriWriter::new(context);
    writer.visit(tree)?;
    writer.finish()
}

/// Mutable state of one translation.
pub struct UriWriter<'a> {
    context: &'a ServiceContext,
    buffer: String,
    aliases: AliasTable,
    options: QueryOptionBuckets,
    version: VersionTracker,
}

impl<'a> UriWriter<'a> {
    pub fn new(context: &'a ServiceContext) -> Self {
        UriWriter {
            context,
            buffer: String::new(),
            aliases: AliasTable::new(),
            options: QueryOptionBuckets::new(),
            version: VersionTracker::new(),
        }
    }

    pub fn visit(&mut self, expr: &Expr) -> Result<(), TranslateError> {
        match expr {
            Expr::Resource(resource) => self.visit_resource(resource),
            other => Err(TranslateError::UnsupportedExpressionKind(other.kind())),
        }
    }

    /// Appends the query string and any aliases and hands back the URI.
    pub fn finish(self) -> Result<Translation, TranslateError> {
        let mut uri = self.buffer;
        let mut query_started = false;

        if !self.options.is_empty() {
            uri.push('?');
            uri.push_str(&self.options.render());
            query_started = true;
        }

        if !self.aliases.is_empty() {
            uri.push(if query_started { '&' } else { '?' });
            uri.push_str(&self.aliases.render());
        }

        let version = self.version.current();
        log::debug!("translated request uri {} (version {})", uri, version);
        Ok(Translation { uri, version })
    }

    fn visit_resource(&mut self, resource: &ResourceExpr) -> Result<(), TranslateError> {
        match &resource.kind {
            ResourceKind::EntitySet(name) => {
                log::trace!("entity set {}", name);
                if !self.buffer.is_empty() {
                    return Err(TranslateError::InternalInvariantViolation(format!(
                        "entity set {} must start the uri but {:?} was already written",
                        name, self.buffer
                    )));
                }
                let uri = self.context.resolver().collection_uri(name);
                self.buffer.push_str(&uri);
            }
            ResourceKind::ServiceRoot => {
                log::trace!("service root");
                let uri = self.context.resolver().root_uri();
                self.buffer.push_str(&uri);
            }
            ResourceKind::Navigation { source, member } => {
                log::trace!("navigation {}", member);
                self.visit_member(source, member, resource.operation.is_some())?;
            }
            ResourceKind::Singleton { source, member } => {
                log::trace!("singleton {}", member);
                self.visit_member(source, member, resource.operation.is_some())?;
            }
        }

        self.version.raise(resource.uri_version);

        if !resource.key.is_empty() {
            let mut pairs = Vec::with_capacity(resource.key.len());
            for predicate in &resource.key {
                let value = Expr::Literal(predicate.value.clone());
                let text = self.context.formatter().format(&value, true, &mut self.version)?;
                pairs.push((predicate.property.clone(), text));
            }
            self.context.keys().append_key(&pairs, &mut self.buffer);
        }

        if let Some(cast) = &resource.type_cast {
            self.buffer.push('/');
            self.buffer.push_str(&cast.qualified_name);
            self.version.raise(cast.min_version);
        }

        if let Some(operation) = &resource.operation {
            self.write_operation(operation);
        }

        if resource.count == CountOption::Segment {
            self.buffer.push_str("/$count");
        }

        self.collect_options(resource)
    }

    fn visit_member(
        &mut self,
        source: &Expr,
        member: &str,
        invokes_operation: bool,
    ) -> Result<(), TranslateError> {
        self.visit_source(source, invokes_operation)?;
        self.buffer.push('/');
        self.buffer.push_str(member);
        Ok(())
    }

    /// Sources of operation invocations may arrive unbound; those are bound
    /// once before visiting.
    fn visit_source(
        &mut self,
        source: &Expr,
        invokes_operation: bool,
    ) -> Result<(), TranslateError> {
        match source {
            Expr::Resource(_) => self.visit(source),
            raw if invokes_operation => {
                log::trace!("binding {} source of operation invocation", raw.kind());
                let bound = self.context.binder().bind(raw)?;
                self.visit(&bound)
            }
            other => self.visit(other),
        }
    }

    fn write_operation(&mut self, operation: &OperationInvocation) {
        if !self.buffer.ends_with('/') {
            self.buffer.push('/');
        }
        self.buffer.push_str(&operation.name);

        if operation.is_action {
            return;
        }

        let mut parameters = Vec::with_capacity(operation.parameters.len());
        for parameter in &operation.parameters {
            let text = parameter.value.text();
            let value = if parameter.value.is_primitive() {
                text.to_string()
            } else {
                self.aliases.allocate(&parameter.name, text)
            };
            parameters.push(format!("{}={}", parameter.name, value));
        }

        self.buffer.push('(');
        self.buffer.push_str(&parameters.join(","));
        self.buffer.push(')');
    }

    fn collect_options(&mut self, resource: &ResourceExpr) -> Result<(), TranslateError> {
        let options = &resource.options;
        let counts_in_query = matches!(
            resource.count,
            CountOption::QueryTrue | CountOption::QueryFalse
        );
        if options.is_empty() && !counts_in_query {
            return Ok(());
        }

        for option in &options.sequence {
            match option {
                QueryOption::Skip(amount) => {
                    let value = self.format(amount)?;
                    self.options.add(keys::SKIP, value);
                }
                QueryOption::Take(amount) => {
                    let value = self.format(amount)?;
                    self.options.add(keys::TOP, value);
                }
                QueryOption::OrderBy(selectors) => {
                    if selectors.is_empty() {
                        continue;
                    }
                    let mut parts = Vec::with_capacity(selectors.len());
                    for selector in selectors {
                        let mut part = self.format(&selector.expr)?;
                        if selector.descending {
                            part.push_str(" desc");
                        }
                        parts.push(part);
                    }
                    self.options.add(keys::ORDER_BY, parts.join(","));
                }
                QueryOption::Filter(predicate) => {
                    let value = self.format(predicate)?;
                    self.options.add(keys::FILTER, value);
                }
                QueryOption::Apply(clause) => {
                    let formatter = self.context.formatter();
                    if let Some(value) = build_apply(clause, formatter, &mut self.version)? {
                        self.options.add(keys::APPLY, value);
                    }
                }
            }
        }

        if !options.expand.is_empty() {
            self.options.add(keys::EXPAND, options.expand.join(","));
        }

        if !options.select.is_empty() {
            self.options.add(keys::SELECT, options.select.join(","));
        }

        match resource.count {
            CountOption::QueryTrue => self.options.add(keys::COUNT, "true"),
            CountOption::QueryFalse => self.options.add(keys::COUNT, "false"),
            CountOption::None | CountOption::Segment => {}
        }

        for (key, value) in &options.custom {
            self.options.add(key.as_str(), value.as_str());
        }

        Ok(())
    }

    /// Formats a query-string operand.
    fn format(&mut self, expr: &Expr) -> Result<String, TranslateError> {
        let formatter = self.context.formatter();
        formatter.format(expr, false, &mut self.version)
    }
}
