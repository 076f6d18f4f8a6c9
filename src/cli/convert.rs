//! JSON tree document -> bound query tree conversion

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::CliError;
use crate::ast::{
    Aggregation, AggregationMethod, ApplyClause, BinOp, CountOption, Expr, LambdaKind, Literal,
    OperationParameter, OrderBySelector, ParameterValue, QueryOption, ResourceExpr, TypeCast,
    UnaryOp,
};
use crate::version::ProtocolVersion;

static GUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("guid pattern is valid")
});

static DATE_TIME_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})$")
        .expect("date-time pattern is valid")
});

const RESOURCE_KEYS: [&str; 4] = ["entitySet", "serviceRoot", "navigation", "singleton"];

fn invalid(msg: impl Into<String>) -> CliError {
    CliError::InvalidTree(msg.into())
}

/// Convert a tree document to an expression tree
pub fn json_to_tree(v: &Value) -> Result<Expr, CliError> {
    match v {
        Value::Object(obj) if RESOURCE_KEYS.iter().any(|k| obj.contains_key(*k)) => {
            Ok(Expr::resource(json_to_resource(obj)?))
        }
        Value::Object(obj) => json_to_scalar(obj),
        Value::Array(_) => Err(invalid("arrays are only allowed as list operands")),
        primitive => Ok(Expr::Literal(json_to_literal(primitive)?)),
    }
}

fn json_to_resource(obj: &Map<String, Value>) -> Result<ResourceExpr, CliError> {
    let mut resource = if let Some(name) = obj.get("entitySet") {
        ResourceExpr::entity_set(as_str(name, "entitySet")?)
    } else if obj.contains_key("serviceRoot") {
        ResourceExpr::service_root()
    } else if let Some(member) = obj.get("navigation") {
        ResourceExpr::navigation(source(obj)?, as_str(member, "navigation")?)
    } else if let Some(member) = obj.get("singleton") {
        ResourceExpr::singleton(source(obj)?, as_str(member, "singleton")?)
    } else {
        return Err(invalid("resource node needs entitySet, serviceRoot, navigation or singleton"));
    };

    if let Some(version) = obj.get("version") {
        resource.uri_version = json_to_version(version)?;
    }

    for pair in as_array(obj.get("key"), "key")? {
        let (name, value) = as_pair(pair, "key")?;
        resource = resource.with_key(name, json_to_literal(value)?);
    }

    if let Some(cast) = obj.get("cast") {
        resource = resource.with_cast(json_to_cast(cast)?);
    }

    if let Some(name) = obj.get("function") {
        let mut parameters = Vec::new();
        for pair in as_array(obj.get("parameters"), "parameters")? {
            let (name, value) = as_pair(pair, "parameters")?;
            parameters.push(OperationParameter::new(name, json_to_parameter(value)?));
        }
        resource = resource.with_function(as_str(name, "function")?, parameters);
    } else if let Some(name) = obj.get("action") {
        resource = resource.with_action(as_str(name, "action")?);
    }

    if let Some(count) = obj.get("count") {
        resource = resource.with_count(match count {
            Value::String(s) if s == "segment" => CountOption::Segment,
            Value::Bool(true) => CountOption::QueryTrue,
            Value::Bool(false) => CountOption::QueryFalse,
            other => {
                return Err(invalid(format!(
                    "count must be \"segment\", true or false, got {}",
                    other
                )));
            }
        });
    }

    for option in as_array(obj.get("options"), "options")? {
        resource = resource.with_option(json_to_option(option)?);
    }

    for path in as_array(obj.get("expand"), "expand")? {
        resource = resource.with_expand(as_str(path, "expand")?);
    }

    for path in as_array(obj.get("select"), "select")? {
        resource = resource.with_select(as_str(path, "select")?);
    }

    for pair in as_array(obj.get("custom"), "custom")? {
        let (key, value) = as_pair(pair, "custom")?;
        resource = resource.with_custom(key, as_str(value, "custom")?);
    }

    Ok(resource)
}

fn source(obj: &Map<String, Value>) -> Result<Expr, CliError> {
    let source = obj
        .get("source")
        .ok_or_else(|| invalid("navigation and singleton nodes need a source"))?;
    json_to_tree(source)
}

fn json_to_cast(v: &Value) -> Result<TypeCast, CliError> {
    match v {
        Value::String(name) => Ok(TypeCast::new(name.as_str())),
        Value::Object(obj) => {
            let name = field_str(obj, "name", "cast.name")?;
            let mut cast = TypeCast::new(name);
            if let Some(version) = obj.get("version") {
                cast.min_version = json_to_version(version)?;
            }
            Ok(cast)
        }
        other => Err(invalid(format!("cast must be a type name, got {}", other))),
    }
}

fn json_to_version(v: &Value) -> Result<ProtocolVersion, CliError> {
    let text = as_str(v, "version")?;
    ProtocolVersion::parse(text)
        .ok_or_else(|| invalid(format!("invalid protocol version '{}'", text)))
}

fn json_to_option(v: &Value) -> Result<QueryOption, CliError> {
    let obj = match v {
        Value::Object(obj) if obj.len() == 1 => obj,
        other => {
            return Err(invalid(format!(
                "query option must be a single-key object, got {}",
                other
            )));
        }
    };
    let (name, value) = obj
        .iter()
        .next()
        .ok_or_else(|| invalid("empty query option"))?;

    match name.as_str() {
        "skip" => Ok(QueryOption::Skip(json_to_tree(value)?)),
        "top" => Ok(QueryOption::Take(json_to_tree(value)?)),
        "filter" => Ok(QueryOption::Filter(json_to_tree(value)?)),
        "orderBy" => {
            let mut selectors = Vec::new();
            for selector in as_array(Some(value), "orderBy")? {
                selectors.push(json_to_selector(selector)?);
            }
            Ok(QueryOption::OrderBy(selectors))
        }
        "apply" => Ok(QueryOption::Apply(json_to_apply(value)?)),
        other => Err(invalid(format!("unknown query option '{}'", other))),
    }
}

fn json_to_selector(v: &Value) -> Result<OrderBySelector, CliError> {
    match v {
        Value::String(path) => Ok(OrderBySelector::ascending(Expr::property(path))),
        Value::Object(obj) if obj.contains_key("expr") => {
            let expr = json_to_tree(&obj["expr"])?;
            let descending = obj.get("desc").and_then(Value::as_bool).unwrap_or(false);
            Ok(OrderBySelector { expr, descending })
        }
        other => Err(invalid(format!("invalid orderBy selector {}", other))),
    }
}

fn json_to_apply(v: &Value) -> Result<ApplyClause, CliError> {
    let obj = v
        .as_object()
        .ok_or_else(|| invalid("apply must be an object"))?;

    let mut clause = ApplyClause::default();
    for group in as_array(obj.get("groupBy"), "groupBy")? {
        clause.grouping.push(match group {
            Value::String(path) => Expr::property(path),
            other => json_to_tree(other)?,
        });
    }
    for aggregation in as_array(obj.get("aggregate"), "aggregate")? {
        clause.aggregations.push(json_to_aggregation(aggregation)?);
    }
    if let Some(predicate) = obj.get("filter") {
        clause.predicate = Some(json_to_tree(predicate)?);
    }
    Ok(clause)
}

fn json_to_aggregation(v: &Value) -> Result<Aggregation, CliError> {
    let obj = v
        .as_object()
        .ok_or_else(|| invalid("aggregation must be an object"))?;
    let method = field_str(obj, "method", "aggregate.method")?;
    let method = match method.to_lowercase().as_str() {
        "sum" => AggregationMethod::Sum,
        "average" | "avg" => AggregationMethod::Average,
        "min" => AggregationMethod::Min,
        "max" => AggregationMethod::Max,
        "countdistinct" => AggregationMethod::CountDistinct,
        "$count" | "count" => AggregationMethod::VirtualPropertyCount,
        _ => AggregationMethod::Custom(method.to_string()),
    };
    let expr = match obj.get("property") {
        Some(Value::String(path)) => Some(Expr::property(path)),
        Some(other) => Some(json_to_tree(other)?),
        None => None,
    };
    let alias = match obj.get("as") {
        Some(alias) => Some(as_str(alias, "aggregate.as")?.to_string()),
        None => None,
    };
    Ok(Aggregation { method, expr, alias })
}

fn json_to_parameter(v: &Value) -> Result<ParameterValue, CliError> {
    if let Some(raw) = v.as_object().and_then(|obj| obj.get("raw")) {
        return Ok(ParameterValue::from_serialized(as_str(raw, "raw")?));
    }
    Ok(ParameterValue::from_literal(&json_to_literal(v)?))
}

fn json_to_scalar(obj: &Map<String, Value>) -> Result<Expr, CliError> {
    if let Some(path) = obj.get("property") {
        return Ok(Expr::property(as_str(path, "property")?));
    }
    if let Some(name) = obj.get("param") {
        return Ok(Expr::Parameter(as_str(name, "param")?.to_string()));
    }
    if let Some(op) = obj.get("op") {
        let keyword = as_str(op, "op")?;
        let op = BinOp::from_keyword(keyword)
            .ok_or_else(|| invalid(format!("unknown operator '{}'", keyword)))?;
        let left = obj
            .get("left")
            .ok_or_else(|| invalid("binary node needs left"))?;
        let right = obj
            .get("right")
            .ok_or_else(|| invalid("binary node needs right"))?;
        let (left, right) = (json_to_tree(left)?, json_to_tree(right)?);
        return Ok(Expr::binary(op, left, right));
    }
    if let Some(operand) = obj.get("not") {
        return Ok(Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(json_to_tree(operand)?),
        });
    }
    if let Some(operand) = obj.get("negate") {
        return Ok(Expr::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(json_to_tree(operand)?),
        });
    }
    if let Some(function) = obj.get("call") {
        let mut args = Vec::new();
        for arg in as_array(obj.get("args"), "args")? {
            args.push(json_to_tree(arg)?);
        }
        return Ok(Expr::Call {
            function: as_str(function, "call")?.to_string(),
            args,
        });
    }
    if let Some(items) = obj.get("list") {
        let mut list = Vec::new();
        for item in as_array(Some(items), "list")? {
            list.push(json_to_tree(item)?);
        }
        return Ok(Expr::List(list));
    }
    for (key, kind) in [("any", LambdaKind::Any), ("all", LambdaKind::All)] {
        if let Some(collection) = obj.get(key) {
            let variable = field_str(obj, "var", "var")?;
            let body = obj
                .get("body")
                .ok_or_else(|| invalid("lambda needs a body"))?;
            let body = json_to_tree(body)?;
            return Ok(Expr::Lambda {
                kind,
                collection: Box::new(Expr::property(as_str(collection, key)?)),
                variable: variable.to_string(),
                body: Box::new(body),
            });
        }
    }
    Ok(Expr::Literal(json_to_literal(&Value::Object(obj.clone()))?))
}

/// Convert a JSON value to a literal; tagged objects select a typed literal,
/// any other object or array is a JSON literal.
fn json_to_literal(v: &Value) -> Result<Literal, CliError> {
    match v {
        Value::Null => Ok(Literal::Null),
        Value::Bool(b) => Ok(Literal::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(match i32::try_from(i) {
                    Ok(small) => Literal::Int32(small),
                    Err(_) => Literal::Int64(i),
                })
            } else {
                n.as_f64()
                    .map(Literal::Double)
                    .ok_or_else(|| invalid(format!("number {} out of range", n)))
            }
        }
        Value::String(s) => Ok(Literal::String(s.clone())),
        Value::Object(obj) => json_to_tagged_literal(obj),
        Value::Array(_) => Ok(Literal::Json(v.clone())),
    }
}

fn json_to_tagged_literal(obj: &Map<String, Value>) -> Result<Literal, CliError> {
    if let Some(guid) = obj.get("guid") {
        let text = as_str(guid, "guid")?;
        if !GUID.is_match(text) {
            return Err(invalid(format!("'{}' is not a guid", text)));
        }
        return Ok(Literal::Guid(text.to_string()));
    }
    if let Some(stamp) = obj.get("dateTimeOffset") {
        let text = as_str(stamp, "dateTimeOffset")?;
        if !DATE_TIME_OFFSET.is_match(text) {
            return Err(invalid(format!("'{}' is not a date-time with offset", text)));
        }
        return Ok(Literal::DateTimeOffset(text.to_string()));
    }
    if let Some(decimal) = obj.get("decimal") {
        let text = match decimal {
            Value::Number(n) => n.to_string(),
            other => as_str(other, "decimal")?.to_string(),
        };
        let value = Decimal::from_str(&text)
            .map_err(|e| invalid(format!("invalid decimal '{}': {}", text, e)))?;
        return Ok(Literal::Decimal(value));
    }
    if let Some(type_name) = obj.get("enum") {
        let member = field_str(obj, "member", "member")?;
        return Ok(Literal::Enum {
            type_name: as_str(type_name, "enum")?.to_string(),
            member: member.to_string(),
        });
    }
    if let Some(json) = obj.get("json") {
        return Ok(Literal::Json(json.clone()));
    }
    Ok(Literal::Json(Value::Object(obj.clone())))
}

fn as_str<'v>(v: &'v Value, field: &str) -> Result<&'v str, CliError> {
    v.as_str()
        .ok_or_else(|| invalid(format!("{} must be a string, got {}", field, v)))
}

fn field_str<'v>(obj: &'v Map<String, Value>, key: &str, field: &str) -> Result<&'v str, CliError> {
    match obj.get(key) {
        Some(v) => as_str(v, field),
        None => Err(invalid(format!("{} is required", field))),
    }
}

fn as_array<'v>(v: Option<&'v Value>, field: &str) -> Result<&'v [Value], CliError> {
    match v {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(invalid(format!("{} must be an array, got {}", field, other))),
    }
}

fn as_pair<'v>(v: &'v Value, field: &str) -> Result<(&'v str, &'v Value), CliError> {
    match v {
        Value::Array(items) if items.len() == 2 => Ok((as_str(&items[0], field)?, &items[1])),
        other => Err(invalid(format!(
            "{} entries must be [name, value] pairs, got {}",
            field, other
        ))),
    }
}
