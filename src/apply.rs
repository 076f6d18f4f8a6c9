//! `$apply` pipeline construction.
//!
//! ```text
//! aggregate(Amount with sum as SumAmount)
//! groupby((Category))
//! filter(Amount gt 1)/groupby((Category),aggregate(Amount with sum as Total,$count as Rows))
//! ```

use crate::ast::{Aggregation, AggregationMethod, ApplyClause, Expr};
use crate::context::ScalarFormatter;
use crate::error::TranslateError;
use crate::version::VersionTracker;

/// Keyword for an aggregation method, or `None` when `$apply` has no
/// standard spelling for it.
pub fn uri_token(method: &AggregationMethod) -> Option<&'static str> {
    match method {
        AggregationMethod::Sum => Some("sum"),
        AggregationMethod::Average => Some("average"),
        AggregationMethod::Min => Some("min"),
        AggregationMethod::Max => Some("max"),
        AggregationMethod::CountDistinct => Some("countdistinct"),
        AggregationMethod::VirtualPropertyCount => Some("$count"),
        AggregationMethod::Custom(_) => None,
    }
}

/// Builds the `$apply` value, or `None` when the clause neither groups nor
/// aggregates.
pub fn build_apply(
    clause: &ApplyClause,
    formatter: &dyn ScalarFormatter,
    version: &mut VersionTracker,
) -> Result<Option<String>, TranslateError> {
    if clause.aggregations.is_empty() && clause.grouping.is_empty() {
        return Ok(None);
    }

    let mut pipeline = String::new();
    if let Some(predicate) = &clause.predicate {
        pipeline.push_str("filter(");
        pipeline.push_str(&formatter.format(predicate, false, version)?);
        pipeline.push_str(")/");
    }

    let aggregate = if clause.aggregations.is_empty() {
        None
    } else {
        Some(build_aggregate(&clause.aggregations, formatter, version)?)
    };

    match (clause.grouping.is_empty(), aggregate) {
        (true, Some(aggregate)) => pipeline.push_str(&aggregate),
        (true, None) => {}
        (false, aggregate) => {
            pipeline.push_str("groupby(");
            pipeline.push_str(&build_grouping(&clause.grouping, formatter, version)?);
            if let Some(aggregate) = aggregate {
                pipeline.push(',');
                pipeline.push_str(&aggregate);
            }
            pipeline.push(')');
        }
    }

    Ok(Some(pipeline))
}

/// `aggregate(<entry>,<entry>,...)`
fn build_aggregate(
    aggregations: &[Aggregation],
    formatter: &dyn ScalarFormatter,
    version: &mut VersionTracker,
) -> Result<String, TranslateError> {
    let entries = aggregations
        .iter()
        .map(|aggregation| build_aggregate_entry(aggregation, formatter, version))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("aggregate({})", entries.join(",")))
}

fn build_aggregate_entry(
    aggregation: &Aggregation,
    formatter: &dyn ScalarFormatter,
    version: &mut VersionTracker,
) -> Result<String, TranslateError> {
    let method = &aggregation.method;
    let token = uri_token(method)
        .ok_or_else(|| TranslateError::UnsupportedAggregationMethod(method.name().to_string()))?;

    let property = match (method, &aggregation.expr) {
        (AggregationMethod::VirtualPropertyCount, _) => String::new(),
        (_, Some(expr)) => formatter.format(expr, false, version)?,
        (_, None) => {
            return Err(TranslateError::InternalInvariantViolation(format!(
                "aggregation {} has no property to aggregate",
                method.name()
            )));
        }
    };

    let alias = match &aggregation.alias {
        Some(alias) if !alias.is_empty() => alias.clone(),
        _ => format!("{}{}", method.name(), property.replace('/', "_")),
    };

    if property.is_empty() {
        Ok(format!("{} as {}", token, alias))
    } else {
        Ok(format!("{} with {} as {}", property, token, alias))
    }
}

/// `(<path>,<path>,...)`
fn build_grouping(
    grouping: &[Expr],
    formatter: &dyn ScalarFormatter,
    version: &mut VersionTracker,
) -> Result<String, TranslateError> {
    let paths = grouping
        .iter()
        .map(|expr| formatter.format(expr, false, version))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("({})", paths.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, Literal};
    use crate::expression_writer::ExpressionWriter;

    fn build(clause: &ApplyClause) -> Result<Option<String>, TranslateError> {
        let mut version = VersionTracker::new();
        build_apply(clause, &ExpressionWriter::new(), &mut version)
    }

    #[test]
    fn test_empty_clause_is_omitted() {
        assert_eq!(build(&ApplyClause::default()), Ok(None));
    }

    #[test]
    fn test_predicate_only_is_omitted() {
        let clause = ApplyClause {
            predicate: Some(Expr::binary(
                BinOp::GreaterThan,
                Expr::property("Amount"),
                Expr::Literal(Literal::Int32(1)),
            )),
            ..ApplyClause::default()
        };
        assert_eq!(build(&clause), Ok(None));
    }

    #[test]
    fn test_alias_from_nested_path() {
        let clause = ApplyClause {
            aggregations: vec![Aggregation::new(
                AggregationMethod::Max,
                Expr::property("Product/Price"),
            )],
            ..ApplyClause::default()
        };
        assert_eq!(
            build(&clause).unwrap().as_deref(),
            Some("aggregate(Product/Price with max as MaxProduct_Price)")
        );
    }

    #[test]
    fn test_missing_property_is_invariant_violation() {
        let clause = ApplyClause {
            aggregations: vec![Aggregation {
                method: AggregationMethod::Sum,
                expr: None,
                alias: None,
            }],
            ..ApplyClause::default()
        };
        assert!(matches!(
            build(&clause),
            Err(TranslateError::InternalInvariantViolation(_))
        ));
    }
}
