use odata_uri_writer::apply::uri_token;
use odata_uri_writer::ast::{
    Aggregation, AggregationMethod, ApplyClause, BinOp, Expr, Literal, QueryOption, ResourceExpr,
};
use odata_uri_writer::{ServiceContext, TranslateError, translate};

fn sales(clause: ApplyClause) -> ResourceExpr {
    ResourceExpr::entity_set("Sales").with_option(QueryOption::Apply(clause))
}

fn uri(tree: ResourceExpr) -> Result<String, TranslateError> {
    let context = ServiceContext::new("http://host/service");
    translate(&context, &tree.into()).map(|t| t.uri)
}

fn aggregate_only(method: AggregationMethod) -> ApplyClause {
    ApplyClause {
        aggregations: vec![Aggregation::new(method, Expr::property("Amount")).with_alias("Result")],
        ..ApplyClause::default()
    }
}

fn amount_gt(n: i32) -> Expr {
    Expr::binary(
        BinOp::GreaterThan,
        Expr::property("Amount"),
        Expr::Literal(Literal::Int32(n)),
    )
}

// ========================================================================
// Token table
// ========================================================================

#[test]
fn test_every_method_token() {
    let cases = [
        (AggregationMethod::Sum, "sum"),
        (AggregationMethod::Average, "average"),
        (AggregationMethod::Min, "min"),
        (AggregationMethod::Max, "max"),
        (AggregationMethod::CountDistinct, "countdistinct"),
    ];

    for (method, token) in cases {
        assert_eq!(uri_token(&method), Some(token));
        assert_eq!(
            uri(sales(aggregate_only(method))).unwrap(),
            format!(
                "http://host/service/Sales?$apply=aggregate(Amount with {} as Result)",
                token
            )
        );
    }
}

#[test]
fn test_row_count() {
    let clause = ApplyClause {
        aggregations: vec![Aggregation::count_rows().with_alias("Rows")],
        ..ApplyClause::default()
    };
    assert_eq!(
        uri(sales(clause)).unwrap(),
        "http://host/service/Sales?$apply=aggregate($count as Rows)"
    );
}

#[test]
fn test_unlisted_method_fails() {
    let clause = aggregate_only(AggregationMethod::Custom("Median".into()));
    let err = uri(sales(clause)).unwrap_err();
    assert_eq!(
        err,
        TranslateError::UnsupportedAggregationMethod("Median".into())
    );
    assert!(err.to_string().contains("Median"));
}

// ========================================================================
// Pipeline shapes
// ========================================================================

#[test]
fn test_synthesized_alias() {
    let clause = ApplyClause {
        aggregations: vec![Aggregation::new(AggregationMethod::Sum, Expr::property("Amount"))],
        ..ApplyClause::default()
    };
    assert_eq!(
        uri(sales(clause)).unwrap(),
        "http://host/service/Sales?$apply=aggregate(Amount with sum as SumAmount)"
    );
}

#[test]
fn test_empty_alias_is_synthesized() {
    let clause = ApplyClause {
        aggregations: vec![
            Aggregation::new(AggregationMethod::Average, Expr::property("Amount")).with_alias(""),
        ],
        ..ApplyClause::default()
    };
    assert_eq!(
        uri(sales(clause)).unwrap(),
        "http://host/service/Sales?$apply=aggregate(Amount with average as AverageAmount)"
    );
}

#[test]
fn test_group_by_without_aggregation() {
    let clause = ApplyClause {
        grouping: vec![Expr::property("Category")],
        ..ApplyClause::default()
    };
    assert_eq!(
        uri(sales(clause)).unwrap(),
        "http://host/service/Sales?$apply=groupby((Category))"
    );
}

#[test]
fn test_group_by_with_aggregations() {
    let clause = ApplyClause {
        grouping: vec![Expr::property("Category"), Expr::property("Product/Color")],
        aggregations: vec![
            Aggregation::new(AggregationMethod::Sum, Expr::property("Amount")).with_alias("Total"),
            Aggregation::count_rows().with_alias("Rows"),
        ],
        predicate: None,
    };
    assert_eq!(
        uri(sales(clause)).unwrap(),
        "http://host/service/Sales?$apply=groupby((Category,Product/Color),aggregate(Amount with sum as Total,$count as Rows))"
    );
}

#[test]
fn test_filter_stage_comes_first() {
    let clause = ApplyClause {
        grouping: vec![Expr::property("Category")],
        aggregations: vec![Aggregation::new(AggregationMethod::Max, Expr::property("Amount"))],
        predicate: Some(amount_gt(1)),
    };
    assert_eq!(
        uri(sales(clause)).unwrap(),
        "http://host/service/Sales?$apply=filter(Amount gt 1)/groupby((Category),aggregate(Amount with max as MaxAmount))"
    );
}

#[test]
fn test_filter_stage_before_aggregate() {
    let clause = ApplyClause {
        aggregations: vec![Aggregation::new(AggregationMethod::Min, Expr::property("Amount"))],
        predicate: Some(amount_gt(1)),
        ..ApplyClause::default()
    };
    assert_eq!(
        uri(sales(clause)).unwrap(),
        "http://host/service/Sales?$apply=filter(Amount gt 1)/aggregate(Amount with min as MinAmount)"
    );
}

#[test]
fn test_empty_apply_adds_nothing() {
    let tree =
        sales(ApplyClause::default()).with_option(QueryOption::Apply(ApplyClause::default()));
    assert_eq!(uri(tree).unwrap(), "http://host/service/Sales");
}

#[test]
fn test_empty_apply_keeps_other_options() {
    let tree = ResourceExpr::entity_set("Sales")
        .with_option(QueryOption::Apply(ApplyClause::default()))
        .with_option(QueryOption::Filter(amount_gt(3)));
    assert_eq!(
        uri(tree).unwrap(),
        "http://host/service/Sales?$filter=Amount gt 3"
    );
}
