use odata_uri_writer::ast::{
    BinOp, CountOption, Expr, Literal, OrderBySelector, QueryOption, ResourceExpr,
};
use odata_uri_writer::{ServiceContext, translate};

fn uri(tree: ResourceExpr) -> String {
    let context = ServiceContext::new("http://host/service");
    translate(&context, &tree.into()).unwrap().uri
}

fn people() -> ResourceExpr {
    ResourceExpr::entity_set("People")
}

fn int(n: i32) -> Expr {
    Expr::Literal(Literal::Int32(n))
}

#[test]
fn test_order_by_selectors() {
    let tree = people().with_option(QueryOption::OrderBy(vec![
        OrderBySelector::ascending(Expr::property("LastName")),
        OrderBySelector::descending(Expr::property("Age")),
    ]));
    assert_eq!(
        uri(tree),
        "http://host/service/People?$orderby=LastName,Age desc"
    );
}

#[test]
fn test_sequence_order_is_kept() {
    let tree = people()
        .with_option(QueryOption::Take(int(10)))
        .with_option(QueryOption::Skip(int(20)))
        .with_option(QueryOption::OrderBy(vec![OrderBySelector::ascending(
            Expr::property("Name"),
        )]));
    assert_eq!(
        uri(tree),
        "http://host/service/People?$top=10&$skip=20&$orderby=Name"
    );
}

#[test]
fn test_independent_options_follow_sequence() {
    // expand/select/count/custom were added before the sequence options
    let tree = people()
        .with_custom("debug", "1")
        .with_count(CountOption::QueryTrue)
        .with_select("Name")
        .with_select("Age")
        .with_expand("Friends")
        .with_expand("Trips")
        .with_option(QueryOption::Filter(Expr::binary(
            BinOp::GreaterThan,
            Expr::property("Age"),
            int(10),
        )));
    assert_eq!(
        uri(tree),
        "http://host/service/People?$filter=Age gt 10&$expand=Friends,Trips&$select=Name,Age&$count=true&debug=1"
    );
}

#[test]
fn test_count_false() {
    let tree = people().with_count(CountOption::QueryFalse);
    assert_eq!(uri(tree), "http://host/service/People?$count=false");
}

#[test]
fn test_repeated_custom_keys_merge() {
    let tree = people().with_custom("a", "1").with_custom("b", "x").with_custom("a", "2");
    assert_eq!(uri(tree), "http://host/service/People?a=1,2&b=x");
}

#[test]
fn test_repeated_sequence_options_merge() {
    let tree = people()
        .with_option(QueryOption::Filter(Expr::property("Active")))
        .with_option(QueryOption::Take(int(5)))
        .with_option(QueryOption::Filter(Expr::property("Verified")));
    assert_eq!(
        uri(tree),
        "http://host/service/People?$filter=Active,Verified&$top=5"
    );
}

#[test]
fn test_options_from_source_nodes_are_merged() {
    let source = people()
        .with_key("Id", Literal::Int32(1))
        .with_custom("tenant", "a");
    let tree = ResourceExpr::navigation(source, "Friends").with_option(QueryOption::Take(int(3)));
    assert_eq!(
        uri(tree),
        "http://host/service/People(1)/Friends?tenant=a&$top=3"
    );
}

#[test]
fn test_empty_order_by_is_skipped() {
    let tree = people().with_option(QueryOption::OrderBy(vec![]));
    assert_eq!(uri(tree), "http://host/service/People");
}
