use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::{
    graphql_value,
    meta::{Field, ObjectMeta, Type},
    Object, Resolved, Schema, Value, Variables,
};

use super::run_with_vars;

fn test_schema() -> Arc<Schema> {
    Arc::new(
        Schema::build(ObjectMeta::new(
            "TestType",
            vec![
                Field::new("a", Type::named("String")).resolver(|_| Ok(Resolved::value("a"))),
                Field::new("b", Type::named("String")).resolver(|_| Ok(Resolved::value("b"))),
            ],
        ))
        .finish(),
    )
}

async fn run_variable_query<F>(query: &str, vars: Variables, f: F)
where
    F: Fn(&Object),
{
    let response = run_with_vars(test_schema(), query, vars)
        .await
        .expect("Execution failed")
        .into_complete()
        .expect("Expected a complete result");

    assert_eq!(response.errors(), []);

    let obj = response.data().as_object_value().expect("Result is not an object");

    f(obj);
}

async fn run_query<F>(query: &str, f: F)
where
    F: Fn(&Object),
{
    run_variable_query(query, Variables::new(), f).await;
}

#[tokio::test]
async fn scalar_include_true() {
    run_query("{ a, b @include(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
    })
    .await;
}

#[tokio::test]
async fn scalar_include_false() {
    run_query("{ a, b @include(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    })
    .await;
}

#[tokio::test]
async fn scalar_skip_false() {
    run_query("{ a, b @skip(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
    })
    .await;
}

#[tokio::test]
async fn scalar_skip_true() {
    run_query("{ a, b @skip(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    })
    .await;
}

#[tokio::test]
async fn fragment_spread_include_false() {
    run_query(
        "{ a, ...Frag @include(if: false) } fragment Frag on TestType { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    )
    .await;
}

#[tokio::test]
async fn fragment_spread_skip_false() {
    run_query(
        "{ a, ...Frag @skip(if: false) } fragment Frag on TestType { b }",
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
        },
    )
    .await;
}

#[tokio::test]
async fn inline_fragment_skip_true() {
    run_query("{ a, ... on TestType @skip(if: true) { b } }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    })
    .await;
}

#[tokio::test]
async fn inline_fragment_include_true() {
    run_query("{ a, ... on TestType @include(if: true) { b } }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), Some(&graphql_value!("b")));
    })
    .await;
}

#[tokio::test]
async fn include_false_skip_false() {
    run_query("{ a, b @include(if: false) @skip(if: false) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    })
    .await;
}

#[tokio::test]
async fn include_true_skip_true() {
    run_query("{ a, b @include(if: true) @skip(if: true) }", |result| {
        assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
        assert_eq!(result.get_field_value("b"), None);
    })
    .await;
}

#[tokio::test]
async fn skip_with_variable() {
    run_variable_query(
        "query ($shouldSkip: Boolean!) { a, b @skip(if: $shouldSkip) }",
        Variables::from([("shouldSkip".to_owned(), Value::from(true))]),
        |result| {
            assert_eq!(result.get_field_value("a"), Some(&graphql_value!("a")));
            assert_eq!(result.get_field_value("b"), None);
        },
    )
    .await;
}
