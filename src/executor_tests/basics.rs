use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{graphql_value, GraphQLError, PathSegment};

use super::{run, run_single, star_wars};

#[tokio::test]
async fn simple_query() {
    let response = run_single(star_wars::schema(), "{ hero { id name } }").await;
    assert_eq!(response.errors(), []);
    assert_eq!(
        *response.data(),
        graphql_value!({"hero": {"id": "2001", "name": "R2-D2"}}),
    );
}

#[tokio::test]
async fn aliases_rename_response_keys() {
    let response = run_single(
        star_wars::schema(),
        "{ robot: hero { droidId: id droidName: name } }",
    )
    .await;
    assert_eq!(
        *response.data(),
        graphql_value!({"robot": {"droidId": "2001", "droidName": "R2-D2"}}),
    );
}

#[tokio::test]
async fn eventual_field_resolves() {
    let response = run_single(star_wars::schema(), "{ heroEventual { name } }").await;
    assert_eq!(
        *response.data(),
        graphql_value!({"heroEventual": {"name": "R2-D2"}}),
    );
}

#[tokio::test]
async fn fragment_selections_merge_in_selection_order() {
    let response = run_single(
        star_wars::schema(),
        "{ hero { ...Name id ...Function } }
         fragment Name on Droid { name }
         fragment Function on Droid { primaryFunction }",
    )
    .await;
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"data": {"hero": {
            "name": "R2-D2",
            "id": "2001",
            "primaryFunction": "Astromech",
        }}}),
    );
}

#[tokio::test]
async fn merged_field_nodes_union_their_sub_selections() {
    let response = run_single(
        star_wars::schema(),
        "{ hero { id } hero { name } }",
    )
    .await;
    assert_eq!(
        *response.data(),
        graphql_value!({"hero": {"id": "2001", "name": "R2-D2"}}),
    );
}

#[tokio::test]
async fn typename_resolves_on_concrete_types() {
    let response = run_single(star_wars::schema(), "{ hero { __typename name } }").await;
    assert_eq!(
        *response.data(),
        graphql_value!({"hero": {"__typename": "Droid", "name": "R2-D2"}}),
    );
}

#[tokio::test]
async fn interface_runtime_type_resolution() {
    let response = run_single(
        star_wars::schema(),
        r#"{ character(id: "1000") { __typename name ... on Human { homePlanet } } }"#,
    )
    .await;
    assert_eq!(response.errors(), []);
    assert_eq!(
        *response.data(),
        graphql_value!({"character": {
            "__typename": "Human",
            "name": "Luke Skywalker",
            "homePlanet": "Tatooine",
        }}),
    );
}

#[tokio::test]
async fn union_members_select_through_inline_fragments() {
    let response = run_single(
        star_wars::schema(),
        "{ search { __typename ... on Human { name } ... on Droid { primaryFunction } } }",
    )
    .await;
    assert_eq!(
        *response.data(),
        graphql_value!({"search": [
            {"__typename": "Human", "name": "Luke Skywalker"},
            {"__typename": "Droid", "primaryFunction": "Astromech"},
        ]}),
    );
}

#[tokio::test]
async fn enum_values_serialize_by_name() {
    let response = run_single(star_wars::schema(), "{ hero { appearsIn } }").await;
    assert_eq!(
        *response.data(),
        graphql_value!({"hero": {"appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"]}}),
    );
}

#[tokio::test]
async fn resolver_error_localizes_to_a_nullable_field() {
    let response = run_single(star_wars::schema(), "{ hero { name secretBackstory } }").await;
    assert_eq!(
        *response.data(),
        graphql_value!({"hero": {"name": "R2-D2", "secretBackstory": null}}),
    );
    assert_eq!(response.errors().len(), 1);
    let error = &response.errors()[0];
    assert_eq!(error.error().message(), "secretBackstory is secret.");
    assert_eq!(
        error.path(),
        [PathSegment::from("hero"), PathSegment::from("secretBackstory")],
    );
}

#[tokio::test]
async fn non_null_error_propagates_to_nearest_nullable_ancestor() {
    let response = run_single(star_wars::schema(), "{ hero { name nonNullSecret } }").await;
    assert_eq!(*response.data(), graphql_value!({"hero": null}));
    // The resolver failure is recorded once; the propagated null carries no
    // extra error.
    assert_eq!(response.errors().len(), 1);
    assert_eq!(response.errors()[0].error().message(), "nonNullSecret is secret.");
    assert_eq!(
        response.errors()[0].path(),
        [PathSegment::from("hero"), PathSegment::from("nonNullSecret")],
    );
}

#[tokio::test]
async fn wire_form_of_a_failed_field() {
    let response = run_single(star_wars::schema(), "{ hero { secretBackstory } }").await;
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "data": {"hero": {"secretBackstory": null}},
            "errors": [{
                "message": "secretBackstory is secret.",
                "locations": [{"line": 1, "column": 10}],
                "path": ["hero", "secretBackstory"],
            }],
        }),
    );
}

#[tokio::test]
async fn unknown_operation_name_is_an_input_error() {
    let result = run(star_wars::schema(), "query Q { hero { id } }").await;
    let document = crate::parse_document("query Q { hero { id } }").unwrap();
    let err = crate::execute(
        crate::ExecutionArgs::new(star_wars::schema(), document).operation_name("Missing"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GraphQLError::UnknownOperationName));
    assert!(result.is_ok());
}

#[tokio::test]
async fn multiple_operations_require_a_name() {
    let err = run(
        star_wars::schema(),
        "query A { hero { id } } query B { hero { name } }",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, GraphQLError::MultipleOperationsProvided));
}

#[tokio::test]
async fn named_operation_is_selected() {
    let document =
        crate::parse_document("query A { hero { id } } query B { hero { name } }").unwrap();
    let response = crate::execute(
        crate::ExecutionArgs::new(star_wars::schema(), document).operation_name("B"),
    )
    .await
    .unwrap()
    .into_complete()
    .unwrap();
    assert_eq!(*response.data(), graphql_value!({"hero": {"name": "R2-D2"}}));
}

#[tokio::test]
async fn subscriptions_are_rejected() {
    let err = run(star_wars::schema(), "subscription { hero { id } }")
        .await
        .unwrap_err();
    assert!(matches!(err, GraphQLError::IsSubscription));
}
