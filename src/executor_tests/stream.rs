use pretty_assertions::assert_eq;
use serde_json::json;

use crate::GraphQLError;

use super::{run, run_payloads, run_single, star_wars};

#[tokio::test]
async fn stream_is_unknown_when_the_schema_does_not_enable_it() {
    let err = run(
        star_wars::schema_without_incremental_delivery(),
        r#"{ hero { friends @stream(initialCount: 0, label: "HeroFriends") { id name } } }"#,
    )
    .await
    .unwrap_err();

    let GraphQLError::ValidationError(errors) = err else {
        panic!("Expected a validation error");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Unknown directive \"@stream\".");
    assert_eq!(errors[0].locations()[0].line, 1);
}

#[tokio::test]
async fn stream_disabled_via_if_is_inert() {
    let streamed = run_single(
        star_wars::schema(),
        r#"{ hero { friends @stream(if: false, initialCount: 1, label: "HeroFriends") { name } } }"#,
    )
    .await;
    let plain = run_single(star_wars::schema(), "{ hero { friends { name } } }").await;

    assert_eq!(
        serde_json::to_value(&streamed).unwrap(),
        serde_json::to_value(&plain).unwrap(),
    );
    assert_eq!(
        serde_json::to_value(&plain).unwrap(),
        json!({"data": {"hero": {"friends": [
            {"name": "Luke Skywalker"},
            {"name": "Han Solo"},
            {"name": "Leia Organa"},
        ]}}}),
    );
}

#[tokio::test]
async fn streamed_tail_elements_arrive_as_patches() {
    let payloads = run_payloads(
        star_wars::schema(),
        r#"{ hero { friends @stream(initialCount: 2, label: "HeroFriends") { id name } } }"#,
    )
    .await;

    assert_eq!(
        payloads,
        vec![
            json!({
                "data": {"hero": {"friends": [
                    {"id": "1000", "name": "Luke Skywalker"},
                    {"id": "1002", "name": "Han Solo"},
                ]}},
                "hasNext": true,
            }),
            json!({
                "data": {"id": "1003", "name": "Leia Organa"},
                "path": ["hero", "friends", 2],
                "label": "HeroFriends",
                "hasNext": false,
            }),
        ],
    );
}

#[tokio::test]
async fn per_item_errors_stay_with_their_patch() {
    let mut payloads = run_payloads(
        star_wars::schema(),
        "{ hero { friends @stream(initialCount: 0) { secretFriend } } }",
    )
    .await;

    assert_eq!(
        payloads.remove(0),
        json!({"data": {"hero": {"friends": []}}, "hasNext": true}),
    );
    assert_eq!(payloads.len(), 3);

    // Patches surface in completion order; compare by index.
    assert_eq!(payloads.iter().filter(|p| p["hasNext"] == json!(false)).count(), 1);
    assert_eq!(payloads.last().unwrap()["hasNext"], json!(false));
    payloads.sort_by_key(|p| p["path"][2].as_u64());
    for (index, payload) in payloads.iter().enumerate() {
        assert_eq!(payload["data"], json!({"secretFriend": null}));
        assert_eq!(payload["path"], json!(["hero", "friends", index]));
        assert_eq!(
            payload["errors"],
            json!([{
                "message": "secretFriend is secret.",
                "locations": [{"line": 1, "column": 45}],
                "path": ["hero", "friends", index, "secretFriend"],
            }]),
        );
    }
}

#[tokio::test]
async fn async_iterator_stream_closes_with_a_marker_patch() {
    let payloads = run_payloads(
        star_wars::schema(),
        r#"{ hero { friendsStream @stream(initialCount: 2, label: "Stream") { name } } }"#,
    )
    .await;

    assert_eq!(
        payloads,
        vec![
            json!({
                "data": {"hero": {"friendsStream": [
                    {"name": "Luke Skywalker"},
                    {"name": "Han Solo"},
                ]}},
                "hasNext": true,
            }),
            json!({
                "data": {"name": "Leia Organa"},
                "path": ["hero", "friendsStream", 2],
                "label": "Stream",
                "hasNext": true,
            }),
            json!({
                "data": {"name": "Chewbacca"},
                "path": ["hero", "friendsStream", 3],
                "label": "Stream",
                "hasNext": true,
            }),
            json!({"hasNext": false}),
        ],
    );
}

#[tokio::test]
async fn eventual_elements_emit_in_completion_order_with_their_indices() {
    let payloads = run_payloads(
        star_wars::schema(),
        "{ hero { friendsEventual @stream(initialCount: 0) { name } } }",
    )
    .await;

    // The fixture resolves later elements faster, so patches arrive in
    // reverse index order, each anchored at its source index.
    assert_eq!(
        payloads,
        vec![
            json!({"data": {"hero": {"friendsEventual": []}}, "hasNext": true}),
            json!({
                "data": {"name": "Leia Organa"},
                "path": ["hero", "friendsEventual", 2],
                "hasNext": true,
            }),
            json!({
                "data": {"name": "Han Solo"},
                "path": ["hero", "friendsEventual", 1],
                "hasNext": true,
            }),
            json!({
                "data": {"name": "Luke Skywalker"},
                "path": ["hero", "friendsEventual", 0],
                "hasNext": false,
            }),
        ],
    );
}

#[tokio::test]
async fn negative_initial_count_is_a_located_field_error() {
    let response = run_single(
        star_wars::schema(),
        "{ hero { friends @stream(initialCount: -2) { name } } }",
    )
    .await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "data": {"hero": {"friends": null}},
            "errors": [{
                "message": "initialCount must be a non-negative integer",
                "locations": [{"line": 1, "column": 10}],
                "path": ["hero", "friends"],
            }],
        }),
    );
}

#[tokio::test]
async fn initial_count_covering_the_whole_list_schedules_no_patches() {
    let response = run_single(
        star_wars::schema(),
        "{ hero { friends @stream(initialCount: 5) { name } } }",
    )
    .await;
    assert_eq!(
        *response.data(),
        crate::graphql_value!({"hero": {"friends": [
            {"name": "Luke Skywalker"},
            {"name": "Han Solo"},
            {"name": "Leia Organa"},
        ]}}),
    );
}
