use pretty_assertions::assert_eq;
use serde_json::json;

use super::{run_payloads, run_single, star_wars};

#[tokio::test]
async fn deferred_fragment_arrives_as_a_patch() {
    let payloads = run_payloads(
        star_wars::schema(),
        r#"{ hero { id ...NameFragment @defer(label: "NameFragment") } }
           fragment NameFragment on Droid { id name }"#,
    )
    .await;

    assert_eq!(
        payloads,
        vec![
            json!({"data": {"hero": {"id": "2001"}}, "hasNext": true}),
            json!({
                "data": {"id": "2001", "name": "R2-D2"},
                "path": ["hero"],
                "label": "NameFragment",
                "hasNext": false,
            }),
        ],
    );
}

#[tokio::test]
async fn defer_disabled_via_if_is_inert() {
    let deferred = run_single(
        star_wars::schema(),
        "{ hero { id ...NameFragment @defer(if: false) } }
         fragment NameFragment on Droid { id name }",
    )
    .await;
    let plain = run_single(
        star_wars::schema(),
        "{ hero { id ...NameFragment } }
         fragment NameFragment on Droid { id name }",
    )
    .await;

    assert_eq!(
        serde_json::to_value(&deferred).unwrap(),
        serde_json::to_value(&plain).unwrap(),
    );
}

#[tokio::test]
async fn deferred_inline_fragment_at_the_root() {
    let payloads = run_payloads(
        star_wars::schema(),
        r#"{ ... @defer(label: "Root") { hero { id } } }"#,
    )
    .await;

    assert_eq!(
        payloads,
        vec![
            json!({"data": {}, "hasNext": true}),
            json!({
                "data": {"hero": {"id": "2001"}},
                "path": [],
                "label": "Root",
                "hasNext": false,
            }),
        ],
    );
}

#[tokio::test]
async fn nested_defers_emit_in_completion_order() {
    // D2 nests inside D1; D1 waits on a slow field, so D2 settles first and
    // the terminal flag rides on D1.
    let payloads = run_payloads(
        star_wars::schema(),
        r#"{ hero { id ... @defer(label: "D1") { slowField ... @defer(label: "D2") { name } } } }"#,
    )
    .await;

    assert_eq!(
        payloads,
        vec![
            json!({"data": {"hero": {"id": "2001"}}, "hasNext": true}),
            json!({
                "data": {"name": "R2-D2"},
                "path": ["hero"],
                "label": "D2",
                "hasNext": true,
            }),
            json!({
                "data": {"slowField": "slow"},
                "path": ["hero"],
                "label": "D1",
                "hasNext": false,
            }),
        ],
    );
}

#[tokio::test]
async fn errors_raised_in_deferred_work_travel_with_their_patch() {
    let payloads = run_payloads(
        star_wars::schema(),
        r#"{ hero { id ... @defer(label: "Secret") { secretBackstory } } }"#,
    )
    .await;

    assert_eq!(
        payloads,
        vec![
            json!({"data": {"hero": {"id": "2001"}}, "hasNext": true}),
            json!({
                "data": {"secretBackstory": null},
                "path": ["hero"],
                "label": "Secret",
                "errors": [{
                    "message": "secretBackstory is secret.",
                    "locations": [{"line": 1, "column": 43}],
                    "path": ["hero", "secretBackstory"],
                }],
                "hasNext": false,
            }),
        ],
    );
}

#[tokio::test]
async fn deferred_fragment_streams_its_own_list() {
    let payloads = run_payloads(
        star_wars::schema(),
        r#"{ hero { ... @defer(label: "D") {
             friends @stream(initialCount: 2, label: "S") { name }
           } } }"#,
    )
    .await;

    assert_eq!(
        payloads,
        vec![
            json!({"data": {"hero": {}}, "hasNext": true}),
            json!({
                "data": {"friends": [{"name": "Luke Skywalker"}, {"name": "Han Solo"}]},
                "path": ["hero"],
                "label": "D",
                "hasNext": true,
            }),
            json!({
                "data": {"name": "Leia Organa"},
                "path": ["hero", "friends", 2],
                "label": "S",
                "hasNext": false,
            }),
        ],
    );
}
