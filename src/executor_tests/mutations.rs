use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use pretty_assertions::assert_eq;

use crate::{
    graphql_value,
    meta::{Field, ObjectMeta, Type},
    Resolved, Schema,
};

use super::run_single;

type Log = Arc<Mutex<Vec<&'static str>>>;

/// A mutation root whose resolvers record start/finish marks, with the first
/// field deliberately slower than the second.
fn test_schema(log: Log) -> Arc<Schema> {
    let first_log = Arc::clone(&log);
    let second_log = log;

    let mutation = ObjectMeta::new(
        "Mutation",
        vec![
            Field::new("first", Type::named("Inner")).resolver(move |_| {
                let log = Arc::clone(&first_log);
                Ok(Resolved::future(async move {
                    log.lock().unwrap().push("first:start");
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    log.lock().unwrap().push("first:end");
                    Ok(Resolved::value(graphql_value!({"value": "one"})))
                }))
            }),
            Field::new("second", Type::named("Inner")).resolver(move |_| {
                let log = Arc::clone(&second_log);
                Ok(Resolved::future(async move {
                    log.lock().unwrap().push("second:start");
                    log.lock().unwrap().push("second:end");
                    Ok(Resolved::value(graphql_value!({"value": "two"})))
                }))
            }),
        ],
    );

    Arc::new(
        Schema::build(ObjectMeta::new(
            "Query",
            vec![Field::new("noop", Type::named("String"))
                .resolver(|_| Ok(Resolved::value("noop")))],
        ))
        .mutation(mutation)
        .register(
            ObjectMeta::new("Inner", vec![Field::new("value", Type::named("String"))])
                .into_meta(),
        )
        .finish(),
    )
}

#[tokio::test]
async fn mutation_fields_execute_strictly_in_source_order() {
    let log: Log = Arc::default();
    let response = run_single(
        test_schema(Arc::clone(&log)),
        "mutation { first { value } second { value } }",
    )
    .await;

    assert_eq!(response.errors(), []);
    assert_eq!(
        *response.data(),
        graphql_value!({"first": {"value": "one"}, "second": {"value": "two"}}),
    );
    // The second resolver must not start before the first one fully
    // completed, sub-selections included.
    assert_eq!(
        *log.lock().unwrap(),
        vec!["first:start", "first:end", "second:start", "second:end"],
    );
}
