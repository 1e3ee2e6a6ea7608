mod basics;
mod defer;
mod directives;
mod mutations;
pub(crate) mod star_wars;
mod stream;
mod variables;

use std::sync::Arc;

use futures::StreamExt;

use crate::{
    execute, parse_document, ExecutionArgs, ExecutionResponse, GraphQLError, Response, Schema,
    Variables,
};

pub(crate) async fn run(
    schema: Arc<Schema>,
    query: &str,
) -> Result<ExecutionResponse, GraphQLError> {
    run_with_vars(schema, query, Variables::new()).await
}

pub(crate) async fn run_with_vars(
    schema: Arc<Schema>,
    query: &str,
    variables: Variables,
) -> Result<ExecutionResponse, GraphQLError> {
    let document = parse_document(query).expect("Parse failed");
    execute(ExecutionArgs::new(schema, document).variable_values(variables)).await
}

pub(crate) async fn run_single(schema: Arc<Schema>, query: &str) -> Response {
    run(schema, query)
        .await
        .expect("Execution failed")
        .into_complete()
        .expect("Expected a single complete result, got an incremental stream")
}

/// Runs an operation expected to produce an incremental stream and returns
/// every emitted payload in its wire form.
pub(crate) async fn run_payloads(schema: Arc<Schema>, query: &str) -> Vec<serde_json::Value> {
    let stream = run(schema, query)
        .await
        .expect("Execution failed")
        .into_incremental()
        .expect("Expected an incremental stream, got a single complete result");
    stream
        .map(|payload| serde_json::to_value(&payload).expect("Serialization failed"))
        .collect()
        .await
}
