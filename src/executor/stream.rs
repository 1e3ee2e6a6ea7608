//! The stream driver: inline delivery of the first `initialCount` list
//! elements, with the remainder emitted as individual patches.

use std::sync::Arc;

use futures::{stream::BoxStream, StreamExt};
use graphql_parser::query::Field as AstField;

use crate::{
    executor::{
        complete::{complete_element, complete_sequence, Completion, PropagateNull},
        directives::StreamDirective,
        dispatcher::Patch,
        path::ResponsePath,
        ExecScope, FieldResult,
    },
    resolve::Resolved,
    schema::meta::Type,
    value::Value,
};

/// Completes a streamed list backed by an ordered sequence: elements up to
/// `initialCount` appear inline, every further element becomes its own
/// patch. Patches emit in completion order, each carrying its source index.
pub(crate) async fn complete_stream_sequence(
    scope: &ExecScope,
    item_type: &Type,
    nodes: &[AstField<'static, String>],
    coordinate: &str,
    path: &ResponsePath,
    mut items: Vec<Resolved>,
    directive: StreamDirective,
) -> Completion {
    let remainder = items.split_off(directive.initial_count.min(items.len()));
    let inline =
        complete_sequence(scope, item_type, nodes, coordinate, path, items, 0).await?;

    let shared = Arc::new(StreamCtx {
        nodes: nodes.to_vec(),
        item_type: item_type.clone(),
        coordinate: coordinate.to_owned(),
        label: directive.label,
        list_path: path.clone(),
    });

    for (offset, item) in remainder.into_iter().enumerate() {
        let index = directive.initial_count + offset;
        let patch_scope = scope.patch_scope();
        let shared = Arc::clone(&shared);
        tracing::debug!(index, label = shared.label.as_deref(), "streaming list element");
        scope.ctx.dispatcher.schedule(Box::pin(async move {
            element_patch(&patch_scope, &shared, index, item).await
        }));
    }

    Ok(Value::List(inline))
}

/// Completes a streamed list backed by an async iterator: `initialCount`
/// elements are drawn eagerly and appear inline; afterwards each drawn
/// element is scheduled as a patch, and iterator completion is marked by a
/// closing patch with no data and no path.
pub(crate) async fn complete_stream_iterator(
    scope: &ExecScope,
    item_type: &Type,
    nodes: &[AstField<'static, String>],
    coordinate: &str,
    path: &ResponsePath,
    mut source: BoxStream<'static, FieldResult<Resolved>>,
    directive: StreamDirective,
) -> Completion {
    let mut inline = Vec::with_capacity(directive.initial_count);
    for index in 0..directive.initial_count {
        match source.next().await {
            // The iterator finished inside the inline window: the list is
            // already complete and the stream never enters its patch phase.
            None => return Ok(Value::List(inline)),
            Some(Err(e)) => {
                scope.push_error(e, nodes[0].position, path);
                return Err(PropagateNull);
            }
            Some(Ok(item)) => {
                let element_path = path.index(index);
                inline.push(
                    complete_element(scope, item_type, nodes, coordinate, &element_path, item)
                        .await?,
                );
            }
        }
    }

    let shared = Arc::new(StreamCtx {
        nodes: nodes.to_vec(),
        item_type: item_type.clone(),
        coordinate: coordinate.to_owned(),
        label: directive.label,
        list_path: path.clone(),
    });
    schedule_next_pull(scope, shared, source, directive.initial_count);

    Ok(Value::List(inline))
}

/// Everything a stream patch worker needs from its field, owned so workers
/// outlive the synchronous walk.
struct StreamCtx {
    nodes: Vec<AstField<'static, String>>,
    item_type: Type,
    coordinate: String,
    label: Option<String>,
    list_path: ResponsePath,
}

/// Schedules the pull of the next iterator element. On an element, the
/// follow-up pull is scheduled before the element's own completion runs, so
/// the terminal flag never fires early. On iterator errors the stream stops;
/// on exhaustion the closing patch is emitted.
fn schedule_next_pull(
    scope: &ExecScope,
    shared: Arc<StreamCtx>,
    mut source: BoxStream<'static, FieldResult<Resolved>>,
    index: usize,
) {
    let patch_scope = scope.patch_scope();
    scope.ctx.dispatcher.schedule(Box::pin(async move {
        match source.next().await {
            None => Patch::closing(),
            Some(Err(e)) => {
                let element_path = shared.list_path.index(index);
                patch_scope.push_error(e, shared.nodes[0].position, &element_path);
                Patch {
                    data: Some(Value::Null),
                    path: Some(element_path.to_vec()),
                    label: shared.label.clone(),
                    errors: patch_scope.take_errors(),
                }
            }
            Some(Ok(item)) => {
                schedule_next_pull(&patch_scope, Arc::clone(&shared), source, index + 1);
                element_patch(&patch_scope, &shared, index, item).await
            }
        }
    }));
}

/// Completes one streamed element in its own errors scope and shapes the
/// patch. A null propagating out of the element surfaces as `data: null`.
async fn element_patch(
    patch_scope: &ExecScope,
    shared: &StreamCtx,
    index: usize,
    item: Resolved,
) -> Patch {
    let element_path = shared.list_path.index(index);
    let data = complete_element(
        patch_scope,
        &shared.item_type,
        &shared.nodes,
        &shared.coordinate,
        &element_path,
        item,
    )
    .await
    .unwrap_or(Value::Null);
    Patch {
        data: Some(data),
        path: Some(element_path.to_vec()),
        label: shared.label.clone(),
        errors: patch_scope.take_errors(),
    }
}
