//! Value completion: shaping resolved values by their declared types,
//! recursing into sub-selections, and propagating nullability.

use futures::{
    future::BoxFuture,
    stream::{FuturesOrdered, StreamExt},
};
use graphql_parser::query::{Field as AstField, SelectionSet};
use indexmap::IndexMap;

use crate::{
    executor::{
        collect::{collect_fields, CollectedFields, DeferredFragment},
        directives::stream_directive,
        dispatcher::Patch,
        path::ResponsePath,
        stream, ExecScope, FieldError,
    },
    resolve::{Arguments, Resolved, ResolverContext},
    schema::meta::{Field as FieldMeta, MetaType, Type},
    value::{Object, Value},
};

/// Marker for a null travelling up to the nearest nullable ancestor. The
/// located error has already been recorded by whoever raised this.
pub(crate) struct PropagateNull;

pub(crate) type Completion = Result<Value, PropagateNull>;

/// Collects the given selection sets against a concrete object type,
/// schedules every deferred fragment encountered, and executes the primary
/// field groups.
pub(crate) fn execute_selection_set<'a>(
    scope: &'a ExecScope,
    object_type: &'a MetaType,
    source: &'a Value,
    path: &'a ResponsePath,
    selection_sets: &'a [&'a SelectionSet<'static, String>],
    serial: bool,
) -> BoxFuture<'a, Completion> {
    Box::pin(async move {
        let CollectedFields { fields, deferred } =
            collect_fields(&scope.ctx, object_type, selection_sets);

        for fragment in deferred {
            schedule_deferred(scope, object_type, source, path, fragment);
        }

        if serial {
            execute_fields_serially(scope, object_type, source, path, &fields).await
        } else {
            execute_fields(scope, object_type, source, path, &fields).await
        }
    })
}

/// Hands a deferred fragment to the dispatcher. The worker re-collects the
/// fragment's selection set against the same runtime type, source and path,
/// with a fresh errors sink of its own.
fn schedule_deferred(
    scope: &ExecScope,
    object_type: &MetaType,
    source: &Value,
    path: &ResponsePath,
    fragment: DeferredFragment,
) {
    let patch_scope = scope.patch_scope();
    let type_name = object_type.name().clone();
    let source = source.clone();
    let path = path.clone();
    let DeferredFragment {
        label,
        selection_set,
    } = fragment;

    tracing::debug!(label = label.as_deref(), "deferring fragment execution");
    scope.ctx.dispatcher.schedule(Box::pin(async move {
        let object_type = patch_scope
            .ctx
            .schema
            .concrete_type_by_name(&type_name)
            .expect("Type not found in schema");
        let data = execute_selection_set(
            &patch_scope,
            object_type,
            &source,
            &path,
            &[&selection_set],
            false,
        )
        .await
        .unwrap_or(Value::Null);
        Patch {
            data: Some(data),
            path: Some(path.to_vec()),
            label,
            errors: patch_scope.take_errors(),
        }
    }));
}

/// Executes field groups with parallel start: resolvers may settle in any
/// order, while the result object keeps selection order.
async fn execute_fields(
    scope: &ExecScope,
    object_type: &MetaType,
    source: &Value,
    path: &ResponsePath,
    fields: &IndexMap<String, Vec<AstField<'static, String>>>,
) -> Completion {
    let mut resolved = FuturesOrdered::new();
    for (response_key, nodes) in fields {
        resolved.push_back(resolve_field(scope, object_type, response_key, nodes, source, path));
    }

    let mut object = Object::with_capacity(fields.len());
    while let Some(field) = resolved.next().await {
        let (key, value) = field?;
        object.add_field(key, value);
    }
    Ok(Value::Object(object))
}

/// Executes field groups strictly in source order; each field completes,
/// sub-selections included, before the next one starts.
async fn execute_fields_serially(
    scope: &ExecScope,
    object_type: &MetaType,
    source: &Value,
    path: &ResponsePath,
    fields: &IndexMap<String, Vec<AstField<'static, String>>>,
) -> Completion {
    let mut object = Object::with_capacity(fields.len());
    for (response_key, nodes) in fields {
        let (key, value) =
            resolve_field(scope, object_type, response_key, nodes, source, path).await?;
        object.add_field(key, value);
    }
    Ok(Value::Object(object))
}

/// Resolves and completes one field group entry, applying the nullability
/// rule at the field boundary.
async fn resolve_field(
    scope: &ExecScope,
    object_type: &MetaType,
    response_key: &str,
    nodes: &[AstField<'static, String>],
    source: &Value,
    parent_path: &ResponsePath,
) -> Result<(String, Value), PropagateNull> {
    let node = &nodes[0];

    if node.name == "__typename" {
        return Ok((
            response_key.to_owned(),
            Value::scalar(object_type.name().as_str()),
        ));
    }

    let field_meta = object_type.field_by_name(&node.name).unwrap_or_else(|| {
        panic!(
            "Field {} not found on type {}",
            node.name,
            object_type.name()
        )
    });
    let coordinate = format!("{}.{}", object_type.name(), node.name);
    let path = parent_path.key(response_key);

    let args = coerce_argument_values(scope, field_meta, node);
    let resolver = field_meta
        .resolver
        .as_ref()
        .unwrap_or(&scope.ctx.field_resolver);
    let resolved = resolver(ResolverContext {
        source,
        field_name: &node.name,
        args: &args,
        context: &scope.ctx.context_value,
    });

    let completed = match resolved {
        Ok(value) => {
            complete_value(scope, &field_meta.field_type, nodes, &coordinate, &path, value).await
        }
        Err(e) => {
            scope.push_error(e, node.position, &path);
            Err(PropagateNull)
        }
    };

    match completed {
        Ok(value) => Ok((response_key.to_owned(), value)),
        Err(p) if field_meta.field_type.is_non_null() => Err(p),
        Err(_) => Ok((response_key.to_owned(), Value::Null)),
    }
}

/// Reads the field's argument values against its argument definitions,
/// substituting variables and falling back to schema defaults. Arguments not
/// declared on the definition are ignored.
fn coerce_argument_values(
    scope: &ExecScope,
    field_meta: &FieldMeta,
    node: &AstField<'static, String>,
) -> Arguments {
    let mut args = Arguments::new();
    for arg_def in &field_meta.arguments {
        let provided = node
            .arguments
            .iter()
            .find(|(name, _)| *name == arg_def.name.as_str());
        match provided {
            Some((_, ast)) => args.insert(
                arg_def.name.as_str(),
                crate::executor::coerce_ast_value(ast, &scope.ctx.variables),
            ),
            None => {
                if let Some(default) = &arg_def.default_value {
                    args.insert(arg_def.name.as_str(), default.clone());
                }
            }
        }
    }
    args
}

/// Completes a resolved value against its declared type, producing the
/// response-shaped value.
///
/// Returns [`PropagateNull`] when a located error was recorded inside a
/// non-null region; the caller at the nearest nullable boundary turns it
/// into a `null`.
pub(crate) fn complete_value<'a>(
    scope: &'a ExecScope,
    field_type: &'a Type,
    nodes: &'a [AstField<'static, String>],
    coordinate: &'a str,
    path: &'a ResponsePath,
    resolved: Resolved,
) -> BoxFuture<'a, Completion> {
    Box::pin(async move {
        // Eventual values settle first, then complete as their type.
        let resolved = match resolved {
            Resolved::Future(eventual) => {
                return match eventual.await {
                    Ok(value) => {
                        complete_value(scope, field_type, nodes, coordinate, path, value).await
                    }
                    Err(e) => {
                        scope.push_error(e, nodes[0].position, path);
                        Err(PropagateNull)
                    }
                };
            }
            settled => settled,
        };

        match field_type {
            Type::NonNullNamed(_) | Type::NonNullList(_) => {
                let inner = field_type.nullable();
                let value = complete_value(scope, &inner, nodes, coordinate, path, resolved).await?;
                if value.is_null() {
                    scope.push_error(
                        FieldError::from(format!(
                            "Cannot return null for non-nullable field {coordinate}.",
                        )),
                        nodes[0].position,
                        path,
                    );
                    Err(PropagateNull)
                } else {
                    Ok(value)
                }
            }
            Type::List(item_type) => {
                complete_list(scope, item_type, nodes, coordinate, path, resolved).await
            }
            Type::Named(name) => {
                let meta = scope
                    .ctx
                    .schema
                    .concrete_type_by_name(name)
                    .unwrap_or_else(|| panic!("Type {name} not found in schema"));
                match meta {
                    MetaType::Scalar(scalar) => {
                        let value = expect_plain_value(scope, nodes, path, resolved)?;
                        if value.is_null() {
                            return Ok(Value::Null);
                        }
                        match scalar.serialize(&value) {
                            Ok(serialized) => Ok(serialized),
                            Err(message) => {
                                scope.push_error(
                                    FieldError::from(message),
                                    nodes[0].position,
                                    path,
                                );
                                Err(PropagateNull)
                            }
                        }
                    }
                    MetaType::Enum(e) => {
                        let value = expect_plain_value(scope, nodes, path, resolved)?;
                        if value.is_null() {
                            return Ok(Value::Null);
                        }
                        match value.as_string_value() {
                            Some(s) if e.values.iter().any(|v| v.name == s) => {
                                Ok(Value::scalar(s))
                            }
                            _ => {
                                scope.push_error(
                                    FieldError::from(format!(
                                        "Enum \"{}\" cannot represent value: {value}",
                                        e.name,
                                    )),
                                    nodes[0].position,
                                    path,
                                );
                                Err(PropagateNull)
                            }
                        }
                    }
                    MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_) => {
                        complete_composite(scope, meta, nodes, path, resolved).await
                    }
                    MetaType::InputObject(_) => {
                        scope.push_error(
                            FieldError::from(format!(
                                "Type {name} cannot be used in output positions",
                            )),
                            nodes[0].position,
                            path,
                        );
                        Err(PropagateNull)
                    }
                }
            }
        }
    })
}

fn expect_plain_value(
    scope: &ExecScope,
    nodes: &[AstField<'static, String>],
    path: &ResponsePath,
    resolved: Resolved,
) -> Result<Value, PropagateNull> {
    match resolved {
        Resolved::Value(v) => Ok(v),
        Resolved::List(_) | Resolved::Stream(_) => {
            scope.push_error(
                FieldError::from("Resolved a sequence for a non-list field"),
                nodes[0].position,
                path,
            );
            Err(PropagateNull)
        }
        Resolved::Future(_) => unreachable!("eventual values settle before completion"),
    }
}

/// Completes a list-typed field, delegating to the stream driver when the
/// field carries an active `@stream`.
async fn complete_list(
    scope: &ExecScope,
    item_type: &Type,
    nodes: &[AstField<'static, String>],
    coordinate: &str,
    path: &ResponsePath,
    resolved: Resolved,
) -> Completion {
    let node = &nodes[0];
    let stream_dir = match stream_directive(&node.directives, &scope.ctx.schema, &scope.ctx.variables)
    {
        Ok(dir) => dir,
        Err(e) => {
            scope.push_error(e, node.position, path);
            return Err(PropagateNull);
        }
    };

    let items = match resolved {
        Resolved::Value(Value::Null) => return Ok(Value::Null),
        Resolved::Stream(source) => {
            return match stream_dir {
                Some(dir) => {
                    stream::complete_stream_iterator(
                        scope, item_type, nodes, coordinate, path, source, dir,
                    )
                    .await
                }
                None => {
                    // No active stream directive: drain the iterator to
                    // completion before proceeding.
                    let mut source = source;
                    let mut items = Vec::new();
                    while let Some(item) = source.next().await {
                        match item {
                            Ok(item) => items.push(item),
                            Err(e) => {
                                scope.push_error(e, node.position, path);
                                return Err(PropagateNull);
                            }
                        }
                    }
                    complete_sequence(scope, item_type, nodes, coordinate, path, items, 0)
                        .await
                        .map(Value::list)
                }
            };
        }
        Resolved::List(items) => items,
        Resolved::Value(Value::List(values)) => {
            values.into_iter().map(Resolved::Value).collect()
        }
        Resolved::Value(other) => {
            scope.push_error(
                FieldError::from(format!(
                    "Expected a list value for field {coordinate}, found: {other}",
                )),
                node.position,
                path,
            );
            return Err(PropagateNull);
        }
        Resolved::Future(_) => unreachable!("eventual values settle before completion"),
    };

    match stream_dir {
        Some(dir) => {
            stream::complete_stream_sequence(scope, item_type, nodes, coordinate, path, items, dir)
                .await
        }
        None => complete_sequence(scope, item_type, nodes, coordinate, path, items, 0)
            .await
            .map(Value::list),
    }
}

/// Completes a sequence of list elements, each at its index path. Elements
/// complete concurrently; the list settles when all of them do, applying the
/// nullability rule at each element boundary.
pub(crate) async fn complete_sequence(
    scope: &ExecScope,
    item_type: &Type,
    nodes: &[AstField<'static, String>],
    coordinate: &str,
    path: &ResponsePath,
    items: Vec<Resolved>,
    start_index: usize,
) -> Result<Vec<Value>, PropagateNull> {
    let elements = items.into_iter().enumerate().map(|(i, item)| {
        let element_path = path.index(start_index + i);
        async move {
            complete_element(scope, item_type, nodes, coordinate, &element_path, item).await
        }
    });
    futures::future::join_all(elements)
        .await
        .into_iter()
        .collect()
}

/// Completes one list element, turning a propagated null into a `null`
/// element when the item type permits it.
pub(crate) async fn complete_element(
    scope: &ExecScope,
    item_type: &Type,
    nodes: &[AstField<'static, String>],
    coordinate: &str,
    element_path: &ResponsePath,
    item: Resolved,
) -> Completion {
    match complete_value(scope, item_type, nodes, coordinate, element_path, item).await {
        Ok(value) => Ok(value),
        Err(p) if item_type.is_non_null() => Err(p),
        Err(_) => Ok(Value::Null),
    }
}

/// Completes an object-, interface- or union-typed field: resolves the
/// runtime type when the declared type is abstract, then collects and
/// executes the merged sub-selections. Deferred-group emission happens here,
/// inside [`execute_selection_set`].
async fn complete_composite(
    scope: &ExecScope,
    declared_type: &MetaType,
    nodes: &[AstField<'static, String>],
    path: &ResponsePath,
    resolved: Resolved,
) -> Completion {
    let node = &nodes[0];
    let source = expect_plain_value(scope, nodes, path, resolved)?;
    if source.is_null() {
        return Ok(Value::Null);
    }

    let runtime_type = if declared_type.is_abstract() {
        let type_name =
            match (scope.ctx.type_resolver)(&source, &scope.ctx.context_value).await {
                Ok(name) => name,
                Err(e) => {
                    scope.push_error(e, node.position, path);
                    return Err(PropagateNull);
                }
            };
        let Some(runtime_type) = scope.ctx.schema.concrete_type_by_name(&type_name) else {
            scope.push_error(
                FieldError::from(format!(
                    "Abstract type \"{}\" was resolved to a type \"{type_name}\" \
                     that does not exist in the schema",
                    declared_type.name(),
                )),
                node.position,
                path,
            );
            return Err(PropagateNull);
        };
        if !matches!(runtime_type, MetaType::Object(_))
            || !scope.ctx.schema.is_possible_type(declared_type, runtime_type)
        {
            scope.push_error(
                FieldError::from(format!(
                    "Runtime object type \"{type_name}\" is not a possible type for \"{}\"",
                    declared_type.name(),
                )),
                node.position,
                path,
            );
            return Err(PropagateNull);
        }
        runtime_type
    } else {
        declared_type
    };

    // Sub-selections of merged field nodes are unioned by re-collection at
    // the point of descent.
    let selection_sets: Vec<&SelectionSet<'static, String>> =
        nodes.iter().map(|n| &n.selection_set).collect();
    execute_selection_set(scope, runtime_type, &source, path, &selection_sets, false).await
}
