//! Collecting a selection set into executable field groups, partitioning
//! deferred fragments into separately schedulable units.

use std::collections::HashSet;

use graphql_parser::query::{Field as AstField, Selection, SelectionSet, TypeCondition};
use indexmap::IndexMap;

use crate::{
    executor::{
        directives::{defer_directive, is_excluded},
        OperationCtx,
    },
    schema::meta::MetaType,
};

/// The outcome of collecting selection sets against a concrete object type:
/// the primary field groups (response key to merged field nodes, in
/// first-occurrence order) plus the deferred fragments encountered.
pub(crate) struct CollectedFields {
    pub fields: IndexMap<String, Vec<AstField<'static, String>>>,
    pub deferred: Vec<DeferredFragment>,
}

/// A fragment whose execution is deferred behind a patch. The anchoring
/// path, parent type and source value are those of the collection scope and
/// get attached by the caller when scheduling.
pub(crate) struct DeferredFragment {
    pub label: Option<String>,
    pub selection_set: SelectionSet<'static, String>,
}

/// Walks the given selection sets in source order against a concrete object
/// type, resolving fragment spreads and inline fragments, applying
/// `@skip`/`@include`, and splitting off `@defer`red fragments.
///
/// Collection itself never fails; unknown fragments are the validator's
/// responsibility and are silently ignored here.
pub(crate) fn collect_fields(
    ctx: &OperationCtx,
    object_type: &MetaType,
    selection_sets: &[&SelectionSet<'static, String>],
) -> CollectedFields {
    let mut collected = CollectedFields {
        fields: IndexMap::new(),
        deferred: Vec::new(),
    };
    let mut visited_fragments = HashSet::new();
    for set in selection_sets {
        collect_into(ctx, object_type, set, &mut collected, &mut visited_fragments);
    }
    collected
}

fn collect_into(
    ctx: &OperationCtx,
    object_type: &MetaType,
    set: &SelectionSet<'static, String>,
    collected: &mut CollectedFields,
    visited_fragments: &mut HashSet<String>,
) {
    for selection in &set.items {
        match selection {
            Selection::Field(f) => {
                if is_excluded(&f.directives, &ctx.schema, &ctx.variables) {
                    continue;
                }
                let response_key = f.alias.as_ref().unwrap_or(&f.name);
                collected
                    .fields
                    .entry(response_key.clone())
                    .or_default()
                    .push(f.clone());
            }
            Selection::InlineFragment(frag) => {
                if is_excluded(&frag.directives, &ctx.schema, &ctx.variables) {
                    continue;
                }
                let condition = frag
                    .type_condition
                    .as_ref()
                    .map(|TypeCondition::On(name)| name.as_str());
                if !ctx
                    .schema
                    .fragment_condition_applies(object_type, condition)
                {
                    continue;
                }
                match defer_directive(&frag.directives, &ctx.schema, &ctx.variables) {
                    Some(defer) => collected.deferred.push(DeferredFragment {
                        label: defer.label,
                        selection_set: frag.selection_set.clone(),
                    }),
                    None => collect_into(
                        ctx,
                        object_type,
                        &frag.selection_set,
                        collected,
                        visited_fragments,
                    ),
                }
            }
            Selection::FragmentSpread(spread) => {
                if is_excluded(&spread.directives, &ctx.schema, &ctx.variables) {
                    continue;
                }
                let Some(fragment) = ctx.fragments.get(&spread.fragment_name) else {
                    continue;
                };
                let TypeCondition::On(condition) = &fragment.type_condition;
                if !ctx
                    .schema
                    .fragment_condition_applies(object_type, Some(condition.as_str()))
                {
                    continue;
                }
                match defer_directive(&spread.directives, &ctx.schema, &ctx.variables) {
                    // A deferred spread is partitioned off even when the same
                    // fragment was already collected inline.
                    Some(defer) => collected.deferred.push(DeferredFragment {
                        label: defer.label,
                        selection_set: fragment.selection_set.clone(),
                    }),
                    None => {
                        if visited_fragments.insert(spread.fragment_name.clone()) {
                            collect_into(
                                ctx,
                                object_type,
                                &fragment.selection_set,
                                collected,
                                visited_fragments,
                            );
                        }
                    }
                }
            }
        }
    }
}
