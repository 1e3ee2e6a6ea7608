//! Field selections that merge under one response key must agree on their
//! `@stream` directives, or carry none at all. Aliasing the fields resolves
//! the conflict.

use std::collections::HashSet;

use graphql_parser::{
    query::{Directive, Field, Selection, SelectionSet, TypeCondition},
    Pos,
};
use indexmap::IndexMap;

use crate::{
    schema::meta::MetaType,
    validation::{ValidatorContext, Visitor},
};

pub struct StreamDirectivesOnMergedFields;

pub fn factory() -> StreamDirectivesOnMergedFields {
    StreamDirectivesOnMergedFields
}

struct FieldEntry<'a> {
    field: &'a Field<'static, String>,
    scope_type: &'a MetaType,
}

impl<'a> Visitor<'a> for StreamDirectivesOnMergedFields {
    fn enter_selection_set(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        set: &'a SelectionSet<'static, String>,
    ) {
        let Some(scope_type) = ctx.current_type() else {
            return;
        };
        if !scope_type.is_composite() {
            return;
        }

        let mut by_response_key: IndexMap<&str, Vec<FieldEntry<'a>>> = IndexMap::new();
        let mut visited_fragments = HashSet::new();
        gather(ctx, scope_type, set, &mut by_response_key, &mut visited_fragments);

        let mut conflicts: Vec<(String, Vec<Pos>)> = Vec::new();
        for (response_key, entries) in &by_response_key {
            for (i, a) in entries.iter().enumerate() {
                for b in &entries[i + 1..] {
                    if !ctx.schema.type_overlap(a.scope_type, b.scope_type) {
                        continue;
                    }
                    if !stream_directives_match(a.field, b.field) {
                        conflicts.push((
                            format!(
                                "Fields \"{response_key}\" conflict because they have differing \
                                 stream directives. Use different aliases on the fields to fetch \
                                 both if this was intentional",
                            ),
                            vec![a.field.position, b.field.position],
                        ));
                    }
                }
            }
        }
        for (message, locations) in conflicts {
            ctx.report_error(&message, &locations);
        }
    }
}

/// Flattens the selection set one field level deep, resolving fragment
/// spreads and inline fragments so that every selection merging into this
/// scope is seen. Nested field sub-selections get their own visit.
fn gather<'a>(
    ctx: &ValidatorContext<'a>,
    scope_type: &'a MetaType,
    set: &'a SelectionSet<'static, String>,
    by_response_key: &mut IndexMap<&'a str, Vec<FieldEntry<'a>>>,
    visited_fragments: &mut HashSet<&'a str>,
) {
    for selection in &set.items {
        match selection {
            Selection::Field(field) => {
                let response_key = field.alias.as_ref().unwrap_or(&field.name).as_str();
                by_response_key
                    .entry(response_key)
                    .or_default()
                    .push(FieldEntry { field, scope_type });
            }
            Selection::InlineFragment(frag) => {
                let on_type = match &frag.type_condition {
                    Some(TypeCondition::On(name)) => ctx.schema.concrete_type_by_name(name),
                    None => Some(scope_type),
                };
                if let Some(on_type) = on_type {
                    gather(ctx, on_type, &frag.selection_set, by_response_key, visited_fragments);
                }
            }
            Selection::FragmentSpread(spread) => {
                if !visited_fragments.insert(spread.fragment_name.as_str()) {
                    continue;
                }
                let Some(fragment) = ctx.fragments.get(spread.fragment_name.as_str()) else {
                    continue;
                };
                let TypeCondition::On(condition) = &fragment.type_condition;
                if let Some(on_type) = ctx.schema.concrete_type_by_name(condition) {
                    gather(
                        ctx,
                        on_type,
                        &fragment.selection_set,
                        by_response_key,
                        visited_fragments,
                    );
                }
            }
        }
    }
}

/// Literal comparison of the two selections' `@stream` usages: both absent,
/// or both present with identical argument ASTs.
fn stream_directives_match(a: &Field<'static, String>, b: &Field<'static, String>) -> bool {
    match (stream_directive(a), stream_directive(b)) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            let mut a_args = a.arguments.clone();
            let mut b_args = b.arguments.clone();
            a_args.sort_by(|(x, _), (y, _)| x.cmp(y));
            b_args.sort_by(|(x, _), (y, _)| x.cmp(y));
            a_args == b_args
        }
        _ => false,
    }
}

fn stream_directive<'f>(field: &'f Field<'static, String>) -> Option<&'f Directive<'static, String>> {
    field.directives.iter().find(|d| d.name == "stream")
}
