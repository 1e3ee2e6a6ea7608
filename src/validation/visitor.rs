use graphql_parser::query::{
    Definition, Directive, Document, Field, OperationDefinition, Selection, SelectionSet,
    TypeCondition,
};

use crate::{
    executor::{operation_kind, operation_selection_set, OperationKind},
    schema::meta::MetaType,
    validation::{traits::Visitor, ValidatorContext},
};

#[doc(hidden)]
pub fn visit<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    document: &'a Document<'static, String>,
) {
    for def in &document.definitions {
        match def {
            Definition::Operation(op) => {
                let root_type = match operation_kind(op) {
                    OperationKind::Query => Some(ctx.schema.concrete_query_type()),
                    OperationKind::Mutation => ctx.schema.concrete_mutation_type(),
                    OperationKind::Subscription => None,
                };
                ctx.with_pushed_type(root_type, |ctx| {
                    v.enter_operation_definition(ctx, op);
                    visit_directives(v, ctx, operation_directives(op));
                    visit_selection_set(v, ctx, operation_selection_set(op));
                    v.exit_operation_definition(ctx, op);
                });
            }
            Definition::Fragment(f) => {
                let TypeCondition::On(condition) = &f.type_condition;
                let on_type = ctx.schema.concrete_type_by_name(condition);
                ctx.with_pushed_type(on_type, |ctx| {
                    v.enter_fragment_definition(ctx, f);
                    visit_directives(v, ctx, &f.directives);
                    visit_selection_set(v, ctx, &f.selection_set);
                    v.exit_fragment_definition(ctx, f);
                });
            }
        }
    }
}

fn operation_directives<'d>(
    op: &'d OperationDefinition<'static, String>,
) -> &'d [Directive<'static, String>] {
    match op {
        OperationDefinition::SelectionSet(_) => &[],
        OperationDefinition::Query(q) => &q.directives,
        OperationDefinition::Mutation(m) => &m.directives,
        OperationDefinition::Subscription(s) => &s.directives,
    }
}

fn visit_selection_set<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    set: &'a SelectionSet<'static, String>,
) {
    v.enter_selection_set(ctx, set);
    for selection in &set.items {
        match selection {
            Selection::Field(f) => {
                let field_type = field_result_type(ctx, f);
                ctx.with_pushed_type(field_type, |ctx| {
                    v.enter_field(ctx, f);
                    visit_directives(v, ctx, &f.directives);
                    if !f.selection_set.items.is_empty() {
                        visit_selection_set(v, ctx, &f.selection_set);
                    }
                    v.exit_field(ctx, f);
                });
            }
            Selection::FragmentSpread(spread) => {
                v.enter_fragment_spread(ctx, spread);
                visit_directives(v, ctx, &spread.directives);
                v.exit_fragment_spread(ctx, spread);
            }
            Selection::InlineFragment(frag) => {
                let on_type = match &frag.type_condition {
                    Some(TypeCondition::On(name)) => ctx.schema.concrete_type_by_name(name),
                    None => ctx.current_type(),
                };
                ctx.with_pushed_type(on_type, |ctx| {
                    v.enter_inline_fragment(ctx, frag);
                    visit_directives(v, ctx, &frag.directives);
                    visit_selection_set(v, ctx, &frag.selection_set);
                    v.exit_inline_fragment(ctx, frag);
                });
            }
        }
    }
    v.exit_selection_set(ctx, set);
}

fn field_result_type<'a>(
    ctx: &ValidatorContext<'a>,
    field: &Field<'static, String>,
) -> Option<&'a MetaType> {
    let parent = ctx.current_type()?;
    let meta_field = parent.field_by_name(&field.name)?;
    ctx.schema
        .concrete_type_by_name(meta_field.field_type.innermost_name())
}

fn visit_directives<'a, V: Visitor<'a>>(
    v: &mut V,
    ctx: &mut ValidatorContext<'a>,
    directives: &'a [Directive<'static, String>],
) {
    for directive in directives {
        v.enter_directive(ctx, directive);
        v.exit_directive(ctx, directive);
    }
}
