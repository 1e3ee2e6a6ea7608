use graphql_parser::query::{
    Directive, Field, FragmentDefinition, FragmentSpread, InlineFragment, OperationDefinition,
};

use crate::{
    executor::{operation_kind, OperationKind},
    schema::model::DirectiveLocation,
    validation::{ValidatorContext, Visitor},
};

pub struct KnownDirectives {
    location_stack: Vec<DirectiveLocation>,
}

pub fn factory() -> KnownDirectives {
    KnownDirectives {
        location_stack: Vec::new(),
    }
}

impl<'a> Visitor<'a> for KnownDirectives {
    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        op: &'a OperationDefinition<'static, String>,
    ) {
        self.location_stack.push(match operation_kind(op) {
            OperationKind::Query => DirectiveLocation::Query,
            OperationKind::Mutation => DirectiveLocation::Mutation,
            OperationKind::Subscription => DirectiveLocation::Subscription,
        });
    }

    fn exit_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a OperationDefinition<'static, String>,
    ) {
        let top = self.location_stack.pop();
        assert!(matches!(
            top,
            Some(
                DirectiveLocation::Query
                    | DirectiveLocation::Mutation
                    | DirectiveLocation::Subscription
            )
        ));
    }

    fn enter_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Field<'static, String>) {
        self.location_stack.push(DirectiveLocation::Field);
    }

    fn exit_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Field<'static, String>) {
        let top = self.location_stack.pop();
        assert_eq!(top, Some(DirectiveLocation::Field));
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a FragmentDefinition<'static, String>,
    ) {
        self.location_stack
            .push(DirectiveLocation::FragmentDefinition);
    }

    fn exit_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a FragmentDefinition<'static, String>,
    ) {
        let top = self.location_stack.pop();
        assert_eq!(top, Some(DirectiveLocation::FragmentDefinition));
    }

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a FragmentSpread<'static, String>,
    ) {
        self.location_stack.push(DirectiveLocation::FragmentSpread);
    }

    fn exit_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a FragmentSpread<'static, String>,
    ) {
        let top = self.location_stack.pop();
        assert_eq!(top, Some(DirectiveLocation::FragmentSpread));
    }

    fn enter_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a InlineFragment<'static, String>,
    ) {
        self.location_stack.push(DirectiveLocation::InlineFragment);
    }

    fn exit_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a InlineFragment<'static, String>,
    ) {
        let top = self.location_stack.pop();
        assert_eq!(top, Some(DirectiveLocation::InlineFragment));
    }

    fn enter_directive(
        &mut self,
        ctx: &mut ValidatorContext<'a>,
        directive: &'a Directive<'static, String>,
    ) {
        let Some(directive_type) = ctx.schema.directive_by_name(&directive.name) else {
            ctx.report_error(
                &format!("Unknown directive \"@{}\".", directive.name),
                &[directive.position],
            );
            return;
        };

        if let Some(current_location) = self.location_stack.last() {
            if !directive_type.locations.contains(current_location) {
                ctx.report_error(
                    &format!(
                        "Directive \"@{}\" may not be used on {current_location}.",
                        directive.name,
                    ),
                    &[directive.position],
                );
            }
        }
    }
}
