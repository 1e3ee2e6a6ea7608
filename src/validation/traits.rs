use graphql_parser::query::{
    Directive, Field, FragmentDefinition, FragmentSpread, InlineFragment, OperationDefinition,
    SelectionSet,
};

use crate::validation::ValidatorContext;

#[doc(hidden)]
pub trait Visitor<'a> {
    fn enter_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a OperationDefinition<'static, String>,
    ) {
    }
    fn exit_operation_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a OperationDefinition<'static, String>,
    ) {
    }

    fn enter_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a FragmentDefinition<'static, String>,
    ) {
    }
    fn exit_fragment_definition(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a FragmentDefinition<'static, String>,
    ) {
    }

    fn enter_selection_set(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a SelectionSet<'static, String>,
    ) {
    }
    fn exit_selection_set(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a SelectionSet<'static, String>,
    ) {
    }

    fn enter_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Field<'static, String>) {}
    fn exit_field(&mut self, _: &mut ValidatorContext<'a>, _: &'a Field<'static, String>) {}

    fn enter_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a FragmentSpread<'static, String>,
    ) {
    }
    fn exit_fragment_spread(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a FragmentSpread<'static, String>,
    ) {
    }

    fn enter_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a InlineFragment<'static, String>,
    ) {
    }
    fn exit_inline_fragment(
        &mut self,
        _: &mut ValidatorContext<'a>,
        _: &'a InlineFragment<'static, String>,
    ) {
    }

    fn enter_directive(&mut self, _: &mut ValidatorContext<'a>, _: &'a Directive<'static, String>) {
    }
    fn exit_directive(&mut self, _: &mut ValidatorContext<'a>, _: &'a Directive<'static, String>) {
    }
}
