//! Query validation related methods and data structures.

mod context;
mod input_value;
mod rules;
mod traits;
mod visitor;

pub use self::{
    context::{RuleError, ValidatorContext},
    input_value::validate_input_values,
    rules::visit_all_rules,
    traits::Visitor,
    visitor::visit,
};
