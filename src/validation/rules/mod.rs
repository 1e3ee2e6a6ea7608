pub mod known_directives;
pub mod stream_directives_on_merged_fields;

use graphql_parser::query::Document;

use crate::validation::{visit, ValidatorContext};

#[doc(hidden)]
pub fn visit_all_rules<'a>(ctx: &mut ValidatorContext<'a>, doc: &'a Document<'static, String>) {
    visit(&mut known_directives::factory(), ctx, doc);
    visit(&mut stream_directives_on_merged_fields::factory(), ctx, doc);
}
