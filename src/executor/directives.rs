//! Reading the execution directives (`@skip`, `@include`, `@defer`,
//! `@stream`) off AST nodes against the current variable bindings.

use graphql_parser::query::{Directive, Value as AstValue};

use crate::{
    executor::{FieldError, FieldResult, Variables},
    schema::model::Schema,
    value::{Object, Value},
};

/// Coerces an AST input value into a runtime [`Value`], substituting
/// variables. An unbound variable coerces to `null`.
pub(crate) fn coerce_ast_value(ast: &AstValue<'static, String>, vars: &Variables) -> Value {
    match ast {
        AstValue::Variable(name) => vars.get(name).cloned().unwrap_or(Value::Null),
        AstValue::Int(n) => match n.as_i64() {
            Some(i) if i32::try_from(i).is_ok() => Value::scalar(i as i32),
            Some(i) => Value::scalar(i as f64),
            None => Value::Null,
        },
        AstValue::Float(f) => Value::scalar(*f),
        AstValue::String(s) => Value::scalar(s.as_str()),
        AstValue::Boolean(b) => Value::scalar(*b),
        AstValue::Null => Value::Null,
        AstValue::Enum(name) => Value::scalar(name.as_str()),
        AstValue::List(items) => {
            Value::list(items.iter().map(|i| coerce_ast_value(i, vars)).collect())
        }
        AstValue::Object(fields) => Value::object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), coerce_ast_value(v, vars)))
                .collect::<Object>(),
        ),
    }
}

fn directive_by_name<'d>(
    directives: &'d [Directive<'static, String>],
    name: &str,
) -> Option<&'d Directive<'static, String>> {
    directives.iter().find(|d| d.name == name)
}

/// Reads one argument of a directive usage: the AST value when spelled out,
/// the schema default otherwise. Unknown arguments are ignored by virtue of
/// never being asked for.
fn directive_argument(
    schema: &Schema,
    directive: &Directive<'static, String>,
    name: &str,
    vars: &Variables,
) -> Option<Value> {
    if let Some((_, ast)) = directive.arguments.iter().find(|(n, _)| n == name) {
        return Some(coerce_ast_value(ast, vars));
    }
    schema
        .directive_by_name(&directive.name)
        .and_then(|d| d.arguments.iter().find(|a| a.name == name))
        .and_then(|a| a.default_value.clone())
}

/// Whether `@skip`/`@include` exclude the selection from the result.
pub(crate) fn is_excluded(
    directives: &[Directive<'static, String>],
    schema: &Schema,
    vars: &Variables,
) -> bool {
    if let Some(skip) = directive_by_name(directives, "skip") {
        if directive_argument(schema, skip, "if", vars).and_then(|v| v.as_boolean_value())
            == Some(true)
        {
            return true;
        }
    }
    if let Some(include) = directive_by_name(directives, "include") {
        if directive_argument(schema, include, "if", vars).and_then(|v| v.as_boolean_value())
            == Some(false)
        {
            return true;
        }
    }
    false
}

/// The read options of an active `@defer`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DeferDirective {
    pub label: Option<String>,
}

/// Reads `@defer` off a fragment spread or inline fragment. `None` when the
/// directive is absent or disabled via `if`.
pub(crate) fn defer_directive(
    directives: &[Directive<'static, String>],
    schema: &Schema,
    vars: &Variables,
) -> Option<DeferDirective> {
    let directive = directive_by_name(directives, "defer")?;
    let enabled = directive_argument(schema, directive, "if", vars)
        .and_then(|v| v.as_boolean_value())
        .unwrap_or(true);
    enabled.then(|| DeferDirective {
        label: directive_argument(schema, directive, "label", vars)
            .and_then(|v| v.as_string_value().map(str::to_owned)),
    })
}

/// The read options of an active `@stream`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StreamDirective {
    pub label: Option<String>,
    pub initial_count: usize,
}

/// Reads `@stream` off a list field. `Ok(None)` when the directive is absent
/// or disabled via `if`; an unusable `initialCount` is a field error.
pub(crate) fn stream_directive(
    directives: &[Directive<'static, String>],
    schema: &Schema,
    vars: &Variables,
) -> FieldResult<Option<StreamDirective>> {
    let Some(directive) = directive_by_name(directives, "stream") else {
        return Ok(None);
    };
    let enabled = directive_argument(schema, directive, "if", vars)
        .and_then(|v| v.as_boolean_value())
        .unwrap_or(true);
    if !enabled {
        return Ok(None);
    }

    let initial_count = match directive_argument(schema, directive, "initialCount", vars) {
        Some(v) => match v.as_int_value() {
            Some(i) if i >= 0 => i as usize,
            _ => return Err(FieldError::from("initialCount must be a non-negative integer")),
        },
        None => 0,
    };

    Ok(Some(StreamDirective {
        label: directive_argument(schema, directive, "label", vars)
            .and_then(|v| v.as_string_value().map(str::to_owned)),
        initial_count,
    }))
}
