//! Validation of provided variable values against the operation's variable
//! definitions.

use std::fmt;

use graphql_parser::{
    query::{OperationDefinition, Type as AstType, VariableDefinition},
    Pos,
};

use crate::{
    executor::{operation_variable_definitions, Variables},
    schema::{
        meta::{MetaType, Type},
        model::Schema,
    },
    validation::RuleError,
    value::Value,
};

#[derive(Debug)]
enum Path<'a> {
    Root,
    ArrayElement(usize, &'a Path<'a>),
    ObjectField(&'a str, &'a Path<'a>),
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root => Ok(()),
            Path::ArrayElement(i, prev) => write!(f, "{prev}[{i}]"),
            Path::ObjectField(name, prev) => write!(f, "{prev}.{name}"),
        }
    }
}

/// Checks the provided variable values against the operation's variable
/// definitions: every definition must name an input type, required variables
/// without defaults must be provided, and provided values must unify with
/// their declared types.
pub fn validate_input_values(
    values: &Variables,
    operation: &OperationDefinition<'static, String>,
    schema: &Schema,
) -> Vec<RuleError> {
    let mut errors = Vec::new();
    validate_var_defs(
        values,
        operation_variable_definitions(operation),
        schema,
        &mut errors,
    );
    errors.sort();
    errors
}

fn validate_var_defs(
    values: &Variables,
    var_defs: &[VariableDefinition<'static, String>],
    schema: &Schema,
    errors: &mut Vec<RuleError>,
) {
    for def in var_defs {
        let var_type = ast_type_to_type(&def.var_type);
        match schema.concrete_type_by_name(var_type.innermost_name()) {
            Some(t) if t.is_input() => {
                let provided = values.get(&def.name);
                if var_type.is_non_null()
                    && def.default_value.is_none()
                    && provided.map_or(true, Value::is_null)
                {
                    errors.push(RuleError::new(
                        &format!(
                            "Variable \"${}\" of required type \"{var_type}\" was not provided.",
                            def.name,
                        ),
                        &[def.position],
                    ));
                } else if let Some(v) = provided {
                    unify_value(&def.name, def.position, v, &var_type, schema, errors, &Path::Root);
                }
            }
            _ => errors.push(RuleError::new(
                &format!(
                    "Variable \"${}\" expected value of type \"{var_type}\" which cannot be \
                     used as an input type.",
                    def.name,
                ),
                &[def.position],
            )),
        }
    }
}

fn ast_type_to_type(ast: &AstType<'static, String>) -> Type {
    match ast {
        AstType::NamedType(name) => Type::named(name.as_str()),
        AstType::ListType(inner) => Type::list(ast_type_to_type(inner)),
        AstType::NonNullType(inner) => match ast_type_to_type(inner) {
            Type::Named(n) => Type::NonNullNamed(n),
            Type::List(l) => Type::NonNullList(l),
            non_null => non_null,
        },
    }
}

fn unify_value(
    var_name: &str,
    var_pos: Pos,
    value: &Value,
    meta_type: &Type,
    schema: &Schema,
    errors: &mut Vec<RuleError>,
    path: &Path<'_>,
) {
    match meta_type {
        Type::NonNullNamed(_) | Type::NonNullList(_) => {
            if value.is_null() {
                push_unification_error(
                    errors,
                    var_name,
                    var_pos,
                    path,
                    &format!("Expected \"{meta_type}\", found null"),
                );
            } else {
                unify_value(var_name, var_pos, value, &meta_type.nullable(), schema, errors, path);
            }
        }
        Type::List(inner) => match value {
            Value::Null => {}
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    unify_value(
                        var_name,
                        var_pos,
                        item,
                        inner,
                        schema,
                        errors,
                        &Path::ArrayElement(i, path),
                    );
                }
            }
            // A single value coerces to a list of one.
            _ => unify_value(var_name, var_pos, value, inner, schema, errors, path),
        },
        Type::Named(name) => {
            if value.is_null() {
                return;
            }
            match schema
                .concrete_type_by_name(name)
                .expect("Input type not found in schema")
            {
                MetaType::Scalar(_) => unify_scalar(var_name, var_pos, value, name, errors, path),
                MetaType::Enum(e) => {
                    let matches = value
                        .as_string_value()
                        .is_some_and(|s| e.values.iter().any(|v| v.name == s));
                    if !matches {
                        push_unification_error(
                            errors,
                            var_name,
                            var_pos,
                            path,
                            &format!("Invalid value for enum \"{name}\""),
                        );
                    }
                }
                MetaType::InputObject(io) => {
                    let Some(obj) = value.as_object_value() else {
                        push_unification_error(
                            errors,
                            var_name,
                            var_pos,
                            path,
                            &format!("Expected input object \"{name}\""),
                        );
                        return;
                    };
                    for input_field in &io.input_fields {
                        let field_value = obj.get_field_value(&input_field.name);
                        match field_value {
                            Some(v) => unify_value(
                                var_name,
                                var_pos,
                                v,
                                &input_field.arg_type,
                                schema,
                                errors,
                                &Path::ObjectField(&input_field.name, path),
                            ),
                            None if input_field.arg_type.is_non_null()
                                && input_field.default_value.is_none() =>
                            {
                                push_unification_error(
                                    errors,
                                    var_name,
                                    var_pos,
                                    path,
                                    &format!(
                                        "\"{name}\" is missing fields: \"{}\"",
                                        input_field.name,
                                    ),
                                );
                            }
                            None => {}
                        }
                    }
                    for (key, _) in obj.iter() {
                        if !io.input_fields.iter().any(|f| f.name == key.as_str()) {
                            push_unification_error(
                                errors,
                                var_name,
                                var_pos,
                                path,
                                &format!("\"{name}\" has unknown field: \"{key}\""),
                            );
                        }
                    }
                }
                _ => unreachable!("non-input type checked by the caller"),
            }
        }
    }
}

fn unify_scalar(
    var_name: &str,
    var_pos: Pos,
    value: &Value,
    name: &str,
    errors: &mut Vec<RuleError>,
    path: &Path<'_>,
) {
    let ok = match name {
        "Int" => value.as_int_value().is_some(),
        "Float" => value.as_float_value().is_some(),
        "String" => value.as_string_value().is_some(),
        "Boolean" => value.as_boolean_value().is_some(),
        "ID" => value.as_string_value().is_some() || value.as_int_value().is_some(),
        // Custom scalars accept any shape here; coercion happens at their
        // own boundary.
        _ => true,
    };
    if !ok {
        push_unification_error(
            errors,
            var_name,
            var_pos,
            path,
            &format!("Expected \"{name}\", found {value}"),
        );
    }
}

fn push_unification_error(
    errors: &mut Vec<RuleError>,
    var_name: &str,
    var_pos: Pos,
    path: &Path<'_>,
    message: &str,
) {
    let path = path.to_string();
    let at = if path.is_empty() {
        String::new()
    } else {
        format!(" at \"{var_name}{path}\"")
    };
    errors.push(RuleError::new(
        &format!("Variable \"${var_name}\" got invalid value{at}. {message}."),
        &[var_pos],
    ));
}
