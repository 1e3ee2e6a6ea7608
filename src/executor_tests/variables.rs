use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::{
    graphql_value,
    meta::{Argument, Field, InputObjectMeta, ObjectMeta, Type},
    GraphQLError, Resolved, Schema, Value, Variables,
};

use super::{run, run_with_vars};

fn test_schema() -> Arc<Schema> {
    Arc::new(
        Schema::build(ObjectMeta::new(
            "TestType",
            vec![
                Field::new("echo", Type::named("String"))
                    .argument(
                        Argument::new("value", Type::named("String"))
                            .default_value(graphql_value!("default")),
                    )
                    .resolver(|ctx| {
                        Ok(Resolved::Value(
                            ctx.args.get("value").cloned().unwrap_or(Value::Null),
                        ))
                    }),
                Field::new("echoInput", Type::named("String"))
                    .argument(Argument::new("input", Type::named("TestInput")))
                    .resolver(|ctx| {
                        Ok(Resolved::value(format!(
                            "{}",
                            ctx.args.get("input").unwrap_or(&Value::Null),
                        )))
                    }),
            ],
        ))
        .register(
            InputObjectMeta::new(
                "TestInput",
                vec![
                    Argument::new("mandatory", Type::non_null("String")),
                    Argument::new("optional", Type::named("Int")),
                ],
            )
            .into_meta(),
        )
        .finish(),
    )
}

fn errors_of(err: GraphQLError) -> Vec<String> {
    match err {
        GraphQLError::ValidationError(errors) => {
            errors.into_iter().map(|e| e.message().to_owned()).collect()
        }
        other => panic!("Expected a validation error, got: {other}"),
    }
}

#[tokio::test]
async fn provided_variable_substitutes() {
    let response = run_with_vars(
        test_schema(),
        "query ($v: String) { echo(value: $v) }",
        Variables::from([("v".to_owned(), graphql_value!("provided"))]),
    )
    .await
    .unwrap()
    .into_complete()
    .unwrap();
    assert_eq!(*response.data(), graphql_value!({"echo": "provided"}));
}

#[tokio::test]
async fn variable_default_applies_when_not_provided() {
    let response = run(
        test_schema(),
        r#"query ($v: String = "from variables") { echo(value: $v) }"#,
    )
    .await
    .unwrap()
    .into_complete()
    .unwrap();
    assert_eq!(*response.data(), graphql_value!({"echo": "from variables"}));
}

#[tokio::test]
async fn argument_default_applies_when_argument_omitted() {
    let response = run(test_schema(), "{ echo }")
        .await
        .unwrap()
        .into_complete()
        .unwrap();
    assert_eq!(*response.data(), graphql_value!({"echo": "default"}));
}

#[tokio::test]
async fn missing_required_variable_is_reported() {
    let errors = errors_of(
        run(test_schema(), "query ($v: String!) { echo(value: $v) }")
            .await
            .unwrap_err(),
    );
    assert_eq!(
        errors,
        vec![r#"Variable "$v" of required type "String!" was not provided."#],
    );
}

#[tokio::test]
async fn wrongly_typed_variable_is_reported() {
    let errors = errors_of(
        run_with_vars(
            test_schema(),
            "query ($v: String) { echo(value: $v) }",
            Variables::from([("v".to_owned(), graphql_value!(12))]),
        )
        .await
        .unwrap_err(),
    );
    assert_eq!(
        errors,
        vec![r#"Variable "$v" got invalid value. Expected "String", found 12."#],
    );
}

#[tokio::test]
async fn input_object_fields_are_checked() {
    let errors = errors_of(
        run_with_vars(
            test_schema(),
            "query ($input: TestInput) { echoInput(input: $input) }",
            Variables::from([(
                "input".to_owned(),
                graphql_value!({"optional": 1, "unexpected": true}),
            )]),
        )
        .await
        .unwrap_err(),
    );
    assert_eq!(
        errors,
        vec![
            r#"Variable "$input" got invalid value. "TestInput" has unknown field: "unexpected"."#,
            r#"Variable "$input" got invalid value. "TestInput" is missing fields: "mandatory"."#,
        ],
    );
}

#[tokio::test]
async fn unknown_variable_type_is_reported() {
    let errors = errors_of(
        run(test_schema(), "query ($v: Ghost) { echo(value: $v) }")
            .await
            .unwrap_err(),
    );
    assert_eq!(
        errors,
        vec![
            r#"Variable "$v" expected value of type "Ghost" which cannot be used as an input type."#,
        ],
    );
}
