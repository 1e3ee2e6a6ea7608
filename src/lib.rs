//! # graphql-incremental
//!
//! An incremental GraphQL execution engine: executes a parsed operation
//! document against a runtime schema and emits either a single complete
//! result, or an initial result followed by a lazy sequence of patches that
//! progressively fill in `@defer`red fragments and `@stream`ed list
//! elements.
//!
//! Query parsing is delegated to the [`graphql-parser`] crate; schemas are
//! described at runtime with [`schema::meta`] types and resolvers are plain
//! closures attached to field definitions.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use graphql_incremental::{
//!     execute, graphql_value,
//!     meta::{Field, ObjectMeta, Type},
//!     parse_document, ExecutionArgs, Resolved, Schema,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let schema = Arc::new(
//!     Schema::build(ObjectMeta::new(
//!         "Query",
//!         vec![Field::new("answer", Type::non_null("Int"))
//!             .resolver(|_| Ok(Resolved::value(42)))],
//!     ))
//!     .finish(),
//! );
//!
//! let document = parse_document("{ answer }").unwrap();
//! let response = execute(ExecutionArgs::new(schema, document))
//!     .await
//!     .unwrap()
//!     .into_complete()
//!     .unwrap();
//!
//! assert_eq!(*response.data(), graphql_value!({"answer": 42}));
//! # }
//! ```
//!
//! [`graphql-parser`]: https://docs.rs/graphql-parser

#[doc(inline)]
pub use futures::{self, future::BoxFuture, stream::BoxStream};

pub use graphql_parser::{self, query::Document, Pos as SourcePosition};

pub mod executor;
pub mod resolve;
pub mod schema;
pub mod validation;
mod value;
// This needs to be public until docs have support for private modules:
// https://github.com/rust-lang/cargo/issues/1520
pub mod integrations;

#[cfg(test)]
mod executor_tests;

use derive_more::with_trait::{Display, From};
use itertools::Itertools as _;

use crate::validation::{validate_input_values, visit_all_rules, ValidatorContext};

pub use crate::{
    executor::{
        get_operation, ExecutionArgs, ExecutionError, ExecutionResponse, FieldError, FieldResult,
        PathSegment, Response, ResponsePayload, ResponseStream, Variables,
    },
    resolve::{
        default_field_resolver, default_type_resolver, Arguments, ContextValue, FieldResolver,
        Resolved, ResolverContext, TypeResolver,
    },
    schema::{
        meta,
        model::{DirectiveLocation, DirectiveType, Schema, SchemaBuilder},
    },
    validation::RuleError,
    value::{Object, ScalarValue, Value},
};

/// An error that prevented query execution.
#[allow(missing_docs)]
#[derive(Debug, Display, From)]
pub enum GraphQLError {
    ParseError(graphql_parser::query::ParseError),
    #[display("{}", _0.iter().format("\n"))]
    ValidationError(Vec<RuleError>),
    #[display("No operation provided")]
    NoOperationProvided,
    #[display("Multiple operations provided")]
    MultipleOperationsProvided,
    #[display("Unknown operation name")]
    UnknownOperationName,
    #[display("Operation is a subscription")]
    IsSubscription,
}

impl From<RuleError> for GraphQLError {
    fn from(value: RuleError) -> Self {
        vec![value].into()
    }
}

impl std::error::Error for GraphQLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseError(e) => Some(e),
            Self::ValidationError(errs) => Some(errs.first()?),
            Self::NoOperationProvided
            | Self::MultipleOperationsProvided
            | Self::UnknownOperationName
            | Self::IsSubscription => None,
        }
    }
}

/// Parses an executable document into the owned AST form `execute` consumes.
pub fn parse_document(source: &str) -> Result<Document<'static, String>, GraphQLError> {
    graphql_parser::parse_query::<String>(source)
        .map(Document::into_static)
        .map_err(GraphQLError::ParseError)
}

/// Executes an operation in a provided schema.
///
/// Validates the document against the schema's directive registry and the
/// provided variable values against the operation's variable definitions,
/// then drives execution. When no `@defer`/`@stream` work got scheduled the
/// result is a single [`Response`]; otherwise it is a [`ResponseStream`]
/// yielding the initial result and then each patch in completion order.
pub async fn execute(args: ExecutionArgs) -> Result<ExecutionResponse, GraphQLError> {
    {
        let mut ctx = ValidatorContext::new(&args.schema, &args.document);
        visit_all_rules(&mut ctx, &args.document);

        let errors = ctx.into_errors();
        if !errors.is_empty() {
            return Err(errors.into());
        }
    }

    let operation = get_operation(&args.document, args.operation_name.as_deref())?;

    {
        let errors = validate_input_values(&args.variable_values, operation, &args.schema);

        if !errors.is_empty() {
            return Err(errors.into());
        }
    }

    executor::execute_validated(&args, operation).await
}
