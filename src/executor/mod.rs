//! Resolve a validated document to values, incrementally when asked to.

mod collect;
mod complete;
mod directives;
mod dispatcher;
mod path;
mod stream;

use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt::Display,
    sync::{Arc, RwLock},
};

use graphql_parser::{
    query::{
        Definition, Document, FragmentDefinition, OperationDefinition, SelectionSet,
        VariableDefinition,
    },
    Pos,
};

use crate::{
    resolve::{
        default_field_resolver, default_type_resolver, ContextValue, FieldResolver, TypeResolver,
    },
    schema::{meta::MetaType, model::Schema},
    value::Value,
    GraphQLError,
};

pub use self::{
    dispatcher::{ResponsePayload, ResponseStream},
    path::{PathSegment, ResponsePath},
};

pub(crate) use self::{directives::coerce_ast_value, dispatcher::Dispatcher};

/// Error type for errors that occur during field resolution.
///
/// Field errors are represented by a human-readable error message and an
/// optional [`Value`] with additional information, surfaced under the
/// `"extensions"` response key.
///
/// They can be converted to from any type implementing [`Display`], which
/// makes error chaining with the `?` operator a breeze inside resolvers.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    message: String,
    extensions: Value,
}

impl<T: Display> From<T> for FieldError {
    fn from(e: T) -> Self {
        Self {
            message: e.to_string(),
            extensions: Value::Null,
        }
    }
}

impl FieldError {
    /// Constructs a new [`FieldError`] with additional data.
    #[must_use]
    pub fn new<T: Display>(e: T, extensions: Value) -> Self {
        Self {
            message: e.to_string(),
            extensions,
        }
    }

    /// Returns the `"message"` field of this [`FieldError`].
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the `"extensions"` field of this [`FieldError`].
    ///
    /// [`Value::Null`] if there are none.
    #[must_use]
    pub fn extensions(&self) -> &Value {
        &self.extensions
    }
}

/// The result of resolving the value of a field of type `T`.
pub type FieldResult<T> = Result<T, FieldError>;

/// The map of variables used for substitution during query execution.
pub type Variables = HashMap<String, Value>;

/// Error type for errors that occur during query execution.
///
/// All execution errors contain the source position in the query of the
/// field that failed to resolve, along with the response path to it.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionError {
    location: Pos,
    path: Vec<PathSegment>,
    error: FieldError,
}

impl Eq for ExecutionError where Self: PartialEq {}

impl PartialOrd for ExecutionError {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExecutionError {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.location, &self.path, &self.error.message).cmp(&(
            &other.location,
            &other.path,
            &other.error.message,
        ))
    }
}

impl ExecutionError {
    #[doc(hidden)]
    pub fn new(location: Pos, path: Vec<PathSegment>, error: FieldError) -> Self {
        Self {
            location,
            path,
            error,
        }
    }

    /// The underlying [`FieldError`].
    pub fn error(&self) -> &FieldError {
        &self.error
    }

    /// The source location in the query of the field that failed to resolve.
    pub fn location(&self) -> &Pos {
        &self.location
    }

    /// The response path of the field that generated this error.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }
}

/// A complete, non-incremental execution result.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    data: Value,
    errors: Vec<ExecutionError>,
}

impl Response {
    pub(crate) fn new(data: Value, errors: Vec<ExecutionError>) -> Self {
        Self { data, errors }
    }

    /// The `"data"` entry of the response.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The `"errors"` entry of the response. Empty when execution produced
    /// no errors.
    pub fn errors(&self) -> &[ExecutionError] {
        &self.errors
    }

    /// Splits this response into data and errors.
    pub fn into_parts(self) -> (Value, Vec<ExecutionError>) {
        (self.data, self.errors)
    }
}

/// What `execute` produces: either a single complete result, or an initial
/// result followed by a lazy sequence of patches.
pub enum ExecutionResponse {
    /// No deferred work was scheduled; the result is complete.
    Complete(Response),
    /// Deferred work is outstanding; consume the stream to receive the
    /// initial result and then each patch in completion order.
    Incremental(ResponseStream),
}

impl std::fmt::Debug for ExecutionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionResponse::Complete(response) => {
                f.debug_tuple("Complete").field(response).finish()
            }
            ExecutionResponse::Incremental(_) => {
                f.debug_tuple("Incremental").field(&"ResponseStream").finish()
            }
        }
    }
}

impl ExecutionResponse {
    /// Returns the complete response, if no deferred work was scheduled.
    pub fn into_complete(self) -> Option<Response> {
        match self {
            Self::Complete(r) => Some(r),
            Self::Incremental(_) => None,
        }
    }

    /// Returns the patch stream, if deferred work was scheduled.
    pub fn into_incremental(self) -> Option<ResponseStream> {
        match self {
            Self::Complete(_) => None,
            Self::Incremental(s) => Some(s),
        }
    }
}

/// Arguments to [`execute`](crate::execute).
pub struct ExecutionArgs {
    /// The schema to execute against.
    pub schema: Arc<Schema>,
    /// The parsed operation document.
    pub document: Document<'static, String>,
    /// The value handed to resolvers of the root type.
    pub root_value: Value,
    /// An opaque value handed to every resolver.
    pub context_value: Arc<ContextValue>,
    /// Provided variable values.
    pub variable_values: Variables,
    /// Which operation to execute; required when the document contains more
    /// than one.
    pub operation_name: Option<String>,
    /// Resolver for fields without one; defaults to reading the field name
    /// as a property of the source object.
    pub field_resolver: Option<FieldResolver>,
    /// Resolver for abstract types; defaults to reading a `"__typename"`
    /// property of the source object.
    pub type_resolver: Option<TypeResolver>,
}

impl ExecutionArgs {
    /// Creates execution arguments with all optional parts defaulted.
    pub fn new(schema: Arc<Schema>, document: Document<'static, String>) -> Self {
        Self {
            schema,
            document,
            root_value: Value::Null,
            context_value: Arc::new(()),
            variable_values: Variables::new(),
            operation_name: None,
            field_resolver: None,
            type_resolver: None,
        }
    }

    /// Sets the root value.
    #[must_use]
    pub fn root_value(mut self, root_value: Value) -> Self {
        self.root_value = root_value;
        self
    }

    /// Sets the context value.
    #[must_use]
    pub fn context_value(mut self, context_value: Arc<ContextValue>) -> Self {
        self.context_value = context_value;
        self
    }

    /// Sets the provided variable values.
    #[must_use]
    pub fn variable_values(mut self, variable_values: Variables) -> Self {
        self.variable_values = variable_values;
        self
    }

    /// Selects the operation to execute by name.
    #[must_use]
    pub fn operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }

    /// Overrides the default field resolver.
    #[must_use]
    pub fn field_resolver(mut self, field_resolver: FieldResolver) -> Self {
        self.field_resolver = Some(field_resolver);
        self
    }

    /// Overrides the default type resolver.
    #[must_use]
    pub fn type_resolver(mut self, type_resolver: TypeResolver) -> Self {
        self.type_resolver = Some(type_resolver);
        self
    }
}

/// Per-execution immutable state, shared by the synchronous walk and every
/// scheduled patch worker.
pub(crate) struct OperationCtx {
    pub schema: Arc<Schema>,
    pub fragments: HashMap<String, FragmentDefinition<'static, String>>,
    pub variables: Variables,
    pub context_value: Arc<ContextValue>,
    pub field_resolver: FieldResolver,
    pub type_resolver: TypeResolver,
    pub dispatcher: Dispatcher,
}

pub(crate) type ErrorsSink = Arc<RwLock<Vec<ExecutionError>>>;

/// An execution scope: the shared operation context plus the errors sink
/// owning the errors of the current delivery unit (initial result or one
/// patch).
#[derive(Clone)]
pub(crate) struct ExecScope {
    pub ctx: Arc<OperationCtx>,
    pub errors: ErrorsSink,
}

impl ExecScope {
    pub(crate) fn new(ctx: Arc<OperationCtx>) -> Self {
        Self {
            ctx,
            errors: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Derives a scope with a fresh errors sink, for a patch worker.
    pub(crate) fn patch_scope(&self) -> Self {
        Self::new(Arc::clone(&self.ctx))
    }

    /// Records a located error against this scope's delivery unit.
    pub(crate) fn push_error(&self, error: FieldError, location: Pos, path: &ResponsePath) {
        let mut errors = self.errors.write().unwrap();
        errors.push(ExecutionError {
            location,
            path: path.to_vec(),
            error,
        });
    }

    /// Takes the recorded errors, sorted by location and path.
    pub(crate) fn take_errors(&self) -> Vec<ExecutionError> {
        let mut errors = std::mem::take(&mut *self.errors.write().unwrap());
        errors.sort();
        errors
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

pub(crate) fn operation_kind(op: &OperationDefinition<'static, String>) -> OperationKind {
    match op {
        OperationDefinition::SelectionSet(_) | OperationDefinition::Query(_) => {
            OperationKind::Query
        }
        OperationDefinition::Mutation(_) => OperationKind::Mutation,
        OperationDefinition::Subscription(_) => OperationKind::Subscription,
    }
}

pub(crate) fn operation_name<'a>(op: &'a OperationDefinition<'static, String>) -> Option<&'a str> {
    match op {
        OperationDefinition::SelectionSet(_) => None,
        OperationDefinition::Query(q) => q.name.as_deref(),
        OperationDefinition::Mutation(m) => m.name.as_deref(),
        OperationDefinition::Subscription(s) => s.name.as_deref(),
    }
}

pub(crate) fn operation_selection_set<'a>(
    op: &'a OperationDefinition<'static, String>,
) -> &'a SelectionSet<'static, String> {
    match op {
        OperationDefinition::SelectionSet(s) => s,
        OperationDefinition::Query(q) => &q.selection_set,
        OperationDefinition::Mutation(m) => &m.selection_set,
        OperationDefinition::Subscription(s) => &s.selection_set,
    }
}

pub(crate) fn operation_variable_definitions<'a>(
    op: &'a OperationDefinition<'static, String>,
) -> &'a [VariableDefinition<'static, String>] {
    match op {
        OperationDefinition::SelectionSet(_) => &[],
        OperationDefinition::Query(q) => &q.variable_definitions,
        OperationDefinition::Mutation(m) => &m.variable_definitions,
        OperationDefinition::Subscription(s) => &s.variable_definitions,
    }
}

/// Selects the operation definition to execute, by name when one is given.
pub fn get_operation<'d>(
    document: &'d Document<'static, String>,
    operation_name: Option<&str>,
) -> Result<&'d OperationDefinition<'static, String>, GraphQLError> {
    let mut operation = None;
    for def in &document.definitions {
        if let Definition::Operation(op) = def {
            if operation_name.is_none() && operation.is_some() {
                return Err(GraphQLError::MultipleOperationsProvided);
            }

            let move_op = operation_name.is_none() || self::operation_name(op) == operation_name;

            if move_op {
                operation = Some(op);
            }
        }
    }
    match operation {
        Some(op) => Ok(op),
        None if operation_name.is_some() => Err(GraphQLError::UnknownOperationName),
        None => Err(GraphQLError::NoOperationProvided),
    }
}

/// Creates a new operation context and drives the validated operation to its
/// initial result, deciding the single-result vs. sequence response shape.
pub(crate) async fn execute_validated(
    args: &ExecutionArgs,
    operation: &OperationDefinition<'static, String>,
) -> Result<ExecutionResponse, GraphQLError> {
    let kind = operation_kind(operation);
    if kind == OperationKind::Subscription {
        return Err(GraphQLError::IsSubscription);
    }

    let mut fragments = HashMap::new();
    for def in &args.document.definitions {
        if let Definition::Fragment(f) = def {
            fragments.insert(f.name.clone(), f.clone());
        }
    }

    // Defaults from the variable definitions fill in whatever the request
    // left unset.
    let mut variables = args.variable_values.clone();
    for def in operation_variable_definitions(operation) {
        if let Some(default) = &def.default_value {
            variables
                .entry(def.name.clone())
                .or_insert_with(|| coerce_ast_value(default, &Variables::new()));
        }
    }

    let ctx = Arc::new(OperationCtx {
        schema: Arc::clone(&args.schema),
        fragments,
        variables,
        context_value: Arc::clone(&args.context_value),
        field_resolver: args
            .field_resolver
            .clone()
            .unwrap_or_else(default_field_resolver),
        type_resolver: args
            .type_resolver
            .clone()
            .unwrap_or_else(default_type_resolver),
        dispatcher: Dispatcher::new(),
    });

    let root_type: &MetaType = match kind {
        OperationKind::Query => ctx.schema.concrete_query_type(),
        OperationKind::Mutation => ctx
            .schema
            .concrete_mutation_type()
            .expect("No mutation type found"),
        OperationKind::Subscription => unreachable!(),
    };

    tracing::debug!(
        operation = operation_name(operation).unwrap_or("<anonymous>"),
        kind = ?kind,
        "executing operation"
    );

    let scope = ExecScope::new(Arc::clone(&ctx));
    let selection_set = operation_selection_set(operation).clone();

    let data = complete::execute_selection_set(
        &scope,
        root_type,
        &args.root_value,
        &ResponsePath::root(),
        &[&selection_set],
        kind == OperationKind::Mutation,
    )
    .await
    .unwrap_or(Value::Null);

    let errors = scope.take_errors();

    if ctx.dispatcher.has_work() {
        Ok(ExecutionResponse::Incremental(ResponseStream::new(
            data,
            errors,
            ctx.dispatcher.clone(),
        )))
    } else {
        Ok(ExecutionResponse::Complete(Response::new(data, errors)))
    }
}
