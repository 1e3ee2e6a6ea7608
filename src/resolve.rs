//! The resolver seam between the execution engine and user code.

use std::{any::Any, future::Future, sync::Arc};

use futures::{future::BoxFuture, stream::BoxStream};
use indexmap::IndexMap;

use crate::{
    executor::{FieldError, FieldResult},
    value::Value,
};

/// Opaque context value handed to every resolver, as provided to `execute`.
pub type ContextValue = dyn Any + Send + Sync;

/// The outcome of invoking a field resolver.
///
/// A resolver may produce its value synchronously, eventually, as an ordered
/// sequence whose elements are themselves eventual, or as an asynchronously
/// iterated sequence of elements.
pub enum Resolved {
    /// A plain value, available immediately.
    Value(Value),
    /// An eventual value; completion suspends until it settles.
    Future(BoxFuture<'static, FieldResult<Resolved>>),
    /// An ordered sequence for a list-typed field. Elements may themselves be
    /// eventual, so the list settles when all of them do.
    List(Vec<Resolved>),
    /// An asynchronously iterated sequence for a list-typed field. Drained to
    /// completion unless the field carries an active `@stream`.
    Stream(BoxStream<'static, FieldResult<Resolved>>),
}

impl Resolved {
    /// Wraps a plain value.
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Value(v.into())
    }

    /// Wraps an eventual value.
    pub fn future(f: impl Future<Output = FieldResult<Resolved>> + Send + 'static) -> Self {
        Self::Future(Box::pin(f))
    }

    /// Wraps an asynchronously iterated sequence of list elements.
    pub fn stream(
        s: impl futures::Stream<Item = FieldResult<Resolved>> + Send + 'static,
    ) -> Self {
        Self::Stream(Box::pin(s))
    }
}

impl From<Value> for Resolved {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

/// Coerced argument values for a single field invocation, in argument
/// definition order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    args: IndexMap<String, Value>,
}

impl Arguments {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.args.insert(name.into(), value);
    }

    /// Returns the value of the given argument, if provided or defaulted.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// Returns the string value of the given argument, if applicable.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_string_value)
    }

    /// Returns the integer value of the given argument, if applicable.
    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(Value::as_int_value)
    }

    /// Returns the boolean value of the given argument, if applicable.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_boolean_value)
    }
}

/// Everything a field resolver gets to see.
pub struct ResolverContext<'a> {
    /// The value the enclosing object resolved to.
    pub source: &'a Value,
    /// The field name as spelled in the schema (not the alias).
    pub field_name: &'a str,
    /// Coerced argument values.
    pub args: &'a Arguments,
    /// The opaque per-execution context value.
    pub context: &'a Arc<ContextValue>,
}

/// A field resolver: produces the field's value from the enclosing object's
/// source value.
pub type FieldResolver = Arc<dyn Fn(ResolverContext<'_>) -> FieldResult<Resolved> + Send + Sync>;

/// A type resolver: names the concrete object type an abstract-typed value
/// belongs to. May resolve eventually.
pub type TypeResolver =
    Arc<dyn Fn(&Value, &Arc<ContextValue>) -> BoxFuture<'static, FieldResult<String>> + Send + Sync>;

/// The default field resolver: reads the field name as a property of the
/// source object. A missing property resolves to `null`.
pub fn default_field_resolver() -> FieldResolver {
    Arc::new(|ctx| {
        let value = ctx
            .source
            .as_object_value()
            .and_then(|o| o.get_field_value(ctx.field_name))
            .cloned()
            .unwrap_or(Value::Null);
        Ok(Resolved::Value(value))
    })
}

/// The default type resolver: reads a `__typename` string property of the
/// source object.
pub fn default_type_resolver() -> TypeResolver {
    Arc::new(|source, _| {
        let resolved = source
            .as_object_value()
            .and_then(|o| o.get_field_value("__typename"))
            .and_then(Value::as_string_value)
            .map(str::to_owned)
            .ok_or_else(|| {
                FieldError::from("Source value does not carry a \"__typename\" property")
            });
        Box::pin(futures::future::ready(resolved))
    })
}
