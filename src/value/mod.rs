//! The response value model.

mod macros;
mod object;
mod scalar;

use std::fmt;

pub use self::{object::Object, scalar::ScalarValue};

/// Serializable value returned from query and field execution.
///
/// Used by the execution engine and resolvers to build up the response
/// structure, and doubles as the representation of opaque root/source values
/// and provided variable values. Similar to the `Json` type found in
/// serialization crates, but with insertion-ordered objects.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Scalar(ScalarValue),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    // CONSTRUCTORS

    /// Constructs a null value.
    pub fn null() -> Self {
        Self::Null
    }

    /// Constructs a scalar value.
    pub fn scalar<T: Into<ScalarValue>>(s: T) -> Self {
        Self::Scalar(s.into())
    }

    /// Constructs a list value.
    pub fn list(l: Vec<Self>) -> Self {
        Self::List(l)
    }

    /// Constructs an object value.
    pub fn object(o: Object) -> Self {
        Self::Object(o)
    }

    // DISCRIMINATORS

    /// Does this value represent null?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Views the underlying scalar value, if present.
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Views the underlying string value, if present.
    pub fn as_string_value(&self) -> Option<&str> {
        self.as_scalar().and_then(ScalarValue::as_str)
    }

    /// Views the underlying integer value, if present.
    pub fn as_int_value(&self) -> Option<i32> {
        self.as_scalar().and_then(ScalarValue::as_int)
    }

    /// Views the underlying float value, if present.
    pub fn as_float_value(&self) -> Option<f64> {
        self.as_scalar().and_then(ScalarValue::as_float)
    }

    /// Views the underlying boolean value, if present.
    pub fn as_boolean_value(&self) -> Option<bool> {
        self.as_scalar().and_then(ScalarValue::as_boolean)
    }

    /// Views the underlying list value, if present.
    pub fn as_list_value(&self) -> Option<&[Self]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Views the underlying object value, if present.
    pub fn as_object_value(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Converts this value into an [`Object`], if it is one.
    pub fn into_object(self) -> Option<Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Scalar(s) => {
                if let Some(string) = s.as_str() {
                    write!(f, "\"{string}\"")
                } else {
                    write!(f, "{s}")
                }
            }
            Self::List(list) => {
                write!(f, "[")?;
                for (idx, item) in list.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(obj) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in obj.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{key}\": {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::scalar(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::scalar(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::scalar(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::scalar(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::scalar(b)
    }
}
