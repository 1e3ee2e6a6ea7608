//! Types used to describe a GraphQL schema at runtime.

use std::{fmt, sync::Arc};

use arcstr::ArcStr;

use crate::{
    resolve::{FieldResolver, Resolved, ResolverContext},
    value::Value,
    FieldResult,
};

/// A type literal: a named type with optional list and non-null wrapping.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Type {
    Named(ArcStr),
    NonNullNamed(ArcStr),
    List(Box<Type>),
    NonNullList(Box<Type>),
}

impl Type {
    /// A nullable named type.
    pub fn named(name: impl Into<ArcStr>) -> Self {
        Self::Named(name.into())
    }

    /// A non-nullable named type (`T!`).
    pub fn non_null(name: impl Into<ArcStr>) -> Self {
        Self::NonNullNamed(name.into())
    }

    /// A nullable list type (`[T]`).
    pub fn list(of_type: Type) -> Self {
        Self::List(Box::new(of_type))
    }

    /// A non-nullable list type (`[T]!`).
    pub fn non_null_list(of_type: Type) -> Self {
        Self::NonNullList(Box::new(of_type))
    }

    /// The name of the innermost named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => n,
            Self::List(l) | Self::NonNullList(l) => l.innermost_name(),
        }
    }

    /// Whether the outermost wrapper is non-null.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNullNamed(_) | Self::NonNullList(_))
    }

    /// This type with the outermost non-null wrapper removed.
    pub fn nullable(&self) -> Type {
        match self {
            Self::NonNullNamed(n) => Self::Named(n.clone()),
            Self::NonNullList(l) => Self::List(l.clone()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::NonNullNamed(n) => write!(f, "{n}!"),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNullList(t) => write!(f, "[{t}]!"),
        }
    }
}

/// Metadata for a field of an object or interface type.
#[derive(Clone)]
pub struct Field {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub field_type: Type,
    #[doc(hidden)]
    pub resolver: Option<FieldResolver>,
}

impl Field {
    /// Creates a new [`Field`] with the given name and type, using the
    /// execution default resolver.
    pub fn new(name: impl Into<ArcStr>, field_type: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            field_type,
            resolver: None,
        }
    }

    /// Sets the description of this field.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an argument definition to this field.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Attaches a resolver to this field.
    #[must_use]
    pub fn resolver(
        mut self,
        f: impl Fn(ResolverContext<'_>) -> FieldResult<Resolved> + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .finish_non_exhaustive()
    }
}

/// Metadata for an argument of a field or a directive.
#[derive(Clone, Debug)]
pub struct Argument {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arg_type: Type,
    #[doc(hidden)]
    pub default_value: Option<Value>,
}

impl Argument {
    /// Creates a new [`Argument`] with the given name and type.
    pub fn new(name: impl Into<ArcStr>, arg_type: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_type,
            default_value: None,
        }
    }

    /// Sets the default value of this argument.
    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A possible value of an enum type.
#[derive(Clone, Debug)]
pub struct EnumValue {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
}

impl EnumValue {
    /// Creates a new [`EnumValue`] with the given name.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Outbound serialization function of a scalar type.
pub type SerializeFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// Scalar type metadata.
#[derive(Clone)]
pub struct ScalarMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    pub(crate) serialize_fn: Option<SerializeFn>,
}

impl ScalarMeta {
    /// Creates a new [`ScalarMeta`] type with the given name, serializing
    /// through the built-in coercion for that name (pass-through for custom
    /// scalars).
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            serialize_fn: None,
        }
    }

    /// Overrides the outbound serialization function of this scalar.
    #[must_use]
    pub fn serializer(
        mut self,
        f: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.serialize_fn = Some(Arc::new(f));
        self
    }

    /// Wraps this [`ScalarMeta`] into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Scalar(self)
    }

    pub(crate) fn serialize(&self, value: &Value) -> Result<Value, String> {
        match &self.serialize_fn {
            Some(f) => f(value),
            None => builtin_serialize(&self.name, value),
        }
    }
}

impl fmt::Debug for ScalarMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarMeta")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Object type metadata.
#[derive(Clone, Debug)]
pub struct ObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Vec<Field>,
    #[doc(hidden)]
    pub interface_names: Vec<ArcStr>,
}

impl ObjectMeta {
    /// Creates a new [`ObjectMeta`] type with the given name and fields.
    pub fn new(name: impl Into<ArcStr>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
            interface_names: Vec::new(),
        }
    }

    /// Sets the interfaces this type implements.
    #[must_use]
    pub fn interfaces(mut self, names: &[&str]) -> Self {
        self.interface_names = names.iter().copied().map(ArcStr::from).collect();
        self
    }

    /// Wraps this [`ObjectMeta`] into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Object(self)
    }
}

/// Interface type metadata.
#[derive(Clone, Debug)]
pub struct InterfaceMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Vec<Field>,
}

impl InterfaceMeta {
    /// Creates a new [`InterfaceMeta`] type with the given name and fields.
    pub fn new(name: impl Into<ArcStr>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
        }
    }

    /// Wraps this [`InterfaceMeta`] into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Interface(self)
    }
}

/// Union type metadata.
#[derive(Clone, Debug)]
pub struct UnionMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub of_type_names: Vec<ArcStr>,
}

impl UnionMeta {
    /// Creates a new [`UnionMeta`] type of the given member type names.
    pub fn new(name: impl Into<ArcStr>, of_type_names: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: None,
            of_type_names: of_type_names.iter().copied().map(ArcStr::from).collect(),
        }
    }

    /// Wraps this [`UnionMeta`] into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Union(self)
    }
}

/// Enum type metadata.
#[derive(Clone, Debug)]
pub struct EnumMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub values: Vec<EnumValue>,
}

impl EnumMeta {
    /// Creates a new [`EnumMeta`] type out of the given value names.
    pub fn new(name: impl Into<ArcStr>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: values.iter().copied().map(EnumValue::new).collect(),
        }
    }

    /// Wraps this [`EnumMeta`] into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Enum(self)
    }
}

/// Input object type metadata.
#[derive(Clone, Debug)]
pub struct InputObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub input_fields: Vec<Argument>,
}

impl InputObjectMeta {
    /// Creates a new [`InputObjectMeta`] type with the given input fields.
    pub fn new(name: impl Into<ArcStr>, input_fields: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_fields,
        }
    }

    /// Wraps this [`InputObjectMeta`] into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::InputObject(self)
    }
}

/// Generic type metadata.
#[derive(Clone, Debug)]
pub enum MetaType {
    #[doc(hidden)]
    Scalar(ScalarMeta),
    #[doc(hidden)]
    Object(ObjectMeta),
    #[doc(hidden)]
    Interface(InterfaceMeta),
    #[doc(hidden)]
    Union(UnionMeta),
    #[doc(hidden)]
    Enum(EnumMeta),
    #[doc(hidden)]
    InputObject(InputObjectMeta),
}

impl MetaType {
    /// The name of this type.
    pub fn name(&self) -> &ArcStr {
        match self {
            Self::Scalar(ScalarMeta { name, .. })
            | Self::Object(ObjectMeta { name, .. })
            | Self::Interface(InterfaceMeta { name, .. })
            | Self::Union(UnionMeta { name, .. })
            | Self::Enum(EnumMeta { name, .. })
            | Self::InputObject(InputObjectMeta { name, .. }) => name,
        }
    }

    /// The output fields of this type, if it is an object or interface.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Self::Object(ObjectMeta { fields, .. })
            | Self::Interface(InterfaceMeta { fields, .. }) => Some(fields),
            _ => None,
        }
    }

    /// Looks up an output field by schema name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields()
            .and_then(|fs| fs.iter().find(|f| f.name == name))
    }

    /// Whether this is an abstract (interface or union) type.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// Whether this is a composite (selectable) type.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    /// Whether this type is usable in input positions.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_))
    }

    /// Whether this is a leaf (scalar or enum) type.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }
}

/// Outbound coercion for the built-in scalar types. Unknown scalar names pass
/// values through unchanged.
fn builtin_serialize(name: &str, value: &Value) -> Result<Value, String> {
    match name {
        "Int" => match value.as_int_value() {
            Some(i) => Ok(Value::scalar(i)),
            None => Err(format!("Int cannot represent non-integer value: {value}")),
        },
        "Float" => match value.as_float_value() {
            Some(f) => Ok(Value::scalar(f)),
            None => Err(format!("Float cannot represent non-numeric value: {value}")),
        },
        "String" => match value.as_string_value() {
            Some(s) => Ok(Value::scalar(s)),
            None => Err(format!("String cannot represent value: {value}")),
        },
        "Boolean" => match value.as_boolean_value() {
            Some(b) => Ok(Value::scalar(b)),
            None => Err(format!("Boolean cannot represent value: {value}")),
        },
        "ID" => match value {
            Value::Scalar(s) => match (s.as_str(), s.as_int()) {
                (Some(s), _) => Ok(Value::scalar(s)),
                (_, Some(i)) => Ok(Value::scalar(i.to_string())),
                _ => Err(format!("ID cannot represent value: {value}")),
            },
            _ => Err(format!("ID cannot represent value: {value}")),
        },
        _ => Ok(value.clone()),
    }
}
