//! Serialization of response types into their wire form, and
//! deserialization of provided variable values.

use std::fmt;

use serde::{
    de,
    ser::{self, SerializeMap, SerializeSeq},
    Serialize,
};

use crate::{
    executor::{ExecutionError, PathSegment, Response, ResponsePayload},
    validation::RuleError,
    value::{Object, ScalarValue, Value},
    GraphQLError,
};

#[derive(Serialize)]
struct SerializeHelper {
    message: &'static str,
}

#[derive(Serialize)]
struct SerializedLocation {
    line: usize,
    column: usize,
}

impl From<&graphql_parser::Pos> for SerializedLocation {
    fn from(pos: &graphql_parser::Pos) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl ser::Serialize for ScalarValue {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(i) => serializer.serialize_i32(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}

impl ser::Serialize for Value {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Scalar(s) => s.serialize(serializer),
            Self::List(l) => {
                let mut seq = serializer.serialize_seq(Some(l.len()))?;
                for item in l {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(o) => {
                let mut map = serializer.serialize_map(Some(o.field_count()))?;
                for (k, v) in o.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> de::Deserialize<'de> for Value {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid input value")
            }

            fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
                Ok(Value::scalar(b))
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
                if n >= i64::from(i32::MIN) && n <= i64::from(i32::MAX) {
                    Ok(Value::scalar(n as i32))
                } else {
                    // Integers not fitting 32 bits travel as floats, the way
                    // JSON encoders emit them.
                    Ok(Value::scalar(n as f64))
                }
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
                if n <= i32::MAX as u64 {
                    Ok(Value::scalar(n as i32))
                } else {
                    Ok(Value::scalar(n as f64))
                }
            }

            fn visit_f64<E>(self, f: f64) -> Result<Value, E> {
                Ok(Value::scalar(f))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
                Ok(Value::scalar(s))
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Value::List(items))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
                let mut object = Object::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    object.add_field(key, value);
                }
                Ok(Value::Object(object))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl ser::Serialize for PathSegment {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Key(key) => serializer.serialize_str(key),
            Self::Index(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl ser::Serialize for ExecutionError {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        map.serialize_entry("message", self.error().message())?;

        let locations = vec![SerializedLocation::from(self.location())];
        map.serialize_entry("locations", &locations)?;

        map.serialize_entry("path", self.path())?;

        if !self.error().extensions().is_null() {
            map.serialize_entry("extensions", self.error().extensions())?;
        }

        map.end()
    }
}

impl ser::Serialize for RuleError {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;

        map.serialize_entry("message", self.message())?;

        let locations = self
            .locations()
            .iter()
            .map(SerializedLocation::from)
            .collect::<Vec<_>>();
        map.serialize_entry("locations", &locations)?;

        map.end()
    }
}

impl ser::Serialize for GraphQLError {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::ParseError(e) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(&SerializedParseError {
                    message: &e.to_string(),
                })?;
                seq.end()
            }
            Self::ValidationError(errors) => errors.serialize(serializer),
            Self::NoOperationProvided => [SerializeHelper {
                message: "Must provide an operation",
            }]
            .serialize(serializer),
            Self::MultipleOperationsProvided => [SerializeHelper {
                message: "Must provide operation name if query contains multiple operations",
            }]
            .serialize(serializer),
            Self::UnknownOperationName => [SerializeHelper {
                message: "Unknown operation",
            }]
            .serialize(serializer),
            Self::IsSubscription => [SerializeHelper {
                message: "Expected a query or a mutation operation",
            }]
            .serialize(serializer),
        }
    }
}

#[derive(Serialize)]
struct SerializedParseError<'a> {
    message: &'a str,
}

impl ser::Serialize for Response {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        map.serialize_entry("data", self.data())?;

        if !self.errors().is_empty() {
            map.serialize_entry("errors", self.errors())?;
        }

        map.end()
    }
}

impl ser::Serialize for ResponsePayload {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        if let Some(data) = self.data() {
            map.serialize_entry("data", data)?;
        }
        if let Some(path) = self.path() {
            map.serialize_entry("path", path)?;
        }
        if let Some(label) = self.label() {
            map.serialize_entry("label", label)?;
        }
        if !self.errors().is_empty() {
            map.serialize_entry("errors", self.errors())?;
        }
        map.serialize_entry("hasNext", &self.has_next())?;

        map.end()
    }
}
