use std::{collections::HashMap, fmt};

use graphql_parser::{
    query::{Definition, Document, FragmentDefinition},
    Pos,
};

use crate::schema::{meta::MetaType, model::Schema};

/// Query validation error.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct RuleError {
    locations: Vec<Pos>,
    message: String,
}

impl RuleError {
    #[doc(hidden)]
    pub fn new(message: &str, locations: &[Pos]) -> Self {
        Self {
            message: message.into(),
            locations: locations.to_vec(),
        }
    }

    /// The message of this validation error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source positions of this validation error.
    ///
    /// All validation errors contain at least one source position; some
    /// rules supply extra context through multiple positions.
    pub fn locations(&self) -> &[Pos] {
        &self.locations
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let locations = self
            .locations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}. At {locations}", self.message)
    }
}

impl std::error::Error for RuleError {}

#[doc(hidden)]
pub struct ValidatorContext<'a> {
    pub schema: &'a Schema,
    pub fragments: HashMap<&'a str, &'a FragmentDefinition<'static, String>>,
    errors: Vec<RuleError>,
    type_stack: Vec<Option<&'a MetaType>>,
}

impl<'a> ValidatorContext<'a> {
    #[doc(hidden)]
    pub fn new(schema: &'a Schema, document: &'a Document<'static, String>) -> Self {
        Self {
            schema,
            fragments: document
                .definitions
                .iter()
                .filter_map(|def| match def {
                    Definition::Fragment(f) => Some((f.name.as_str(), f)),
                    Definition::Operation(_) => None,
                })
                .collect(),
            errors: Vec::new(),
            type_stack: Vec::new(),
        }
    }

    #[doc(hidden)]
    pub fn report_error(&mut self, message: &str, locations: &[Pos]) {
        self.errors.push(RuleError::new(message, locations));
    }

    #[doc(hidden)]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[doc(hidden)]
    pub fn into_errors(mut self) -> Vec<RuleError> {
        self.errors.sort();
        self.errors.dedup();
        self.errors
    }

    #[doc(hidden)]
    pub fn with_pushed_type<F, R>(&mut self, t: Option<&'a MetaType>, f: F) -> R
    where
        F: FnOnce(&mut ValidatorContext<'a>) -> R,
    {
        self.type_stack.push(t);
        let res = f(self);
        self.type_stack.pop();
        res
    }

    #[doc(hidden)]
    pub fn current_type(&self) -> Option<&'a MetaType> {
        *self.type_stack.last().unwrap_or(&None)
    }
}
