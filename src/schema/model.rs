use std::{collections::HashMap, fmt};

use arcstr::ArcStr;
use fnv::FnvHashMap;

use crate::{
    graphql_value,
    schema::meta::{
        Argument, InterfaceMeta, MetaType, ObjectMeta, ScalarMeta, Type, UnionMeta,
    },
};

/// Runtime metadata for a schema: the type registry, the root operation
/// types, and the directive registry.
///
/// The directive registry decides which execution directives a document may
/// use: `skip` and `include` are always present, while `defer` and `stream`
/// are only available on schemas built with
/// [`SchemaBuilder::with_incremental_delivery`].
pub struct Schema {
    types: FnvHashMap<ArcStr, MetaType>,
    query_type_name: ArcStr,
    mutation_type_name: Option<ArcStr>,
    directives: HashMap<String, DirectiveType>,
}

/// Runtime metadata for a directive.
#[derive(Clone, Debug)]
pub struct DirectiveType {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<DirectiveLocation>,
    pub arguments: Vec<Argument>,
}

/// All places a directive can appear in an executable document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
}

/// Incrementally assembles a [`Schema`]. Registering the built-in scalars is
/// taken care of; every other type referenced by a field or root must be
/// registered explicitly.
pub struct SchemaBuilder {
    types: FnvHashMap<ArcStr, MetaType>,
    query_type_name: ArcStr,
    mutation_type_name: Option<ArcStr>,
    directives: HashMap<String, DirectiveType>,
}

impl Schema {
    /// Starts building a schema whose query root is the given object type.
    pub fn build(query: ObjectMeta) -> SchemaBuilder {
        let mut directives = HashMap::new();
        directives.insert("skip".into(), DirectiveType::new_skip());
        directives.insert("include".into(), DirectiveType::new_include());

        let mut types = FnvHashMap::default();
        for name in ["Int", "Float", "String", "Boolean", "ID"] {
            types.insert(ArcStr::from(name), ScalarMeta::new(name).into_meta());
        }

        let query_type_name = query.name.clone();
        types.insert(query_type_name.clone(), query.into_meta());

        SchemaBuilder {
            types,
            query_type_name,
            mutation_type_name: None,
            directives,
        }
    }

    /// Looks up a type by name.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// The query root type.
    pub fn concrete_query_type(&self) -> &MetaType {
        self.types
            .get(&self.query_type_name)
            .expect("Query type does not exist in schema")
    }

    /// The mutation root type, if this schema supports mutations.
    pub fn concrete_mutation_type(&self) -> Option<&MetaType> {
        self.mutation_type_name.as_ref().map(|name| {
            self.types
                .get(name)
                .expect("Mutation type does not exist in schema")
        })
    }

    /// Looks up a directive by name.
    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name)
    }

    /// The concrete object types an abstract type may resolve to.
    pub fn possible_types(&self, t: &MetaType) -> Vec<&MetaType> {
        match t {
            MetaType::Union(UnionMeta { of_type_names, .. }) => of_type_names
                .iter()
                .filter_map(|n| self.concrete_type_by_name(n))
                .collect(),
            MetaType::Interface(InterfaceMeta { name, .. }) => self
                .types
                .values()
                .filter(|t| match t {
                    MetaType::Object(ObjectMeta {
                        interface_names, ..
                    }) => interface_names.iter().any(|i| i == name),
                    _ => false,
                })
                .collect(),
            _ => panic!("Can't retrieve possible types from non-abstract meta type"),
        }
    }

    /// Whether `possible_type` is one of the concrete types of
    /// `abstract_type`.
    pub fn is_possible_type(&self, abstract_type: &MetaType, possible_type: &MetaType) -> bool {
        self.possible_types(abstract_type)
            .into_iter()
            .any(|t| std::ptr::eq(t, possible_type))
    }

    /// Whether two composite types can have a common object type.
    pub fn type_overlap(&self, t1: &MetaType, t2: &MetaType) -> bool {
        if std::ptr::eq(t1, t2) {
            return true;
        }

        match (t1.is_abstract(), t2.is_abstract()) {
            (true, true) => self
                .possible_types(t1)
                .iter()
                .any(|t| self.is_possible_type(t2, t)),
            (true, false) => self.is_possible_type(t1, t2),
            (false, true) => self.is_possible_type(t2, t1),
            (false, false) => false,
        }
    }

    /// Whether a fragment with the given type condition applies to a value of
    /// the given concrete object type. A missing condition always applies.
    pub fn fragment_condition_applies(
        &self,
        object_type: &MetaType,
        condition: Option<&str>,
    ) -> bool {
        let Some(condition) = condition else {
            return true;
        };
        if condition == object_type.name().as_str() {
            return true;
        }
        match self.concrete_type_by_name(condition) {
            Some(abstract_type) if abstract_type.is_abstract() => {
                self.is_possible_type(abstract_type, object_type)
            }
            _ => false,
        }
    }
}

impl SchemaBuilder {
    /// Registers a type.
    ///
    /// # Panics
    ///
    /// If a type with the same name was already registered.
    #[must_use]
    pub fn register(mut self, meta: MetaType) -> Self {
        let name = meta.name().clone();
        if self.types.insert(name.clone(), meta).is_some() {
            panic!("Type {name} is registered twice");
        }
        self
    }

    /// Sets the mutation root to the given object type and registers it.
    #[must_use]
    pub fn mutation(mut self, mutation: ObjectMeta) -> Self {
        self.mutation_type_name = Some(mutation.name.clone());
        self.register(mutation.into_meta())
    }

    /// Enables incremental delivery by registering the `defer` and `stream`
    /// directives.
    #[must_use]
    pub fn with_incremental_delivery(mut self) -> Self {
        self.directives
            .insert("defer".into(), DirectiveType::new_defer());
        self.directives
            .insert("stream".into(), DirectiveType::new_stream());
        self
    }

    /// Finishes the schema.
    ///
    /// # Panics
    ///
    /// If a root type is not an object type.
    pub fn finish(self) -> Schema {
        let schema = Schema {
            types: self.types,
            query_type_name: self.query_type_name,
            mutation_type_name: self.mutation_type_name,
            directives: self.directives,
        };
        assert!(
            matches!(schema.concrete_query_type(), MetaType::Object(_)),
            "Query root is not an object type",
        );
        if let Some(mutation) = schema.concrete_mutation_type() {
            assert!(
                matches!(mutation, MetaType::Object(_)),
                "Mutation root is not an object type",
            );
        }
        schema
    }
}

impl DirectiveType {
    /// Creates a new directive with the given name, locations and arguments.
    pub fn new(
        name: &str,
        locations: &[DirectiveLocation],
        arguments: Vec<Argument>,
    ) -> DirectiveType {
        DirectiveType {
            name: name.into(),
            description: None,
            locations: locations.to_vec(),
            arguments,
        }
    }

    fn new_skip() -> DirectiveType {
        Self::new(
            "skip",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            vec![Argument::new("if", Type::non_null("Boolean"))],
        )
    }

    fn new_include() -> DirectiveType {
        Self::new(
            "include",
            &[
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            vec![Argument::new("if", Type::non_null("Boolean"))],
        )
    }

    fn new_defer() -> DirectiveType {
        Self::new(
            "defer",
            &[
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
            vec![
                Argument::new("if", Type::non_null("Boolean")).default_value(graphql_value!(true)),
                Argument::new("label", Type::named("String")),
            ],
        )
    }

    fn new_stream() -> DirectiveType {
        Self::new(
            "stream",
            &[DirectiveLocation::Field],
            vec![
                Argument::new("if", Type::non_null("Boolean")).default_value(graphql_value!(true)),
                Argument::new("label", Type::named("String")),
                Argument::new("initialCount", Type::named("Int")).default_value(graphql_value!(0)),
            ],
        )
    }
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
            Self::Field => "field",
            Self::FragmentDefinition => "fragment definition",
            Self::FragmentSpread => "fragment spread",
            Self::InlineFragment => "inline fragment",
        })
    }
}

