//! Immutable schema produced by the conventional builder.

use crate::annotations::{Annotated, Annotations};
use std::fmt;

/// Primitive type of a structural property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    String,
    Int32,
    Int64,
    Boolean,
    Decimal,
    DateTimeOffset,
    Guid,
}

impl PropertyKind {
    /// Qualified primitive type name, e.g. `Edm.Int32`.
    pub fn type_name(self) -> &'static str {
        match self {
            PropertyKind::String => "Edm.String",
            PropertyKind::Int32 => "Edm.Int32",
            PropertyKind::Int64 => "Edm.Int64",
            PropertyKind::Boolean => "Edm.Boolean",
            PropertyKind::Decimal => "Edm.Decimal",
            PropertyKind::DateTimeOffset => "Edm.DateTimeOffset",
            PropertyKind::Guid => "Edm.Guid",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub kind: PropertyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    pub namespace: String,
    pub name: String,
    /// Key property names, in declaration order.
    pub key: Vec<String>,
    pub properties: Vec<Property>,
}

impl EntityType {
    /// `Namespace.Name`.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySet {
    pub name: String,
    /// Name of the entity type within the model namespace.
    pub entity_type: String,
}

/// Finished schema for one API version.
#[derive(Debug, Clone)]
pub struct EdmModel {
    namespace: String,
    container: String,
    entity_types: Vec<EntityType>,
    entity_sets: Vec<EntitySet>,
    annotations: Annotations,
}

impl EdmModel {
    pub(crate) fn new(
        namespace: String,
        container: String,
        entity_types: Vec<EntityType>,
        entity_sets: Vec<EntitySet>,
    ) -> Self {
        Self {
            namespace,
            container,
            entity_types,
            entity_sets,
            annotations: Annotations::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn entity_types(&self) -> &[EntityType] {
        &self.entity_types
    }

    pub fn entity_sets(&self) -> &[EntitySet] {
        &self.entity_sets
    }

    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types.iter().find(|entity| entity.name == name)
    }

    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|set| set.name == name)
    }
}

impl Annotated for EdmModel {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
