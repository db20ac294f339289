//! Conventional model builder used by default factories.
//!
//! Entity types and sets are declared explicitly; keys are inferred by
//! convention when a type does not declare one: a property named `Id`, or
//! `<TypeName><key_suffix>` (`OrderId` with the default suffix).

mod model;

pub use model::{EdmModel, EntitySet, EntityType, Property, PropertyKind};

use crate::builder::{ModelBuilder, ModelBuilderFactory};
use crate::error::ModelError;
use crate::versioned::VersionedModelBuilder;
use apimodel_config::{ModelBuildConfig, ModelSettings};
use log::debug;

/// Convention key property name checked before `<TypeName><key_suffix>`.
const CONVENTIONAL_KEY: &str = "Id";

/// Mutable declaration of an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTypeConfiguration {
    name: String,
    properties: Vec<Property>,
    key: Vec<String>,
}

impl EntityTypeConfiguration {
    fn new(name: String) -> Self {
        Self {
            name,
            properties: Vec::new(),
            key: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a property, or change the kind of an existing one.
    pub fn property(&mut self, name: impl Into<String>, kind: PropertyKind) -> &mut Self {
        let name = name.into();
        match self.properties.iter_mut().find(|property| property.name == name) {
            Some(existing) => existing.kind = kind,
            None => self.properties.push(Property { name, kind }),
        }
        self
    }

    /// Remove a property and drop it from the explicit key.
    pub fn remove_property(&mut self, name: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|property| property.name != name);
        self.key.retain(|key| key != name);
        before != self.properties.len()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|property| property.name == name)
    }

    /// Add `name` to the explicit key. Explicit keys disable key inference.
    pub fn has_key(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.key.contains(&name) {
            self.key.push(name);
        }
        self
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    fn resolve_key(&self, key_suffix: &str) -> Result<Vec<String>, ModelError> {
        if !self.key.is_empty() {
            if let Some(missing) = self.key.iter().find(|key| !self.has_property(key)) {
                return Err(ModelError::Builder(format!(
                    "key `{missing}` of entity type `{}` is not a declared property",
                    self.name
                )));
            }
            return Ok(self.key.clone());
        }

        let suffixed = format!("{}{}", self.name, key_suffix);
        [CONVENTIONAL_KEY, suffixed.as_str()]
            .into_iter()
            .find(|candidate| self.has_property(candidate))
            .map(|key| vec![key.to_string()])
            .ok_or_else(|| {
                ModelError::Builder(format!(
                    "entity type `{}` has no key; declare one or add `{CONVENTIONAL_KEY}` or `{suffixed}`",
                    self.name
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EntitySetConfiguration {
    name: String,
    entity_type: String,
}

/// Builder that turns declared entity types and sets into an [`EdmModel`].
#[derive(Debug, Clone, Default)]
pub struct ConventionModelBuilder {
    settings: ModelSettings,
    entity_types: Vec<EntityTypeConfiguration>,
    entity_sets: Vec<EntitySetConfiguration>,
}

impl ConventionModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ModelSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn namespace(&self) -> &str {
        &self.settings.namespace
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) -> &mut Self {
        self.settings.namespace = namespace.into();
        self
    }

    pub fn container_name(&self) -> &str {
        &self.settings.container
    }

    pub fn set_container_name(&mut self, container: impl Into<String>) -> &mut Self {
        self.settings.container = container.into();
        self
    }

    /// Get or declare an entity type.
    pub fn entity_type(&mut self, name: impl Into<String>) -> &mut EntityTypeConfiguration {
        let name = name.into();
        let index = match self.entity_types.iter().position(|entity| entity.name == name) {
            Some(index) => index,
            None => {
                self.entity_types.push(EntityTypeConfiguration::new(name));
                self.entity_types.len() - 1
            }
        };
        &mut self.entity_types[index]
    }

    pub fn find_entity_type(&self, name: &str) -> Option<&EntityTypeConfiguration> {
        self.entity_types.iter().find(|entity| entity.name == name)
    }

    /// Expose `entity_type` through a set named `name`, declaring the type
    /// if needed. Re-declaring a set points it at the new type.
    pub fn entity_set(
        &mut self,
        name: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> &mut EntityTypeConfiguration {
        let name = name.into();
        let entity_type = entity_type.into();
        match self.entity_sets.iter_mut().find(|set| set.name == name) {
            Some(existing) => existing.entity_type = entity_type.clone(),
            None => self.entity_sets.push(EntitySetConfiguration {
                name,
                entity_type: entity_type.clone(),
            }),
        }
        self.entity_type(entity_type)
    }

    pub fn has_entity_set(&self, name: &str) -> bool {
        self.entity_sets.iter().any(|set| set.name == name)
    }

    pub fn remove_entity_set(&mut self, name: &str) -> bool {
        let before = self.entity_sets.len();
        self.entity_sets.retain(|set| set.name != name);
        before != self.entity_sets.len()
    }

    /// Remove an entity type and every set exposing it.
    pub fn ignore(&mut self, entity_type: &str) -> bool {
        let before = self.entity_types.len();
        self.entity_types.retain(|entity| entity.name != entity_type);
        self.entity_sets.retain(|set| set.entity_type != entity_type);
        before != self.entity_types.len()
    }
}

impl ModelBuilder for ConventionModelBuilder {
    type Model = EdmModel;

    fn get_model(&self) -> Result<EdmModel, ModelError> {
        if self.settings.namespace.trim().is_empty() {
            return Err(ModelError::Builder("model namespace is empty".to_string()));
        }

        let entity_types = self
            .entity_types
            .iter()
            .map(|entity| -> Result<EntityType, ModelError> {
                Ok(EntityType {
                    namespace: self.settings.namespace.clone(),
                    name: entity.name.clone(),
                    key: entity.resolve_key(&self.settings.key_suffix)?,
                    properties: entity.properties.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let entity_sets = self
            .entity_sets
            .iter()
            .map(|set| EntitySet {
                name: set.name.clone(),
                entity_type: set.entity_type.clone(),
            })
            .collect::<Vec<_>>();

        debug!(
            "finalized model (namespace={}, entity_types={}, entity_sets={})",
            self.settings.namespace,
            entity_types.len(),
            entity_sets.len()
        );
        Ok(EdmModel::new(
            self.settings.namespace.clone(),
            self.settings.container.clone(),
            entity_types,
            entity_sets,
        ))
    }
}

impl VersionedModelBuilder<ConventionModelBuilder> {
    /// Versioned builder whose factory seeds every builder with the
    /// config's model settings.
    pub fn from_config(config: &ModelBuildConfig) -> Self {
        let settings = config.model.clone();
        Self::with_factory(ModelBuilderFactory::new(move || {
            Ok(ConventionModelBuilder::with_settings(settings.clone()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConventionModelBuilder, PropertyKind};
    use crate::{ModelBuilder, ModelError};
    use apimodel_config::ModelSettings;
    use pretty_assertions::assert_eq;

    #[test]
    fn infers_conventional_keys() {
        let mut builder = ConventionModelBuilder::new();
        builder
            .entity_set("People", "Person")
            .property("Id", PropertyKind::Int32)
            .property("Name", PropertyKind::String);
        builder
            .entity_set("Orders", "Order")
            .property("OrderId", PropertyKind::Guid)
            .property("Total", PropertyKind::Decimal);

        let model = builder.get_model().expect("model");
        assert_eq!(model.namespace(), "Default");
        assert_eq!(model.container(), "Container");
        assert_eq!(model.entity_type("Person").expect("person").key, vec!["Id"]);
        assert_eq!(
            model.entity_type("Order").expect("order").key,
            vec!["OrderId"]
        );
        assert_eq!(
            model.entity_set("Orders").expect("orders").entity_type,
            "Order"
        );
        assert_eq!(
            model.entity_type("Order").expect("order").full_name(),
            "Default.Order"
        );
    }

    #[test]
    fn explicit_key_wins_and_must_exist() {
        let mut builder = ConventionModelBuilder::new();
        builder
            .entity_type("Line")
            .property("Id", PropertyKind::Int32)
            .property("Number", PropertyKind::Int32)
            .has_key("Number");
        let model = builder.get_model().expect("model");
        assert_eq!(model.entity_type("Line").expect("line").key, vec!["Number"]);

        builder.entity_type("Line").has_key("Missing");
        let err = builder.get_model().unwrap_err();
        assert!(matches!(err, ModelError::Builder(message) if message.contains("Missing")));
    }

    #[test]
    fn missing_key_fails_finalization() {
        let mut builder = ConventionModelBuilder::new();
        builder
            .entity_type("Note")
            .property("Text", PropertyKind::String);
        let err = builder.get_model().unwrap_err();
        assert!(matches!(err, ModelError::Builder(message) if message.contains("Note")));
    }

    #[test]
    fn custom_key_suffix_is_honored() {
        let mut builder = ConventionModelBuilder::with_settings(ModelSettings {
            key_suffix: "Key".to_string(),
            ..ModelSettings::default()
        });
        builder
            .entity_type("Order")
            .property("OrderKey", PropertyKind::Int64);
        let model = builder.get_model().expect("model");
        assert_eq!(
            model.entity_type("Order").expect("order").key,
            vec!["OrderKey"]
        );
    }

    #[test]
    fn removing_and_ignoring_declarations() {
        let mut builder = ConventionModelBuilder::new();
        builder
            .entity_set("People", "Person")
            .property("Id", PropertyKind::Int32)
            .property("Email", PropertyKind::String);
        builder
            .entity_set("Audits", "Audit")
            .property("Id", PropertyKind::Int32);

        assert!(builder.entity_type("Person").remove_property("Email"));
        assert!(!builder.entity_type("Person").remove_property("Email"));
        assert!(builder.ignore("Audit"));
        assert!(!builder.has_entity_set("Audits"));
        assert!(!builder.remove_entity_set("Audits"));

        let model = builder.get_model().expect("model");
        assert_eq!(model.entity_types().len(), 1);
        assert_eq!(model.entity_sets().len(), 1);
        assert!(
            model
                .entity_type("Person")
                .expect("person")
                .property("Email")
                .is_none()
        );
    }

    #[test]
    fn redeclaring_property_changes_kind() {
        let mut builder = ConventionModelBuilder::new();
        builder
            .entity_type("Person")
            .property("Id", PropertyKind::Int32)
            .property("Id", PropertyKind::Guid);
        let model = builder.get_model().expect("model");
        let person = model.entity_type("Person").expect("person");
        assert_eq!(person.properties.len(), 1);
        assert_eq!(person.properties[0].kind, PropertyKind::Guid);
        assert_eq!(person.properties[0].kind.to_string(), "Edm.Guid");
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let mut builder = ConventionModelBuilder::new();
        builder.set_namespace(" ");
        assert!(matches!(
            builder.get_model().unwrap_err(),
            ModelError::Builder(_)
        ));
    }
}
