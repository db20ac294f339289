//! Builds one model per API version from a shared set of contributors.

use crate::annotations::AnnotatedExt;
use crate::builder::{ModelBuilder, ModelBuilderFactory};
use crate::configuration::{
    DefaultModelConfiguration, DelegatingModelConfiguration, ModelConfiguration,
    SharedModelConfiguration,
};
use crate::convention::ConventionModelBuilder;
use crate::error::ModelError;
use crate::version::ApiVersion;
use log::{debug, info, warn};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with the builder and its finished, version-tagged model.
pub type ModelCreatedHook<B> =
    Arc<dyn Fn(&B, &<B as ModelBuilder>::Model) -> Result<(), ModelError> + Send + Sync>;

/// Versioned variant of a model builder.
///
/// Holds the builder factory, an optional default configuration, the
/// registered contributors, and an optional post-creation hook. Each call to
/// [`build_models`](Self::build_models) is an independent pass over the
/// current settings: every version gets a fresh builder, the merged
/// contributors are applied in order, and the finished model is tagged with
/// its version before it is collected.
///
/// Configuration is changed through `&mut self` and a pass borrows `&self`,
/// so settings cannot move underneath a running pass.
pub struct VersionedModelBuilder<B: ModelBuilder = ConventionModelBuilder> {
    model_builder_factory: ModelBuilderFactory<B>,
    default_model_configuration: Option<DefaultModelConfiguration<B>>,
    model_configurations: Vec<SharedModelConfiguration<B>>,
    on_model_created: Option<ModelCreatedHook<B>>,
}

impl<B> VersionedModelBuilder<B>
where
    B: ModelBuilder + Default + 'static,
{
    /// Builder using `B::default()` for every version.
    pub fn new() -> Self {
        Self::with_factory(ModelBuilderFactory::default())
    }
}

impl<B> Default for VersionedModelBuilder<B>
where
    B: ModelBuilder + Default + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<B> VersionedModelBuilder<B>
where
    B: ModelBuilder + 'static,
{
    pub fn with_factory(model_builder_factory: ModelBuilderFactory<B>) -> Self {
        Self {
            model_builder_factory,
            default_model_configuration: None,
            model_configurations: Vec::new(),
            on_model_created: None,
        }
    }

    /// Factory used to create one builder per version.
    pub fn model_builder_factory(&self) -> &ModelBuilderFactory<B> {
        &self.model_builder_factory
    }

    pub fn set_model_builder_factory(&mut self, factory: ModelBuilderFactory<B>) {
        self.model_builder_factory = factory;
    }

    /// Checked variant of [`set_model_builder_factory`](Self::set_model_builder_factory)
    /// for callers holding an optional factory.
    pub fn try_set_model_builder_factory(
        &mut self,
        factory: Option<ModelBuilderFactory<B>>,
    ) -> Result<(), ModelError> {
        let factory = factory.ok_or_else(|| {
            ModelError::InvalidArgument("model builder factory is required".to_string())
        })?;
        self.set_model_builder_factory(factory);
        Ok(())
    }

    pub fn default_model_configuration(&self) -> Option<&DefaultModelConfiguration<B>> {
        self.default_model_configuration.as_ref()
    }

    /// Replace the callback applied ahead of every registered contributor.
    /// `None` clears it.
    pub fn set_default_model_configuration(
        &mut self,
        configuration: Option<DefaultModelConfiguration<B>>,
    ) {
        self.default_model_configuration = configuration;
    }

    /// Registered contributors in application order.
    pub fn model_configurations(&self) -> &[SharedModelConfiguration<B>] {
        &self.model_configurations
    }

    /// Live contributor list. Order and duplicates are the caller's call.
    pub fn model_configurations_mut(&mut self) -> &mut Vec<SharedModelConfiguration<B>> {
        &mut self.model_configurations
    }

    pub fn add_model_configuration<C>(&mut self, configuration: C)
    where
        C: ModelConfiguration<B> + 'static,
    {
        self.model_configurations.push(Arc::new(configuration));
    }

    pub fn on_model_created(&self) -> Option<&ModelCreatedHook<B>> {
        self.on_model_created.as_ref()
    }

    pub fn set_on_model_created(&mut self, hook: Option<ModelCreatedHook<B>>) {
        self.on_model_created = hook;
    }

    /// Contributors for the next pass: the default configuration (if any)
    /// first, then the registered ones in order.
    ///
    /// Without a default configuration this borrows the registered list.
    pub fn merged_configurations(&self) -> Cow<'_, [SharedModelConfiguration<B>]> {
        let Some(default_configuration) = &self.default_model_configuration else {
            return Cow::Borrowed(&self.model_configurations);
        };

        let mut configurations: Vec<SharedModelConfiguration<B>> =
            Vec::with_capacity(self.model_configurations.len() + 1);
        configurations.push(Arc::new(DelegatingModelConfiguration::new(Arc::clone(
            default_configuration,
        ))));
        configurations.extend(self.model_configurations.iter().cloned());
        Cow::Owned(configurations)
    }

    /// Build and collect one model per version into `models`.
    ///
    /// The first error stops the pass and is returned as-is. Models for
    /// versions completed before the failure stay in `models`; nothing is
    /// pushed for the failing version.
    pub fn build_model_per_api_version<'v, I>(
        &self,
        api_versions: I,
        configurations: &[SharedModelConfiguration<B>],
        models: &mut Vec<B::Model>,
    ) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = &'v ApiVersion>,
    {
        for api_version in api_versions {
            debug!(
                "building model (api_version={}, configurations={})",
                api_version,
                configurations.len()
            );
            let mut builder = self.model_builder_factory.create()?;

            for configuration in configurations {
                configuration.apply(&mut builder, api_version)?;
            }

            let model = builder.get_model()?;
            model.set_api_version(api_version.clone());

            if let Some(on_model_created) = &self.on_model_created {
                on_model_created(&builder, &model)?;
            }

            models.push(model);
        }
        Ok(())
    }

    /// Build one model per version, in the order given.
    ///
    /// Returns every model or the first error; never a partial list.
    pub fn build_models(&self, api_versions: &[ApiVersion]) -> Result<Vec<B::Model>, ModelError> {
        let configurations = self.merged_configurations();
        let mut models = Vec::with_capacity(api_versions.len());
        self.build_model_per_api_version(api_versions, &configurations, &mut models)
            .inspect_err(|err| {
                warn!(
                    "model build pass aborted (built={}, requested={}): {}",
                    models.len(),
                    api_versions.len(),
                    err
                )
            })?;
        info!(
            "built {} versioned models (configurations={})",
            models.len(),
            configurations.len()
        );
        Ok(models)
    }
}

impl<B: ModelBuilder> fmt::Debug for VersionedModelBuilder<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionedModelBuilder")
            .field("model_builder_factory", &self.model_builder_factory)
            .field(
                "default_model_configuration",
                &self.default_model_configuration.is_some(),
            )
            .field("model_configurations", &self.model_configurations.len())
            .field("on_model_created", &self.on_model_created.is_some())
            .finish()
    }
}
