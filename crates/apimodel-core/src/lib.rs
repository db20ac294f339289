//! Version-driven model assembly.
//!
//! A [`VersionedModelBuilder`] owns a builder factory, an optional default
//! configuration, an ordered list of [`ModelConfiguration`] contributors and
//! an optional post-creation hook. For each requested [`ApiVersion`] it
//! creates a fresh builder, applies every contributor, finalizes the model,
//! and tags it with the version through the model's [`Annotations`].

pub mod annotations;
pub mod builder;
pub mod configuration;
pub mod convention;
pub mod error;
pub mod version;
pub mod versioned;

pub use annotations::{Annotated, AnnotatedExt, Annotations, ApiVersionAnnotation};
pub use builder::{ModelBuilder, ModelBuilderFactory};
pub use configuration::{
    DefaultModelConfiguration, DelegatingModelConfiguration, ModelConfiguration,
    SharedModelConfiguration, VersionRangeConfiguration, configuration_fn,
};
pub use convention::{
    ConventionModelBuilder, EdmModel, EntitySet, EntityType, EntityTypeConfiguration, Property,
    PropertyKind,
};
pub use error::ModelError;
pub use version::{ApiVersion, configured_api_versions};
pub use versioned::{ModelCreatedHook, VersionedModelBuilder};
