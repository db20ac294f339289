//! Public surface for versioned model assembly.
//!
//! Re-exports the core building blocks and the config loader, plus a couple
//! of helpers that wire them together the way most consumers need.

/// Re-export for convenience.
pub use apimodel_config as config;
/// Re-export for convenience.
pub use apimodel_core as core;

pub use apimodel_config::{ConfigError, ModelBuildConfig, ModelSettings};
pub use apimodel_core::{
    AnnotatedExt, ApiVersion, ConventionModelBuilder, EdmModel, ModelBuilder, ModelBuilderFactory,
    ModelConfiguration, ModelError, PropertyKind, VersionRangeConfiguration, VersionedModelBuilder,
    configuration_fn,
};

use log::info;
use std::path::Path;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

/// Versioned builder and version list loaded from the layered config rooted
/// at `cwd`.
///
/// The returned builder has no contributors yet; register them before
/// calling `build_models` with the returned versions.
pub fn load_versioned_builder(
    cwd: impl AsRef<Path>,
) -> Result<(VersionedModelBuilder, Vec<ApiVersion>), ModelError> {
    let layered = ModelBuildConfig::load_layered(cwd)?;
    let versions = apimodel_core::configured_api_versions(&layered.config)?;
    info!(
        "prepared versioned builder (layers={}, api_versions={})",
        layered.layers.len(),
        versions.len()
    );
    Ok((VersionedModelBuilder::from_config(&layered.config), versions))
}
