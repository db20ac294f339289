//! Configuration models and layered config loading.
//!
//! This crate owns the model-build config schema, validation, and the
//! layer-merging logic used to decide which API versions get a model and how
//! the conventional builder is seeded.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
