//! Error types for versioned model assembly.

use apimodel_config::ConfigError;
use thiserror::Error;

/// Errors returned by model builders, contributors, and the build pass.
///
/// A build pass never wraps these; whatever a contributor, factory, or hook
/// returns is what the caller of `build_models` receives.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A required argument was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Text could not be parsed as an API version.
    #[error("invalid api version `{value}`: {reason}")]
    InvalidVersion { value: String, reason: String },
    /// A model configuration rejected the builder state or version.
    #[error("model configuration failed: {0}")]
    Configuration(String),
    /// Creating or finalizing a builder failed.
    #[error("model builder failed: {0}")]
    Builder(String),
    /// The post-creation hook failed.
    #[error("model created hook failed: {0}")]
    Hook(String),
    /// Loading build configuration failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
