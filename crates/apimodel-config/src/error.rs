//! Errors raised while reading, merging, or validating model-build config.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// The file is not valid JSON5.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged document does not match the typed config model.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A single field has the wrong shape or value.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// A whole-document invariant does not hold.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Loading one layer of a layered stack failed.
    #[error("config layer {label} failed: {source}")]
    Layer {
        label: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub(crate) fn in_layer(self, label: impl Into<String>) -> Self {
        match self {
            // Keep the innermost layer label only.
            ConfigError::Layer { .. } => self,
            other => ConfigError::Layer {
                label: label.into(),
                source: Box::new(other),
            },
        }
    }
}
