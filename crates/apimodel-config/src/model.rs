//! Configuration schema for versioned model builds.

use serde::{Deserialize, Serialize};

/// Root config describing which API versions get a model and how the
/// conventional builder is seeded.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ModelBuildConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    /// API versions to build, in their textual form (`"1.0"`, `"2017-05-01"`).
    #[serde(default)]
    pub api_versions: Vec<String>,
    #[serde(default)]
    pub model: ModelSettings,
}

impl ModelBuildConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> ModelBuildConfigBuilder {
        ModelBuildConfigBuilder::new()
    }
}

/// Builder for assembling a `ModelBuildConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct ModelBuildConfigBuilder {
    config: ModelBuildConfig,
}

impl ModelBuildConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: ModelBuildConfig::default(),
        }
    }

    /// Append a single API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_versions.push(version.into());
        self
    }

    /// Replace the full API version list.
    pub fn api_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.api_versions = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the conventional builder settings.
    pub fn model(mut self, model: ModelSettings) -> Self {
        self.config.model = model;
        self
    }

    /// Finalize and return the built `ModelBuildConfig`.
    pub fn build(self) -> ModelBuildConfig {
        self.config
    }
}

/// Settings used to seed each conventional model builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelSettings {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_container")]
    pub container: String,
    /// Suffix appended to an entity type name when inferring its key
    /// (`Order` + `Id` -> `OrderId`).
    #[serde(default = "default_key_suffix")]
    pub key_suffix: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            container: default_container(),
            key_suffix: default_key_suffix(),
        }
    }
}

fn default_namespace() -> String {
    "Default".to_string()
}

fn default_container() -> String {
    "Container".to_string()
}

fn default_key_suffix() -> String {
    "Id".to_string()
}
