//! Layered configuration loader.
//!
//! Discovers config layers (user, project, cwd, runtime overrides), validates
//! each against the schema, merges them in precedence order, and produces the
//! effective `ModelBuildConfig`.

mod layer_io;
mod merge;
mod schema;
mod utils;


use crate::{ConfigError, ModelBuildConfig};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "apimodel.json5";
/// Default config directory under the user's home.
const DEFAULT_CONFIG_DIR: &str = ".apimodel";
/// Marker files/dirs that identify a project root.
const DEFAULT_PROJECT_ROOT_MARKERS: &[&str] = &[".git"];

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: ModelBuildConfig,
    /// Layers that contributed to the effective config, lowest precedence first.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-specific configuration.
    User,
    /// Project root configuration.
    Project,
    /// Current working directory configuration.
    Cwd,
    /// Runtime overrides (highest precedence).
    Runtime,
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    pub source: ConfigLayerSource,
    pub path: PathBuf,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to find the project root and the cwd layer.
    pub cwd: PathBuf,
    /// Optional user config path (defaults to `~/.apimodel/apimodel.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied last, in order.
    pub runtime_paths: Vec<PathBuf>,
    /// Marker files/dirs used to detect the project root.
    pub project_root_markers: Vec<String>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
            project_root_markers: DEFAULT_PROJECT_ROOT_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        }
    }

    /// Add a runtime override config path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl ModelBuildConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading model config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value, "config")
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading model config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations.
    ///
    /// Layer precedence (low -> high): user, project, cwd, runtime overrides.
    /// Objects merge key by key; arrays and scalars from a higher layer
    /// replace the lower value wholesale, so `api_versions` is never
    /// concatenated across layers.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = utils::normalize_path(&options.cwd)?;
        debug!("normalized cwd for config load: {}", cwd.display());

        let mut candidates = Vec::new();
        if let Some(path) = options.user_config_path {
            candidates.push((ConfigLayerSource::User, path, false));
        }
        if let Some(root) = utils::find_project_root(&cwd, &options.project_root_markers) {
            debug!("resolved project root: {}", root.display());
            candidates.push((ConfigLayerSource::Project, root.join(DEFAULT_CONFIG_FILE), false));
        }
        candidates.push((ConfigLayerSource::Cwd, cwd.join(DEFAULT_CONFIG_FILE), false));
        for path in options.runtime_paths {
            candidates.push((ConfigLayerSource::Runtime, path, true));
        }

        let mut layers = Vec::new();
        let mut seen_paths = HashSet::new();
        let mut merged = Value::Object(serde_json::Map::new());
        for (source, path, required) in candidates {
            if !required && !path.exists() {
                debug!(
                    "skipping missing layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            if !seen_paths.insert(utils::unique_path(&path)) {
                debug!(
                    "skipping duplicate layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            let loaded = layer_io::load_layer(source, &path)?;
            merge::merge_json_values(&mut merged, &loaded.value);
            layers.push(loaded.meta);
        }

        let config = config_from_value(merged, "effective")?;
        info!(
            "layered model config loaded (layers={}, api_versions={})",
            layers.len(),
            config.api_versions.len()
        );
        Ok(LayeredConfig { config, layers })
    }

    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (idx, version) in self.api_versions.iter().enumerate() {
            if version.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    path: format!("api_versions[{idx}]"),
                    message: "version must not be blank".to_string(),
                });
            }
        }
        for (path, value) in [
            ("model.namespace", &self.model.namespace),
            ("model.container", &self.model.container),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidField {
                    path: path.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Internal representation of a loaded config layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<ModelBuildConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: ModelBuildConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
