use crate::builder::StubModelBuilder;
use apimodel_core::{ApiVersion, ModelConfiguration, ModelError};
use parking_lot::Mutex;
use std::sync::Arc;

/// One `apply` call seen by a [`RecordingConfiguration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub label: String,
    pub api_version: ApiVersion,
    pub builder_id: usize,
}

/// Shared, ordered record of contributor calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: &str, api_version: &ApiVersion, builder_id: usize) {
        self.calls.lock().push(RecordedCall {
            label: label.to_string(),
            api_version: api_version.clone(),
            builder_id,
        });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// `label@version` for each call, in order.
    pub fn labels(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|call| format!("{}@{}", call.label, call.api_version))
            .collect()
    }
}

/// Contributor that only records that it ran.
#[derive(Debug, Clone)]
pub struct RecordingConfiguration {
    label: String,
    log: CallLog,
}

impl RecordingConfiguration {
    pub fn new(label: impl Into<String>, log: &CallLog) -> Self {
        Self {
            label: label.into(),
            log: log.clone(),
        }
    }
}

impl ModelConfiguration<StubModelBuilder> for RecordingConfiguration {
    fn apply(
        &self,
        builder: &mut StubModelBuilder,
        api_version: &ApiVersion,
    ) -> Result<(), ModelError> {
        self.log.record(&self.label, api_version, builder.id());
        Ok(())
    }
}

/// Contributor that fails for one version and records the others.
#[derive(Debug, Clone)]
pub struct FailingConfiguration {
    fail_on: ApiVersion,
    log: CallLog,
}

impl FailingConfiguration {
    pub fn new(fail_on: ApiVersion, log: &CallLog) -> Self {
        Self {
            fail_on,
            log: log.clone(),
        }
    }
}

impl ModelConfiguration<StubModelBuilder> for FailingConfiguration {
    fn apply(
        &self,
        builder: &mut StubModelBuilder,
        api_version: &ApiVersion,
    ) -> Result<(), ModelError> {
        if *api_version == self.fail_on {
            return Err(ModelError::Configuration(format!(
                "rejected api version {api_version}"
            )));
        }
        self.log.record("failing", api_version, builder.id());
        Ok(())
    }
}

/// Contributor that adds or removes one field.
#[derive(Debug, Clone)]
pub enum FieldConfiguration {
    Add(String),
    Remove(String),
}

impl FieldConfiguration {
    pub fn add(name: impl Into<String>) -> Self {
        FieldConfiguration::Add(name.into())
    }

    pub fn remove(name: impl Into<String>) -> Self {
        FieldConfiguration::Remove(name.into())
    }
}

impl ModelConfiguration<StubModelBuilder> for FieldConfiguration {
    fn apply(&self, builder: &mut StubModelBuilder, _: &ApiVersion) -> Result<(), ModelError> {
        match self {
            FieldConfiguration::Add(name) => builder.add_field(name.clone()),
            FieldConfiguration::Remove(name) => builder.remove_field(name),
        }
        Ok(())
    }
}
