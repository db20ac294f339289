//! Test helpers shared across apimodel crates.

pub mod builder;
pub mod configuration;

pub use builder::{CountingFactory, StubModel, StubModelBuilder};
pub use configuration::{
    CallLog, FailingConfiguration, FieldConfiguration, RecordedCall, RecordingConfiguration,
};
