//! Build-pass behavior of the versioned model builder.

use apimodel_core::{
    Annotated, AnnotatedExt, ApiVersion, ModelConfiguration, ModelError, SharedModelConfiguration,
    VersionedModelBuilder, configuration_fn,
};
use apimodel_test_utils::{
    CallLog, CountingFactory, FailingConfiguration, FieldConfiguration, RecordingConfiguration,
    StubModel, StubModelBuilder,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Arc;

fn v(text: &str) -> ApiVersion {
    text.parse().expect("version")
}

fn versions(texts: &[&str]) -> Vec<ApiVersion> {
    texts.iter().map(|text| v(text)).collect()
}

fn counted_builder() -> (VersionedModelBuilder<StubModelBuilder>, CountingFactory) {
    let counter = CountingFactory::new();
    let builder = VersionedModelBuilder::with_factory(counter.factory());
    (builder, counter)
}

fn recording(label: &str, log: &CallLog) -> SharedModelConfiguration<StubModelBuilder> {
    Arc::new(RecordingConfiguration::new(label, log))
}

#[test]
fn merged_configurations_without_default_are_the_registered_list() {
    let log = CallLog::new();
    let mut builder = VersionedModelBuilder::<StubModelBuilder>::new();
    let first = recording("a", &log);
    let second = recording("b", &log);
    builder.model_configurations_mut().push(Arc::clone(&first));
    builder.model_configurations_mut().push(Arc::clone(&second));

    let merged = builder.merged_configurations();
    assert_eq!(merged.len(), 2);
    assert!(Arc::ptr_eq(&merged[0], &first));
    assert!(Arc::ptr_eq(&merged[1], &second));
}

#[test]
fn merged_configurations_put_default_first() {
    let log = CallLog::new();
    let mut builder = VersionedModelBuilder::<StubModelBuilder>::new();
    let registered = recording("registered", &log);
    builder.model_configurations_mut().push(Arc::clone(&registered));
    let default_log = log.clone();
    builder.set_default_model_configuration(Some(Arc::new(
        move |builder: &mut StubModelBuilder, version: &ApiVersion| -> Result<(), ModelError> {
            default_log.record("default", version, builder.id());
            Ok(())
        },
    )));

    let merged = builder.merged_configurations();
    assert_eq!(merged.len(), 2);
    assert!(Arc::ptr_eq(&merged[1], &registered));

    let mut stub = StubModelBuilder::new();
    merged[0].apply(&mut stub, &v("1.0")).expect("apply");
    assert_eq!(log.labels(), vec!["default@1.0"]);
}

#[test]
fn merged_configurations_empty_when_nothing_registered() {
    let builder = VersionedModelBuilder::<StubModelBuilder>::new();
    assert!(builder.merged_configurations().is_empty());
}

#[test]
fn builds_one_tagged_model_per_version_in_order() {
    let (builder, counter) = counted_builder();
    let requested = versions(&["2.0", "1.0", "2017-05-01", "3.0-beta"]);

    let models = builder.build_models(&requested).expect("models");

    assert_eq!(models.len(), requested.len());
    for (model, version) in models.iter().zip(&requested) {
        assert_eq!(model.api_version().as_ref(), Some(version));
        assert_eq!(model.annotations().len(), 1);
    }
    assert_eq!(counter.created(), requested.len());
}

#[test]
fn every_version_gets_a_fresh_builder() {
    let (builder, counter) = counted_builder();
    let requested = versions(&["1.0", "2.0", "3.0"]);

    let first_pass = builder.build_models(&requested).expect("first pass");
    let second_pass = builder.build_models(&requested).expect("second pass");

    let ids = first_pass
        .iter()
        .chain(&second_pass)
        .map(|model| model.builder_id)
        .collect::<HashSet<_>>();
    assert_eq!(ids.len(), 6);
    assert_eq!(counter.created(), 6);
}

#[test]
fn contributors_run_in_merged_order_once_per_version() {
    let log = CallLog::new();
    let (mut builder, _counter) = counted_builder();
    builder.add_model_configuration(RecordingConfiguration::new("a", &log));
    builder.add_model_configuration(RecordingConfiguration::new("b", &log));
    let default_log = log.clone();
    builder.set_default_model_configuration(Some(Arc::new(
        move |builder: &mut StubModelBuilder, version: &ApiVersion| -> Result<(), ModelError> {
            default_log.record("default", version, builder.id());
            Ok(())
        },
    )));

    let models = builder
        .build_models(&versions(&["1.0", "2.0"]))
        .expect("models");

    assert_eq!(
        log.labels(),
        vec![
            "default@1.0",
            "a@1.0",
            "b@1.0",
            "default@2.0",
            "a@2.0",
            "b@2.0"
        ]
    );

    // every call for one version saw the builder that produced its model
    let calls = log.calls();
    for (index, model) in models.iter().enumerate() {
        let version_calls = &calls[index * 3..index * 3 + 3];
        assert!(
            version_calls
                .iter()
                .all(|call| call.builder_id == model.builder_id)
        );
    }
}

#[test]
fn duplicate_registrations_are_applied_twice() {
    let log = CallLog::new();
    let (mut builder, _counter) = counted_builder();
    let shared = recording("dup", &log);
    builder.model_configurations_mut().push(Arc::clone(&shared));
    builder.model_configurations_mut().push(shared);

    builder.build_models(&versions(&["1.0"])).expect("models");
    assert_eq!(log.labels(), vec!["dup@1.0", "dup@1.0"]);
}

#[test]
fn hook_fires_once_per_model_after_tagging() {
    let (mut builder, _counter) = counted_builder();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let hook_seen = Arc::clone(&seen);
    builder.set_on_model_created(Some(Arc::new(
        move |builder: &StubModelBuilder, model: &StubModel| -> Result<(), ModelError> {
            assert_eq!(builder.id(), model.builder_id);
            let version = model
                .api_version()
                .ok_or_else(|| ModelError::Hook("model not tagged".to_string()))?;
            hook_seen.lock().push(version.to_string());
            Ok(())
        },
    )));

    let models = builder
        .build_models(&versions(&["1.0", "1.1", "2.0"]))
        .expect("models");

    assert_eq!(models.len(), 3);
    assert_eq!(*seen.lock(), vec!["1.0", "1.1", "2.0"]);
}

#[test]
fn contributor_failure_aborts_the_pass() {
    let log = CallLog::new();
    let (mut builder, counter) = counted_builder();
    builder.add_model_configuration(FailingConfiguration::new(v("2.0"), &log));
    builder.add_model_configuration(RecordingConfiguration::new("after", &log));

    let err = builder
        .build_models(&versions(&["1.0", "2.0", "3.0"]))
        .unwrap_err();

    assert!(
        matches!(&err, ModelError::Configuration(message) if message == "rejected api version 2.0"),
        "{err}"
    );
    assert_eq!(log.labels(), vec!["failing@1.0", "after@1.0"]);
    assert_eq!(counter.created(), 2);
}

#[test]
fn partial_output_stays_with_the_caller_of_the_assembler() {
    let log = CallLog::new();
    let (mut builder, _counter) = counted_builder();
    builder.add_model_configuration(FailingConfiguration::new(v("2.0"), &log));

    let requested = versions(&["1.0", "2.0", "3.0"]);
    let mut models = Vec::new();
    let configurations = builder.merged_configurations();
    let result = builder.build_model_per_api_version(&requested, &configurations, &mut models);

    assert!(result.is_err());
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].api_version(), Some(v("1.0")));
}

#[test]
fn hook_failure_propagates_unchanged() {
    let (mut builder, _counter) = counted_builder();
    builder.set_on_model_created(Some(Arc::new(
        |_: &StubModelBuilder, _: &StubModel| -> Result<(), ModelError> {
            Err(ModelError::Hook("observer refused".to_string()))
        },
    )));

    let err = builder.build_models(&versions(&["1.0"])).unwrap_err();
    assert!(matches!(err, ModelError::Hook(message) if message == "observer refused"));
}

#[test]
fn finalization_failure_propagates() {
    let (builder, counter) = counted_builder();
    counter.fail_on_build();
    let err = builder.build_models(&versions(&["1.0"])).unwrap_err();
    assert!(matches!(err, ModelError::Builder(_)));
}

#[test]
fn failing_factory_never_populates_output() {
    let (builder, counter) = counted_builder();
    counter.fail_on_create();

    let mut models = Vec::new();
    let configurations = builder.merged_configurations();
    let err = builder
        .build_model_per_api_version(&versions(&["1.0", "2.0"]), &configurations, &mut models)
        .unwrap_err();

    assert!(matches!(err, ModelError::Builder(message) if message == "factory disabled"));
    assert!(models.is_empty());
    assert_eq!(counter.created(), 1);
}

#[test]
fn noop_default_configuration_with_two_versions() {
    let (mut builder, _counter) = counted_builder();
    builder.set_default_model_configuration(Some(Arc::new(
        |_: &mut StubModelBuilder, _: &ApiVersion| -> Result<(), ModelError> { Ok(()) },
    )));

    let models = builder
        .build_models(&versions(&["1.0", "2.0"]))
        .expect("models");

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].api_version(), Some(v("1.0")));
    assert_eq!(models[1].api_version(), Some(v("2.0")));
    assert_ne!(models[0].builder_id, models[1].builder_id);
}

#[test]
fn contributors_apply_sequentially() {
    let (mut builder, _counter) = counted_builder();
    builder.add_model_configuration(FieldConfiguration::add("X"));
    builder.add_model_configuration(FieldConfiguration::remove("X"));
    let models = builder.build_models(&versions(&["1.0"])).expect("models");
    assert!(!models[0].has_field("X"));

    builder.model_configurations_mut().reverse();
    let models = builder.build_models(&versions(&["1.0"])).expect("models");
    assert!(models[0].has_field("X"));
}

#[test]
fn configuration_changes_only_affect_later_passes() {
    let (mut builder, _counter) = counted_builder();
    builder.add_model_configuration(FieldConfiguration::add("Name"));
    let before = builder.build_models(&versions(&["1.0"])).expect("before");

    builder.model_configurations_mut().clear();
    builder.add_model_configuration(FieldConfiguration::add("Email"));
    let after = builder.build_models(&versions(&["1.0"])).expect("after");

    assert_eq!(before[0].fields, vec!["Name"]);
    assert_eq!(after[0].fields, vec!["Email"]);
}

#[test]
fn version_specific_contributors_see_their_version() {
    let (mut builder, _counter) = counted_builder();
    builder
        .model_configurations_mut()
        .push(configuration_fn(|builder: &mut StubModelBuilder, version: &ApiVersion| {
            if *version >= ApiVersion::new(2, 0) {
                builder.add_field("Email");
            }
            Ok(())
        }));

    let models = builder
        .build_models(&versions(&["1.0", "2.0"]))
        .expect("models");
    assert!(!models[0].has_field("Email"));
    assert!(models[1].has_field("Email"));
}

#[test]
fn empty_version_list_builds_nothing() {
    let (builder, counter) = counted_builder();
    let models = builder.build_models(&[]).expect("models");
    assert!(models.is_empty());
    assert_eq!(counter.created(), 0);
}

#[test]
fn factory_accessors_always_return_a_factory() {
    let mut builder = VersionedModelBuilder::<StubModelBuilder>::new();
    let first = builder.model_builder_factory().create().expect("builder");
    let second = builder.model_builder_factory().create().expect("builder");
    assert_ne!(first.id(), second.id());

    let counter = CountingFactory::new();
    builder.set_model_builder_factory(counter.factory());
    builder.model_builder_factory().create().expect("builder");
    assert_eq!(counter.created(), 1);

    let err = builder.try_set_model_builder_factory(None).unwrap_err();
    assert!(matches!(err, ModelError::InvalidArgument(_)));
    // the previous factory is still in place
    builder.model_builder_factory().create().expect("builder");
    assert_eq!(counter.created(), 2);

    builder
        .try_set_model_builder_factory(Some(CountingFactory::new().factory()))
        .expect("set");
    builder.model_builder_factory().create().expect("builder");
    assert_eq!(counter.created(), 2);
}

#[test]
fn optional_settings_round_trip() {
    let mut builder = VersionedModelBuilder::<StubModelBuilder>::new();
    assert!(builder.default_model_configuration().is_none());
    assert!(builder.on_model_created().is_none());
    assert!(builder.model_configurations().is_empty());

    builder.set_default_model_configuration(Some(Arc::new(
        |_: &mut StubModelBuilder, _: &ApiVersion| -> Result<(), ModelError> { Ok(()) },
    )));
    builder.set_on_model_created(Some(Arc::new(
        |_: &StubModelBuilder, _: &StubModel| -> Result<(), ModelError> { Ok(()) },
    )));
    assert!(builder.default_model_configuration().is_some());
    assert!(builder.on_model_created().is_some());

    builder.set_default_model_configuration(None);
    builder.set_on_model_created(None);
    assert!(builder.default_model_configuration().is_none());
    assert!(builder.on_model_created().is_none());
}

#[test]
fn shared_configurations_apply_through_trait_objects() {
    let log = CallLog::new();
    let configuration: SharedModelConfiguration<StubModelBuilder> = recording("direct", &log);
    let mut stub = StubModelBuilder::new();
    configuration.apply(&mut stub, &v("4.0")).expect("apply");
    assert_eq!(log.calls()[0].builder_id, stub.id());
}
