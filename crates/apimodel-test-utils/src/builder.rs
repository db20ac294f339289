use apimodel_core::{Annotated, Annotations, ModelBuilder, ModelBuilderFactory, ModelError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

static NEXT_BUILDER_ID: AtomicUsize = AtomicUsize::new(1);

/// Builder holding a flat, ordered field list and a process-unique id.
#[derive(Debug)]
pub struct StubModelBuilder {
    id: usize,
    fields: Vec<String>,
    fail_on_build: bool,
}

impl StubModelBuilder {
    pub fn new() -> Self {
        Self {
            id: NEXT_BUILDER_ID.fetch_add(1, Ordering::SeqCst),
            fields: Vec::new(),
            fail_on_build: false,
        }
    }

    /// Make `get_model` fail with a builder error.
    pub fn failing() -> Self {
        Self {
            fail_on_build: true,
            ..Self::new()
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn add_field(&mut self, name: impl Into<String>) {
        self.fields.push(name.into());
    }

    pub fn remove_field(&mut self, name: &str) {
        self.fields.retain(|field| field != name);
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl Default for StubModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder for StubModelBuilder {
    type Model = StubModel;

    fn get_model(&self) -> Result<StubModel, ModelError> {
        if self.fail_on_build {
            return Err(ModelError::Builder(format!(
                "stub builder {} refused to build",
                self.id
            )));
        }
        Ok(StubModel {
            builder_id: self.id,
            fields: self.fields.clone(),
            annotations: Annotations::new(),
        })
    }
}

/// Model produced by [`StubModelBuilder`].
#[derive(Debug)]
pub struct StubModel {
    pub builder_id: usize,
    pub fields: Vec<String>,
    annotations: Annotations,
}

impl StubModel {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field == name)
    }
}

impl Annotated for StubModel {
    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Factory that counts invocations and can be switched to fail.
#[derive(Debug, Clone, Default)]
pub struct CountingFactory {
    created: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    fail_on_build: Arc<AtomicBool>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent `create` returns an error.
    pub fn fail_on_create(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Builders created from now on fail in `get_model`.
    pub fn fail_on_build(&self) {
        self.fail_on_build.store(true, Ordering::SeqCst);
    }

    /// Number of times the factory has been invoked.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn factory(&self) -> ModelBuilderFactory<StubModelBuilder> {
        let created = Arc::clone(&self.created);
        let fail = Arc::clone(&self.fail);
        let fail_on_build = Arc::clone(&self.fail_on_build);
        ModelBuilderFactory::new(move || {
            created.fetch_add(1, Ordering::SeqCst);
            if fail.load(Ordering::SeqCst) {
                return Err(ModelError::Builder("factory disabled".to_string()));
            }
            if fail_on_build.load(Ordering::SeqCst) {
                Ok(StubModelBuilder::failing())
            } else {
                Ok(StubModelBuilder::new())
            }
        })
    }
}
