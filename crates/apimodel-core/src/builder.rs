//! Builder capability and builder factories.

use crate::annotations::Annotated;
use crate::error::ModelError;
use std::fmt;
use std::sync::Arc;

/// Stateful builder that accumulates configuration calls and is finalized
/// into an immutable model.
///
/// Configuration calls are the builder's own inherent methods; contributors
/// know the concrete builder type they configure. The assembly pass only
/// needs `get_model`.
pub trait ModelBuilder {
    /// Finished model produced by this builder.
    type Model: Annotated;

    /// Finalize the configured state into a model.
    fn get_model(&self) -> Result<Self::Model, ModelError>;
}

type CreateBuilder<B> = dyn Fn() -> Result<B, ModelError> + Send + Sync;

/// Creates fresh, independent builder instances.
pub struct ModelBuilderFactory<B> {
    create: Arc<CreateBuilder<B>>,
}

impl<B> ModelBuilderFactory<B> {
    pub fn new<F>(create: F) -> Self
    where
        F: Fn() -> Result<B, ModelError> + Send + Sync + 'static,
    {
        Self {
            create: Arc::new(create),
        }
    }

    /// Invoke the factory for a new builder.
    pub fn create(&self) -> Result<B, ModelError> {
        (self.create)()
    }
}

impl<B: Default + 'static> Default for ModelBuilderFactory<B> {
    /// Factory returning `B::default()`.
    fn default() -> Self {
        Self::new(|| Ok(B::default()))
    }
}

impl<B> Clone for ModelBuilderFactory<B> {
    fn clone(&self) -> Self {
        Self {
            create: Arc::clone(&self.create),
        }
    }
}

impl<B> fmt::Debug for ModelBuilderFactory<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBuilderFactory")
            .field("builder", &std::any::type_name::<B>())
            .finish()
    }
}
