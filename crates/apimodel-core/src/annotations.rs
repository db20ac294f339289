//! Out-of-band annotations attached to finished models.

use crate::version::ApiVersion;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type AnnotationValue = Arc<dyn Any + Send + Sync>;

/// Typed side table owned by a model.
///
/// Holds at most one value per annotation type. Writes go through a shared
/// reference so an already finalized model can be tagged without touching
/// its schema.
#[derive(Default)]
pub struct Annotations {
    values: RwLock<HashMap<TypeId, AnnotationValue>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, returning the previous annotation of the same type.
    pub fn set<T>(&self, value: T) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.values
            .write()
            .insert(TypeId::of::<T>(), Arc::new(value))
            .and_then(|previous| previous.downcast::<T>().ok())
    }

    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.values
            .read()
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn contains<T>(&self) -> bool
    where
        T: Any + Send + Sync,
    {
        self.values.read().contains_key(&TypeId::of::<T>())
    }

    pub fn remove<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.values
            .write()
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl Clone for Annotations {
    /// Snapshot of the current entries; values are shared, not deep-copied.
    fn clone(&self) -> Self {
        Self {
            values: RwLock::new(self.values.read().clone()),
        }
    }
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotations")
            .field("len", &self.len())
            .finish()
    }
}

/// Anything that owns an annotation side table.
pub trait Annotated {
    fn annotations(&self) -> &Annotations;
}

/// Records which API version produced a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionAnnotation {
    api_version: ApiVersion,
}

impl ApiVersionAnnotation {
    pub fn new(api_version: ApiVersion) -> Self {
        Self { api_version }
    }

    pub fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }
}

/// Version tagging helpers for annotated models.
pub trait AnnotatedExt: Annotated {
    /// Tag the model with the version that produced it, replacing any
    /// earlier tag.
    fn set_api_version(&self, api_version: ApiVersion) {
        self.annotations()
            .set(ApiVersionAnnotation::new(api_version));
    }

    /// Version the model was built for, if it has been tagged.
    fn api_version(&self) -> Option<ApiVersion> {
        self.annotations()
            .get::<ApiVersionAnnotation>()
            .map(|annotation| annotation.api_version().clone())
    }
}

impl<T: Annotated + ?Sized> AnnotatedExt for T {}
