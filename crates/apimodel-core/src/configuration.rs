//! Model configuration contributors.

use crate::error::ModelError;
use crate::version::ApiVersion;
use std::fmt;
use std::sync::Arc;

/// A unit of configuration applied to a builder for one API version.
pub trait ModelConfiguration<B>: Send + Sync {
    fn apply(&self, builder: &mut B, api_version: &ApiVersion) -> Result<(), ModelError>;
}

/// Shared handle to a registered contributor.
pub type SharedModelConfiguration<B> = Arc<dyn ModelConfiguration<B>>;

/// Callback applied to every version before any registered contributor.
pub type DefaultModelConfiguration<B> =
    Arc<dyn Fn(&mut B, &ApiVersion) -> Result<(), ModelError> + Send + Sync>;

/// Presents a configuration callback as a [`ModelConfiguration`].
pub struct DelegatingModelConfiguration<B> {
    action: DefaultModelConfiguration<B>,
}

impl<B> DelegatingModelConfiguration<B> {
    pub fn new(action: DefaultModelConfiguration<B>) -> Self {
        Self { action }
    }
}

impl<B> ModelConfiguration<B> for DelegatingModelConfiguration<B> {
    fn apply(&self, builder: &mut B, api_version: &ApiVersion) -> Result<(), ModelError> {
        (self.action)(builder, api_version)
    }
}

impl<B> fmt::Debug for DelegatingModelConfiguration<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DelegatingModelConfiguration")
    }
}

/// Wrap a closure so it can be registered as a contributor.
pub fn configuration_fn<B, F>(action: F) -> SharedModelConfiguration<B>
where
    B: 'static,
    F: Fn(&mut B, &ApiVersion) -> Result<(), ModelError> + Send + Sync + 'static,
{
    Arc::new(DelegatingModelConfiguration::new(Arc::new(action)))
}

/// Applies the wrapped contributor only for versions in `[since, until)`.
///
/// Either bound may be left open. Versions outside the range are skipped
/// without touching the builder.
pub struct VersionRangeConfiguration<B> {
    inner: SharedModelConfiguration<B>,
    since: Option<ApiVersion>,
    until: Option<ApiVersion>,
}

impl<B> VersionRangeConfiguration<B> {
    pub fn new(inner: SharedModelConfiguration<B>) -> Self {
        Self {
            inner,
            since: None,
            until: None,
        }
    }

    /// First version (inclusive) the contributor applies to.
    pub fn since(mut self, api_version: ApiVersion) -> Self {
        self.since = Some(api_version);
        self
    }

    /// First version (exclusive) the contributor no longer applies to.
    pub fn until(mut self, api_version: ApiVersion) -> Self {
        self.until = Some(api_version);
        self
    }

    pub fn contains(&self, api_version: &ApiVersion) -> bool {
        self.since.as_ref().is_none_or(|since| since <= api_version)
            && self.until.as_ref().is_none_or(|until| api_version < until)
    }
}

impl<B> ModelConfiguration<B> for VersionRangeConfiguration<B> {
    fn apply(&self, builder: &mut B, api_version: &ApiVersion) -> Result<(), ModelError> {
        if self.contains(api_version) {
            self.inner.apply(builder, api_version)
        } else {
            Ok(())
        }
    }
}

impl<B> fmt::Debug for VersionRangeConfiguration<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionRangeConfiguration")
            .field("since", &self.since)
            .field("until", &self.until)
            .finish()
    }
}
