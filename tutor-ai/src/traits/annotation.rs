//! Image annotation provider trait.

use crate::types::annotation::Annotation;
use crate::Error;
use async_trait::async_trait;

/// Abstraction for label, object and text detection on a single image.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Annotate a base64 encoded image (no data URL prefix).
    async fn annotate(&self, image_base64: &str) -> std::result::Result<Annotation, Error>;

    /// Return unique identifier for this provider (e.g., "cloud_vision").
    fn provider_id(&self) -> &'static str;
}
