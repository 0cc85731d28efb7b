//! Text generation provider trait.

use crate::types::generation::Request;
use crate::Error;
use async_trait::async_trait;

/// Abstraction for single-turn LLM text completion.
///
/// Implementations send one prompt and return the model's free-form text. They
/// must report throttling as `Error::RateLimited` (or with a "429"/"rate limit"
/// message) so `generate_with_retry` can back off.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate text for `request`. The returned text is whatever the model wrote,
    /// which may wrap structured output in prose.
    async fn generate(&self, request: Request) -> std::result::Result<String, Error>;

    /// Return unique identifier for this provider (e.g., "gemini").
    fn provider_id(&self) -> &'static str;
}
