//! Bounded exponential backoff around a single generation call.

use std::time::Duration;

use log::*;

use crate::traits::generation::Provider;
use crate::types::generation::Request;
use crate::Error;

/// Attempts made when the caller doesn't configure a limit.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Backoff never grows beyond 2^MAX_BACKOFF_EXPONENT seconds.
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Runs `request` against `provider`, waiting out rate limits.
///
/// A rate-limited attempt with attempts left sleeps `2^n` seconds, where `n` is the
/// zero-based index of the failed attempt (1s, 2s, 4s, ...), then tries again. Any
/// other error is returned as-is straight away. When the last allowed attempt is
/// also rate limited the call fails with `Error::RetriesExhausted`.
///
/// The sleep only suspends the calling task.
pub async fn generate_with_retry(
    provider: &dyn Provider,
    request: &Request,
    max_attempts: u32,
) -> Result<String, Error> {
    let max_attempts = max_attempts.max(1);

    for attempt in 0..max_attempts {
        match provider.generate(request.clone()).await {
            Ok(text) => return Ok(text),
            Err(err) if !err.is_rate_limited() => return Err(err),
            Err(err) => {
                if attempt + 1 == max_attempts {
                    warn!(
                        "{} still rate limited after {max_attempts} attempts: {err}",
                        provider.provider_id()
                    );
                    break;
                }

                let delay = backoff_delay(attempt);
                info!(
                    "{} rate limited, retrying in {}s (attempt {}/{max_attempts})",
                    provider.provider_id(),
                    delay.as_secs(),
                    attempt + 1,
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    Err(Error::RetriesExhausted {
        attempts: max_attempts,
    })
}

/// Delay after the zero-based `attempt` failed.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(MAX_BACKOFF_EXPONENT))
}
