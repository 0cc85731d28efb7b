//! Error types for AI provider operations.

use std::fmt;

/// Provider-agnostic error for AI calls.
///
/// Every provider maps its native failures onto these variants so callers can
/// decide on retries and fallbacks without knowing which service answered.
#[derive(Debug)]
pub enum Error {
    /// API key rejected, expired, or missing a required permission.
    Authentication(String),

    /// Connectivity problems: DNS, refused connections, TLS, dropped bodies.
    Network(String),

    /// Missing credentials or invalid request parameters on our side.
    Configuration(String),

    /// The provider answered but refused or failed the request.
    Provider(String),

    /// The call exceeded its timeout.
    Timeout(String),

    /// Provider rate limit exceeded. Clients must wait before retrying.
    RateLimited { retry_after_seconds: u64 },

    /// The response body couldn't be read into the expected shape.
    Deserialization(String),

    /// Every attempt allowed by the retry loop hit a rate limit.
    RetriesExhausted { attempts: u32 },

    /// Catch-all for errors that don't fit other categories.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// True when the failure is a rate limit that's worth waiting out.
    ///
    /// Besides `RateLimited`, some providers only report throttling in the
    /// message text, so a "429" or "rate limit" marker anywhere in it counts too.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Error::RateLimited { .. } => true,
            Error::RetriesExhausted { .. } => false,
            other => {
                let message = other.to_string().to_lowercase();
                message.contains("429") || message.contains("rate limit")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Provider(msg) => write!(f, "Provider error: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::RateLimited {
                retry_after_seconds,
            } => {
                write!(f, "Rate limited: retry after {}s", retry_after_seconds)
            }
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::RetriesExhausted { attempts } => {
                write!(f, "Gave up after {} throttled attempts", attempts)
            }
            Error::Other(err) => write!(f, "Other error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
