//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;
use tutor_ai::Error as AiError;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries. Ex. `domain` is dependent on `entity_api` and `tutor_ai`, and `web`
/// is dependent on `domain`, but `web` should not be dependent, directly, on either of them.
/// Ultimately the various `error_kind`s are used by `web` to return appropriate HTTP status
/// codes and messages to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    /// A required setting (API key, token) is missing.
    Config,
    Other(String),
}

/// Entity errors bubbling up from `entity_api`, reduced to the kinds the domain cares about.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    DbTransaction,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    /// The upstream service is throttling us and retries didn't help.
    RateLimited,
    /// The upstream service rejected the request; carries its message.
    Other(String),
}

impl Error {
    pub(crate) fn config() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }

    pub(crate) fn invalid() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Invalid,
            )),
        }
    }

    pub(crate) fn external(message: impl Into<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Other(message.into())),
        }
    }

    /// Short human readable reason, suitable for a JSON `error` field.
    pub fn message(&self) -> String {
        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)) => {
                "Session not found".to_string()
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid)) => {
                "Invalid request".to_string()
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(_)) => {
                "Storage error".to_string()
            }
            DomainErrorKind::Internal(InternalErrorKind::Config) => {
                "Service is not configured".to_string()
            }
            DomainErrorKind::Internal(InternalErrorKind::Other(message)) => message.clone(),
            DomainErrorKind::External(ExternalErrorKind::Network) => {
                "Upstream service unreachable".to_string()
            }
            DomainErrorKind::External(ExternalErrorKind::RateLimited) => {
                "Upstream service is rate limiting requests".to_string()
            }
            DomainErrorKind::External(ExternalErrorKind::Other(message)) => message.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::InvalidQueryTerm => EntityErrorKind::Invalid,
            EntityApiErrorKind::SystemError => EntityErrorKind::DbTransaction,
            _ => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<AiError> for Error {
    fn from(err: AiError) -> Self {
        let error_kind = match &err {
            AiError::Configuration(_) | AiError::Authentication(_) => {
                DomainErrorKind::Internal(InternalErrorKind::Config)
            }
            AiError::Network(_) | AiError::Timeout(_) => {
                DomainErrorKind::External(ExternalErrorKind::Network)
            }
            AiError::RateLimited { .. } | AiError::RetriesExhausted { .. } => {
                DomainErrorKind::External(ExternalErrorKind::RateLimited)
            }
            other => DomainErrorKind::External(ExternalErrorKind::Other(other.to_string())),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_not_found_translates_to_domain_not_found() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
        .into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
        assert_eq!(err.message(), "Session not found");
    }

    #[test]
    fn exhausted_retries_translate_to_rate_limited() {
        let err: Error = AiError::RetriesExhausted { attempts: 2 }.into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::RateLimited)
        );
    }

    #[test]
    fn provider_errors_keep_their_message() {
        let err: Error = AiError::Provider("model overloaded".to_string()).into();

        assert!(err.message().contains("model overloaded"));
    }
}
