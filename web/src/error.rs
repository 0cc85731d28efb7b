use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match &self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => StatusCode::NOT_FOUND,
                    EntityErrorKind::Invalid => StatusCode::BAD_REQUEST,
                    EntityErrorKind::DbTransaction | EntityErrorKind::Other(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                },
                InternalErrorKind::Config | InternalErrorKind::Other(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Network => StatusCode::BAD_GATEWAY,
                ExternalErrorKind::RateLimited => StatusCode::SERVICE_UNAVAILABLE,
                ExternalErrorKind::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed with {status}: {}", self.0);
        } else {
            debug!("Request rejected with {status}: {}", self.0);
        }

        (
            status,
            Json(json!({"success": false, "error": self.0.message()})),
        )
            .into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(error_kind: DomainErrorKind) -> Error {
        Error(DomainError {
            source: None,
            error_kind,
        })
    }

    #[test]
    fn entity_errors_map_to_client_statuses() {
        assert_eq!(
            error(DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::NotFound
            )))
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error(DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Invalid
            )))
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_errors_map_to_gateway_statuses() {
        assert_eq!(
            error(DomainErrorKind::External(ExternalErrorKind::Network)).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error(DomainErrorKind::External(ExternalErrorKind::RateLimited)).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            error(DomainErrorKind::Internal(InternalErrorKind::Config)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn bodies_carry_the_domain_message() {
        let response = error(DomainErrorKind::External(ExternalErrorKind::Other(
            "Phone number is invalid".to_string(),
        )))
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": "Phone number is invalid"})
        );
    }
}
