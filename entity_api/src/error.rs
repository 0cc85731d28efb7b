//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::DbErr;

/// Errors while reading or writing conversation documents.
/// Errors fall into two broad groups:
///  * Errors related to data. Ex EntityApiErrorKind::RecordNotFound
///  * Errors related to the database itself. Ex DbErr::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Invalid search term or identifier
    InvalidQueryTerm,
    // Record not found
    RecordNotFound,
    // Record not updated
    RecordNotUpdated,
    // Connection, pool or statement execution failures
    SystemError,
    // Other errors
    Other,
}

impl Error {
    pub(crate) fn not_found() -> Self {
        Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
    }

    pub(crate) fn invalid_query_term() -> Self {
        Error {
            source: None,
            error_kind: EntityApiErrorKind::InvalidQueryTerm,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Entity API Error ({:?}): {source}", self.error_kind),
            None => write!(f, "Entity API Error: {:?}", self.error_kind),
        }
    }
}

impl StdError for Error {}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        let error_kind = match err {
            DbErr::RecordNotFound(_) => EntityApiErrorKind::RecordNotFound,
            DbErr::RecordNotUpdated => EntityApiErrorKind::RecordNotUpdated,
            DbErr::Json(_) | DbErr::Type(_) => EntityApiErrorKind::Other,
            _ => EntityApiErrorKind::SystemError,
        };

        Error {
            source: Some(err),
            error_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_are_categorized() {
        let not_found: Error = DbErr::RecordNotFound("conversation".to_string()).into();
        assert_eq!(not_found.error_kind, EntityApiErrorKind::RecordNotFound);

        let conn: Error = DbErr::Custom("boom".to_string()).into();
        assert_eq!(conn.error_kind, EntityApiErrorKind::SystemError);

        let not_updated: Error = DbErr::RecordNotUpdated.into();
        assert_eq!(not_updated.error_kind, EntityApiErrorKind::RecordNotUpdated);
    }
}
