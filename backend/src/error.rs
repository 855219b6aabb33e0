//! # Error Handling
//!
//! A single error type, [`FarmError`], flows from the storage layer through the
//! domain services to the REST layer, where it becomes a `{success: false,
//! message}` JSON body with a 400 or 500 status.
//!
//! Driver errors are classified once, in the `From<sqlx::Error>` impl, into the
//! named constraint conditions a caller can act on (duplicate id, unknown
//! reference, value too long, malformed number) or into a connectivity failure
//! that the caller cannot fix.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ApiResponse;
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;
use tracing::error;

pub const DUPLICATE_KEY_MESSAGE: &str =
    "A record with this ID already exists. Please use a different ID.";
pub const MISSING_REFERENCE_MESSAGE: &str =
    "A referenced record does not exist. Please check the IDs and try again.";
pub const VALUE_TOO_LONG_MESSAGE: &str =
    "A value is too long or out of range. Please shorten it and try again.";
pub const MALFORMED_NUMBER_MESSAGE: &str =
    "A numeric value is malformed. Please check and try again.";
const CONNECTIVITY_MESSAGE: &str = "Unable to reach the database. Please try again later.";
const UNEXPECTED_MESSAGE: &str = "Operation failed due to an unexpected error.";

// SQLite extended result codes
const SQLITE_MISMATCH: &str = "20";
const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_NOTNULL: &str = "1299";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
const SQLITE_CONSTRAINT_DATATYPE: &str = "3091";

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    DuplicateKey(String),

    #[error("{0}")]
    MissingReference(String),

    #[error("{0}")]
    ValueTooLong(String),

    #[error("{0}")]
    MalformedNumber(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database connection failed: {0}")]
    Connectivity(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

pub type FarmResult<T> = Result<T, FarmError>;

impl FarmError {
    pub fn validation(message: impl Into<String>) -> Self {
        FarmError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        FarmError::NotFound(message.into())
    }

    /// Replace the generic message of a foreign key failure
    pub fn on_missing_reference(self, message: &str) -> Self {
        match self {
            FarmError::MissingReference(_) => FarmError::MissingReference(message.to_string()),
            other => other,
        }
    }

    /// Replace the generic message of a duplicate key failure
    pub fn on_duplicate(self, message: &str) -> Self {
        match self {
            FarmError::DuplicateKey(_) => FarmError::DuplicateKey(message.to_string()),
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            FarmError::Connectivity(_) | FarmError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the caller
    pub fn user_message(&self) -> String {
        match self {
            FarmError::Connectivity(_) => CONNECTIVITY_MESSAGE.to_string(),
            FarmError::Database(_) => UNEXPECTED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    fn from_database_error(err: sqlx::Error) -> Self {
        let classified = match &err {
            sqlx::Error::Database(db_err) => classify(db_err.as_ref()),
            _ => None,
        };
        classified.unwrap_or(FarmError::Database(err))
    }
}

fn classify(db_err: &dyn DatabaseError) -> Option<FarmError> {
    let err = match db_err.kind() {
        ErrorKind::UniqueViolation => FarmError::DuplicateKey(DUPLICATE_KEY_MESSAGE.to_string()),
        ErrorKind::ForeignKeyViolation => {
            FarmError::MissingReference(MISSING_REFERENCE_MESSAGE.to_string())
        }
        ErrorKind::CheckViolation => FarmError::ValueTooLong(VALUE_TOO_LONG_MESSAGE.to_string()),
        ErrorKind::NotNullViolation => FarmError::validation("A required value is missing."),
        _ => return classify_by_code(db_err),
    };
    Some(err)
}

fn classify_by_code(db_err: &dyn DatabaseError) -> Option<FarmError> {
    let code = db_err.code()?;
    let err = match &*code {
        SQLITE_CONSTRAINT_PRIMARYKEY | SQLITE_CONSTRAINT_UNIQUE => {
            FarmError::DuplicateKey(DUPLICATE_KEY_MESSAGE.to_string())
        }
        SQLITE_CONSTRAINT_FOREIGNKEY => {
            FarmError::MissingReference(MISSING_REFERENCE_MESSAGE.to_string())
        }
        SQLITE_CONSTRAINT_CHECK => FarmError::ValueTooLong(VALUE_TOO_LONG_MESSAGE.to_string()),
        SQLITE_CONSTRAINT_NOTNULL => FarmError::validation("A required value is missing."),
        SQLITE_MISMATCH | SQLITE_CONSTRAINT_DATATYPE => {
            FarmError::MalformedNumber(MALFORMED_NUMBER_MESSAGE.to_string())
        }
        _ => return None,
    };
    Some(err)
}

impl From<sqlx::Error> for FarmError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => FarmError::Connectivity(err),
            other => FarmError::from_database_error(other),
        }
    }
}

impl From<JsonRejection> for FarmError {
    fn from(rejection: JsonRejection) -> Self {
        FarmError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for FarmError {
    fn from(rejection: QueryRejection) -> Self {
        FarmError::Validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for FarmError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        }

        (status, Json(ApiResponse::failure(self.user_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_connectivity_failure() {
        let err = FarmError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, FarmError::Connectivity(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
    }

    #[test]
    fn test_unclassified_error_hides_details() {
        let err = FarmError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, FarmError::Database(_)));
        assert_eq!(err.user_message(), UNEXPECTED_MESSAGE);
    }

    #[test]
    fn test_reference_message_refinement_only_touches_matching_variant() {
        let refined = FarmError::MissingReference(MISSING_REFERENCE_MESSAGE.to_string())
            .on_missing_reference("farmerID not recognized.");
        assert_eq!(refined.to_string(), "farmerID not recognized.");

        let untouched = FarmError::validation("bad id").on_missing_reference("ignored");
        assert_eq!(untouched.to_string(), "bad id");
        assert_eq!(untouched.status_code(), StatusCode::BAD_REQUEST);
    }
}
