use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::ErrorResponse;
use thiserror::Error;
use uuid::Uuid;

pub type ContactResult<T> = Result<T, ContactError>;

/// Errors for the contacts domain
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Contact not found: {0}")]
    NotFound(Uuid),

    #[error("A contact with this email already exists: {0}")]
    DuplicateEmail(String),

    #[error("A contact with this phone already exists: {0}")]
    DuplicatePhone(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ContactError {
    fn from(err: sea_orm::DbErr) -> Self {
        ContactError::Internal(err.to_string())
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ContactError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ContactError::DuplicateEmail(_) | ContactError::DuplicatePhone(_) => {
                (StatusCode::CONFLICT, "Conflict")
            }
            ContactError::Validation(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ContactError::Internal(_) => {
                tracing::error!("Internal contact error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalServerError")
            }
        };

        // Internal details stay in the logs, not in the response body
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(error, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ContactError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                ContactError::DuplicateEmail("a@b.c".into()),
                StatusCode::CONFLICT,
            ),
            (
                ContactError::DuplicatePhone("+123".into()),
                StatusCode::CONFLICT,
            ),
            (
                ContactError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ContactError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
