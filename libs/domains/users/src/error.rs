use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::ErrorResponse;
use thiserror::Error;
use uuid::Uuid;

pub type UserResult<T> = Result<T, UserError>;

/// Errors for the users domain
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("No account for email: {0}")]
    EmailNotFound(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email address is not verified")]
    EmailNotVerified,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Unsupported file type: {0}")]
    InvalidFileType(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Avatar storage error: {0}")]
    AvatarStorage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        UserError::Internal(err.to_string())
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            UserError::NotFound(_) | UserError::EmailNotFound(_) => {
                (StatusCode::NOT_FOUND, "NotFound")
            }
            UserError::DuplicateEmail(_) => (StatusCode::CONFLICT, "Conflict"),
            UserError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            UserError::EmailNotVerified => (StatusCode::FORBIDDEN, "Forbidden"),
            UserError::InvalidToken => (StatusCode::BAD_REQUEST, "BadRequest"),
            UserError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            UserError::InvalidFileType(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            UserError::Validation(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            UserError::PasswordHash(_) | UserError::AvatarStorage(_) | UserError::Internal(_) => {
                tracing::error!("Internal user error: {}", self);
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
            (UserError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                UserError::DuplicateEmail("a@b.c".into()),
                StatusCode::CONFLICT,
            ),
            (UserError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (UserError::EmailNotVerified, StatusCode::FORBIDDEN),
            (UserError::InvalidToken, StatusCode::BAD_REQUEST),
            (UserError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                UserError::InvalidFileType("image/gif".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                UserError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
