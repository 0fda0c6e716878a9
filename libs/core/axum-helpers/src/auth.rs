//! Authenticated-user request extension.
//!
//! Authentication middleware resolves the caller and inserts a
//! [`CurrentUser`] into the request extensions. Handlers pick it up with
//! the extractor below, so domain crates do not need to know how tokens
//! are verified.

use axum::{
    Json,
    extract::FromRequestParts,
    http::StatusCode,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::errors::ErrorResponse;

/// Identity of the authenticated caller, resolved by auth middleware.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            let body = ErrorResponse::new("Unauthorized", "Authentication required");
            (StatusCode::UNAUTHORIZED, Json(body)).into_response()
        })
    }
}
