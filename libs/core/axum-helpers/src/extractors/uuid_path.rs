//! UUID path parameter extractor with automatic validation.

use crate::errors::ErrorResponse;
use axum::{
    extract::{FromRequestParts, Path},
    http::StatusCode,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Extractor for a single UUID path parameter.
///
/// Returns 400 with a structured body when the segment is not a valid UUID.
///
/// # Example
/// ```ignore
/// async fn get_contact(UuidPath(id): UuidPath) -> String {
///     format!("Contact ID: {}", id)
/// }
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        match Uuid::parse_str(&id) {
            Ok(uuid) => Ok(UuidPath(uuid)),
            Err(_) => {
                let body = ErrorResponse::new("BadRequest", format!("Invalid UUID: {}", id));
                Err((StatusCode::BAD_REQUEST, axum::Json(body)).into_response())
            }
        }
    }
}
