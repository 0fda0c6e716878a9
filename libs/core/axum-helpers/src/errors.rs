//! Structured error responses shared across the API surface.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Every error returned by the API uses this shape:
/// - `error`: machine-readable identifier (e.g., "NotFound")
/// - `message`: human-readable description
/// - `details`: optional structured details (e.g., validation field errors)
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse::new(
        "NotFound",
        "The requested resource was not found",
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization_skips_empty_details() {
        let response = ErrorResponse::new("NotFound", "missing");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "NotFound");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let response = ErrorResponse::new("BadRequest", "validation failed")
            .with_details(serde_json::json!({"field": "email"}));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["details"]["field"], "email");
    }
}
