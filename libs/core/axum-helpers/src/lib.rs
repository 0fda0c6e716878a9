//! # Axum Helpers
//!
//! Utilities shared by the HTTP services in this workspace.
//!
//! - **[`auth`]**: the authenticated-user request extension
//! - **[`errors`]**: structured error responses and fallback handlers
//! - **[`extractors`]**: custom extractors (UUID path, validated JSON)
//! - **[`health`]**: health and readiness endpoint helpers
//! - **[`server`]**: router assembly with OpenAPI docs, server startup
//! - **[`shutdown`]**: graceful shutdown signal handling

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod server;
pub mod shutdown;

pub use auth::CurrentUser;
pub use errors::ErrorResponse;
pub use extractors::{UuidPath, ValidatedJson};
pub use health::{HealthCheckFuture, HealthResponse, health_handler, run_health_checks};
pub use server::{create_app, create_router};
pub use shutdown::shutdown_signal;
