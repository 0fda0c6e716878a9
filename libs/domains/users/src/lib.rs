//! # Users Domain
//!
//! Accounts, authentication, and the user-facing profile endpoints.
//!
//! ## Structure
//!
//! - `models` - User entity and request/response DTOs
//! - `error` - Domain errors with HTTP mappings
//! - `repository` - `UserRepository` trait with in-memory and Postgres impls
//! - `service` - Password hashing and account lifecycle logic
//! - `token` - Purpose-tagged JWT issuing and validation
//! - `cache` - Read-through session cache over Redis
//! - `avatar` - Avatar storage behind a trait, local filesystem impl
//! - `auth_handlers` - Registration, verification, login, token refresh,
//!   password-reset endpoints and the auth middleware
//! - `handlers` - `/users/me` and avatar upload endpoints

pub mod auth_handlers;
pub mod avatar;
pub mod cache;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod token;

pub use auth_handlers::{AuthState, auth_router, require_auth};
pub use avatar::{AvatarStorage, LocalAvatarStorage};
pub use cache::{InMemorySessionCache, RedisSessionCache, SessionCache};
pub use error::{UserError, UserResult};
pub use handlers::{UsersState, users_router};
pub use models::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, TokenResponse,
    User, UserResponse,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
pub use token::{TokenPurpose, TokenService};
