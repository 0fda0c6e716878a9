//! # Contacts Domain
//!
//! Per-user contact book: CRUD, substring search, and an upcoming-birthdays
//! window query. Every operation is scoped to the owning user.
//!
//! ## Structure
//!
//! - `models` - Contact entity and request/response DTOs
//! - `error` - Domain errors with HTTP mappings
//! - `repository` - `ContactRepository` trait with in-memory and Postgres impls
//! - `service` - Owner-scoped business logic
//! - `handlers` - HTTP endpoints
//! - `rate_limit` - Per-client-IP gate for contact creation

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod rate_limit;
pub mod repository;
pub mod service;

pub use error::{ContactError, ContactResult};
pub use handlers::{ContactsState, contacts_router};
pub use rate_limit::{RateLimitLayer, per_ip_rate_limiter};
pub use models::{
    BirthdayQuery, Contact, ContactFilter, ContactResponse, CreateContactRequest,
    UpdateContactRequest,
};
pub use postgres::PgContactRepository;
pub use repository::{ContactRepository, InMemoryContactRepository};
pub use service::ContactService;
