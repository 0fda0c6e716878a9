//! Connectors and utilities for PostgreSQL and Redis
//!
//! Connection management, startup retry, migration running, and health
//! checks live here so the apps only deal with configuration values.

pub mod common;
pub mod postgres;
pub mod redis;

pub use common::{DatabaseError, DatabaseResult};
