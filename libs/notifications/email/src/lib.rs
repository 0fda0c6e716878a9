//! Email notification library
//!
//! Transactional email delivery with a pluggable provider and an in-process
//! queue, so request handlers never wait on SMTP.
//!
//! ## Components
//!
//! - **Models**: [`Email`], [`EmailPriority`]
//! - **Providers**: [`SmtpProvider`] via lettre, [`MockSmtpProvider`] for tests
//! - **Queue**: [`EmailQueue`] with a background worker and bounded retries
//!
//! ## Usage
//!
//! ```ignore
//! use email::{Email, EmailQueue, SmtpProvider};
//! use std::sync::Arc;
//!
//! let provider = Arc::new(SmtpProvider::from_env()?);
//! let (queue, _worker) = EmailQueue::start(provider, 256);
//!
//! queue.enqueue(Email::new("user@example.com", "Welcome").with_text("Hello!"));
//! ```

pub mod error;
pub mod models;
pub mod provider;
pub mod queue;

pub use error::{NotificationError, NotificationResult};
pub use models::{Email, EmailPriority};
pub use provider::{EmailProvider, MockSmtpProvider, SendResult, SmtpConfig, SmtpProvider};
pub use queue::EmailQueue;
