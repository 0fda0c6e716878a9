//! Error types for the notification library.

use thiserror::Error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors that can occur while queueing or sending email.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The in-process queue is full or its worker has stopped
    #[error("Queue error: {0}")]
    QueueError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider error (SMTP, mock)
    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl From<eyre::Report> for NotificationError {
    fn from(err: eyre::Report) -> Self {
        Self::ProviderError(err.to_string())
    }
}
