//! In-process email queue.
//!
//! Handlers enqueue and return immediately; a detached worker task owns
//! delivery, including retries. Losing a message on process death is
//! acceptable for these notification emails.

use crate::error::{NotificationError, NotificationResult};
use crate::models::Email;
use crate::provider::EmailProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Handle for enqueueing emails onto the background worker.
#[derive(Clone)]
pub struct EmailQueue {
    tx: mpsc::Sender<Email>,
}

impl EmailQueue {
    /// Spawn the delivery worker and return a queue handle plus the worker's
    /// join handle.
    pub fn start(provider: Arc<dyn EmailProvider>, capacity: usize) -> (Self, JoinHandle<()>) {
        Self::start_with_retry_delay(provider, capacity, DEFAULT_RETRY_DELAY)
    }

    fn start_with_retry_delay(
        provider: Arc<dyn EmailProvider>,
        capacity: usize,
        retry_delay: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(run_worker(provider, rx, retry_delay));
        (Self { tx }, handle)
    }

    /// Enqueue an email without waiting for delivery.
    ///
    /// Fails if the queue is full or the worker has stopped. Callers that
    /// treat delivery as best-effort can log and ignore the error.
    pub fn enqueue(&self, email: Email) -> NotificationResult<()> {
        self.tx.try_send(email).map_err(|e| match e {
            mpsc::error::TrySendError::Full(email) => {
                NotificationError::QueueError(format!("queue full, dropping email to {}", email.to))
            }
            mpsc::error::TrySendError::Closed(email) => NotificationError::QueueError(format!(
                "worker stopped, dropping email to {}",
                email.to
            )),
        })
    }
}

async fn run_worker(
    provider: Arc<dyn EmailProvider>,
    mut rx: mpsc::Receiver<Email>,
    retry_delay: Duration,
) {
    info!(provider = provider.name(), "Email worker started");

    while let Some(mut email) = rx.recv().await {
        loop {
            match provider.send(&email).await {
                Ok(result) => {
                    info!(
                        email_id = %email.id,
                        message_id = %result.message_id,
                        "Email delivered"
                    );
                    break;
                }
                Err(e) if email.can_retry() => {
                    email.increment_retry();
                    warn!(
                        email_id = %email.id,
                        attempt = email.retry_count,
                        "Email delivery failed, retrying: {e}"
                    );
                    tokio::time::sleep(retry_delay * email.retry_count).await;
                }
                Err(e) => {
                    error!(
                        email_id = %email.id,
                        to = %email.to,
                        "Email delivery failed after {} retries, dropping: {e}",
                        email.max_retries
                    );
                    break;
                }
            }
        }
    }

    info!("Email worker stopped");
}
