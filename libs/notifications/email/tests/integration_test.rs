//! Integration tests for the email library

use email::provider::{EmailProvider, MockSmtpProvider};
use email::{Email, EmailPriority, EmailQueue};
use std::sync::Arc;
use std::time::Duration;

mod queue_tests {
    use super::*;

    #[tokio::test]
    async fn test_enqueue_delivers_through_worker() {
        let provider = Arc::new(MockSmtpProvider::new());
        let (queue, worker) = EmailQueue::start(provider.clone(), 8);

        queue
            .enqueue(Email::new("user1@example.com", "Subject 1").with_text("Body 1"))
            .unwrap();
        queue
            .enqueue(
                Email::new("user2@example.com", "Subject 2")
                    .with_html("<p>Body 2</p>")
                    .with_priority(EmailPriority::High),
            )
            .unwrap();

        // Dropping the handle closes the channel; the worker drains and exits
        drop(queue);
        worker.await.unwrap();

        assert_eq!(provider.sent_count().await, 2);
        assert!(provider.was_sent_to("user1@example.com").await);
        assert!(provider.was_sent_to("user2@example.com").await);
    }

    #[tokio::test]
    async fn test_failing_provider_never_blocks_enqueue() {
        let provider = Arc::new(MockSmtpProvider::failing("SMTP down"));
        let (queue, worker) = EmailQueue::start(provider.clone(), 8);

        queue
            .enqueue(Email::new("user@example.com", "Hello").with_text("Body"))
            .unwrap();

        drop(queue);
        // Worker retries then drops the message instead of hanging
        tokio::time::timeout(Duration::from_secs(30), worker)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(provider.sent_count().await, 0);
    }
}

mod mock_provider_tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_captures_emails() {
        let provider = MockSmtpProvider::new();

        let email1 = Email::new("user1@example.com", "Subject 1").with_text("Body 1");
        let email2 = Email::new("user2@example.com", "Subject 2").with_html("<p>Body 2</p>");

        provider.send(&email1).await.unwrap();
        provider.send(&email2).await.unwrap();

        assert_eq!(provider.sent_count().await, 2);

        let sent = provider.sent_emails().await;
        assert_eq!(sent[0].to, "user1@example.com");
        assert_eq!(sent[1].to, "user2@example.com");
    }

    #[tokio::test]
    async fn test_mock_provider_health_check() {
        let provider = MockSmtpProvider::new();
        assert!(provider.health_check().await.is_ok());

        let failing_provider = MockSmtpProvider::failing("Down for maintenance");
        assert!(failing_provider.health_check().await.is_err());
    }
}

mod email_model_tests {
    use super::*;

    #[test]
    fn test_email_builder() {
        let email = Email::new("recipient@example.com", "Test Subject")
            .with_text("Plain text body")
            .with_html("<p>HTML body</p>")
            .with_priority(EmailPriority::High);

        assert_eq!(email.to, "recipient@example.com");
        assert_eq!(email.subject, "Test Subject");
        assert_eq!(email.body_text, Some("Plain text body".to_string()));
        assert_eq!(email.body_html, Some("<p>HTML body</p>".to_string()));
        assert_eq!(email.priority, EmailPriority::High);
    }

    #[test]
    fn test_email_retry() {
        let mut email = Email::new("test@example.com", "Test");

        assert!(email.can_retry());
        assert_eq!(email.retry_count, 0);

        email.increment_retry();
        assert!(email.can_retry());
        assert_eq!(email.retry_count, 1);

        email.increment_retry();
        email.increment_retry();
        assert!(!email.can_retry()); // Default max_retries is 3
    }

    #[test]
    fn test_email_serialization() {
        let email = Email::new("test@example.com", "Test Subject")
            .with_text("Body")
            .with_priority(EmailPriority::Normal);

        let json = serde_json::to_string(&email).unwrap();
        let deserialized: Email = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.to, email.to);
        assert_eq!(deserialized.subject, email.subject);
        assert_eq!(deserialized.priority, email.priority);
    }
}
