use serde::{Deserialize, Serialize};

/// Email priority levels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailPriority {
    /// Urgent emails (password reset)
    High,
    /// Normal transactional emails
    #[default]
    Normal,
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    /// Unique identifier for the email
    pub id: String,
    /// Recipient email address
    pub to: String,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: Option<String>,
    /// HTML body
    pub body_html: Option<String>,
    /// Email priority
    #[serde(default)]
    pub priority: EmailPriority,
    /// Retry count
    #[serde(default)]
    pub retry_count: u32,
    /// Maximum retries allowed
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_retries() -> u32 {
    3
}

impl Email {
    /// Create a new email with required fields
    pub fn new(to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            to: to.into(),
            subject: subject.into(),
            body_text: None,
            body_html: None,
            priority: EmailPriority::Normal,
            retry_count: 0,
            max_retries: 3,
        }
    }

    /// Set plain text body
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.body_text = Some(text.into());
        self
    }

    /// Set HTML body
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.body_html = Some(html.into());
        self
    }

    /// Set priority
    pub fn with_priority(mut self, priority: EmailPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Check if the email can be retried
    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }

    /// Increment retry count
    pub fn increment_retry(&mut self) {
        self.retry_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_builder() {
        let email = Email::new("user@example.com", "Hello")
            .with_text("plain")
            .with_html("<p>html</p>")
            .with_priority(EmailPriority::High);

        assert_eq!(email.to, "user@example.com");
        assert_eq!(email.body_text.as_deref(), Some("plain"));
        assert_eq!(email.body_html.as_deref(), Some("<p>html</p>"));
        assert_eq!(email.priority, EmailPriority::High);
    }

    #[test]
    fn test_email_retry_budget() {
        let mut email = Email::new("user@example.com", "Hello");
        assert!(email.can_retry());

        for _ in 0..3 {
            email.increment_retry();
        }
        assert!(!email.can_retry());
    }
}
