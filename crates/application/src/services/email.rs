//! Email delivery contract and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::info;

/// Sends emails. Fire-and-forget from the caller's point of view; delivery
/// confirmations are never consumed.
#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), String>;
}

#[derive(Debug, Default)]
struct MockEmailState {
    sent: Vec<SentEmail>,
    fail_on_send: bool,
}

/// A captured outbound email.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// In-memory email service that records every send.
#[derive(Debug, Clone, Default)]
pub struct MockEmailService {
    state: Arc<RwLock<MockEmailState>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the service to fail on subsequent sends.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns every email sent so far.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.state.read().unwrap().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_send {
            return Err("email delivery failed".to_string());
        }

        info!(to, subject, "sending email");
        state.sent.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_emails() {
        let service = MockEmailService::new();
        service.send("a@b.com", "Hello", "Body").await.unwrap();

        let sent = service.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
        assert_eq!(sent[0].subject, "Hello");
    }

    #[tokio::test]
    async fn fails_when_configured() {
        let service = MockEmailService::new();
        service.set_fail_on_send(true);
        assert!(service.send("a@b.com", "Hello", "Body").await.is_err());
        assert_eq!(service.sent_count(), 0);
    }
}
