//! Mock implementations for testing.

use async_trait::async_trait;
use contact_core::Envelope;
use mailer::{MailTransport, SendReceipt, TransportError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Mock transport that captures envelopes in memory.
///
/// Implements the same `MailTransport` trait as `ResendTransport`, so tests
/// see exactly what would have been handed to the provider.
#[derive(Clone)]
pub struct MockTransport {
    /// All envelopes sent through this transport.
    envelopes: Arc<Mutex<Vec<Envelope>>>,
    /// Every send attempt, including failed ones.
    attempts: Arc<Mutex<usize>>,
    /// Simulate a provider failure if set.
    should_fail: Arc<Mutex<bool>>,
    /// Simulate an absent API key if set.
    missing_credential: Arc<Mutex<bool>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            envelopes: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            missing_credential: Arc::new(Mutex::new(false)),
        }
    }

    /// Get all captured envelopes.
    pub fn captured(&self) -> Vec<Envelope> {
        self.envelopes.lock().clone()
    }

    /// Get the count of delivered envelopes.
    pub fn sent_count(&self) -> usize {
        self.envelopes.lock().len()
    }

    /// Get the count of send attempts.
    pub fn attempt_count(&self) -> usize {
        *self.attempts.lock()
    }

    /// Clear captured envelopes.
    pub fn clear(&self) {
        self.envelopes.lock().clear();
        *self.attempts.lock() = 0;
    }

    /// Set failure mode for testing provider errors.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    /// Behave like a transport started without an API key.
    pub fn set_missing_credential(&self, missing: bool) {
        *self.missing_credential.lock() = missing;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn send(&self, envelope: &Envelope) -> Result<SendReceipt, TransportError> {
        if *self.missing_credential.lock() {
            return Err(TransportError::MissingCredential("RESEND_API_KEY"));
        }

        *self.attempts.lock() += 1;

        if *self.should_fail.lock() {
            return Err(TransportError::Rejected {
                status: 403,
                message: "The mock.dev domain is not verified".to_string(),
            });
        }

        let mut envelopes = self.envelopes.lock();
        envelopes.push(envelope.clone());

        Ok(SendReceipt {
            id: Some(format!("mock-{}", envelopes.len())),
        })
    }

    fn is_configured(&self) -> bool {
        !*self.missing_credential.lock()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> Envelope {
        Envelope {
            from: "Portfolio Contact <onboarding@resend.dev>".into(),
            to: vec!["owner@example.com".into()],
            subject: "Portfolio Contact: Jo".into(),
            html: "<p>hello</p>".into(),
            text: None,
            reply_to: "jo@example.com".into(),
        }
    }

    #[tokio::test]
    async fn test_mock_transport_captures_envelopes() {
        let mock = MockTransport::new();

        let receipt = mock.send(&envelope()).await.unwrap();
        assert_eq!(receipt.id.as_deref(), Some("mock-1"));
        assert_eq!(mock.sent_count(), 1);
        assert_eq!(mock.captured()[0].reply_to, "jo@example.com");
    }

    #[tokio::test]
    async fn test_mock_transport_failure_mode() {
        let mock = MockTransport::new();
        mock.set_should_fail(true);

        let result = mock.send(&envelope()).await;
        assert!(matches!(result, Err(TransportError::Rejected { .. })));
        assert_eq!(mock.attempt_count(), 1);
        assert_eq!(mock.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_transport_missing_credential() {
        let mock = MockTransport::new();
        mock.set_missing_credential(true);

        let result = mock.send(&envelope()).await;
        assert!(matches!(result, Err(TransportError::MissingCredential(_))));
        assert!(!mock.is_configured());
        assert_eq!(mock.attempt_count(), 0);
    }
}
