//! Mail transport abstraction.
//!
//! The dispatcher only sees `send(envelope) -> outcome`; which provider sits
//! behind it (or a recording mock in tests) is decided at startup.

use async_trait::async_trait;
use contact_core::Envelope;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Successful hand-off to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Provider-assigned message id, when one is returned.
    pub id: Option<String>,
}

/// Why a send did not go through.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Credential is absent; nothing was sent.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// Provider answered with a non-success status.
    #[error("provider rejected send ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Request never completed (connect, timeout, decode).
    #[error("network error: {0}")]
    Network(String),
}

/// Outbound mail capability.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one envelope.
    async fn send(&self, envelope: &Envelope) -> Result<SendReceipt, TransportError>;

    /// Whether the transport has what it needs to send.
    fn is_configured(&self) -> bool;

    /// Short name for logs and health output.
    fn name(&self) -> &'static str;
}

/// Dry-run transport: logs the envelope and reports success.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, envelope: &Envelope) -> Result<SendReceipt, TransportError> {
        info!(
            to = ?envelope.to,
            reply_to = %envelope.reply_to,
            subject = %envelope.subject,
            "Dry run: message not sent"
        );
        Ok(SendReceipt::default())
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
