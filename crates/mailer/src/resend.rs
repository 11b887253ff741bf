//! Resend HTTP transport.
//!
//! `POST {api_url}/emails` with a bearer credential and the envelope as JSON.

use std::time::Duration;

use async_trait::async_trait;
use contact_core::Envelope;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::MailerConfig;
use crate::transport::{MailTransport, SendReceipt, TransportError};

/// Maximum provider error body echoed into logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

/// Transport backed by the Resend email API.
#[derive(Clone)]
pub struct ResendTransport {
    api_key: Option<String>,
    send_url: String,
    http_client: reqwest::Client,
}

impl ResendTransport {
    /// Creates a new transport. A missing key is not an error here; sends
    /// report it instead so the server can still start and serve content.
    pub fn new(config: &MailerConfig) -> Result<Self, TransportError> {
        let send_url = config
            .send_url()
            .map_err(|e| TransportError::Network(format!("invalid api_url: {}", e)))?
            .to_string();

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            send_url,
            http_client,
        })
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    async fn send(&self, envelope: &Envelope) -> Result<SendReceipt, TransportError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(TransportError::MissingCredential("RESEND_API_KEY"));
        };

        debug!(url = %self.send_url, "Sending message via Resend");

        let response = self
            .http_client
            .post(&self.send_url)
            .bearer_auth(api_key)
            .json(envelope)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Resend request failed");
                TransportError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(TransportError::Rejected { status, message });
        }

        let parsed: ResendResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse Resend response");
            TransportError::Network(format!("invalid provider response: {}", e))
        })?;

        Ok(SendReceipt { id: parsed.id })
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}
