//! Message dispatcher.
//!
//! Per submission: validate, render, send once. There is no retry; a failed
//! send is terminal for that attempt and the sender has to resubmit.

use std::sync::Arc;
use std::time::Instant;

use contact_core::{ContactForm, ContactVariant, Envelope, Error, Result};
use telemetry::metrics;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::MailerConfig;
use crate::transport::{MailTransport, TransportError};

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub submission_id: Uuid,
    pub provider_id: Option<String>,
}

/// Validates submissions and relays them through a [`MailTransport`].
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    from: String,
    to: Vec<String>,
    variant: ContactVariant,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        config: &MailerConfig,
        variant: ContactVariant,
    ) -> Self {
        Self {
            transport,
            from: config.from.clone(),
            to: config.to.clone(),
            variant,
        }
    }

    pub fn variant(&self) -> ContactVariant {
        self.variant
    }

    /// Whether the underlying transport can send.
    pub fn is_configured(&self) -> bool {
        self.transport.is_configured()
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Validate `form`, render it, and hand it to the transport exactly once.
    pub async fn dispatch(&self, form: ContactForm) -> Result<DispatchReceipt> {
        let submission = form.into_submission(self.variant).map_err(|e| {
            metrics().submissions_invalid.inc();
            e
        })?;

        let envelope = Envelope::render(&submission, &self.from, &self.to);

        let start = Instant::now();
        let outcome = self.transport.send(&envelope).await;
        metrics()
            .dispatch_latency_ms
            .observe(start.elapsed().as_millis() as u64);

        match outcome {
            Ok(receipt) => {
                metrics().messages_sent.inc();
                info!(
                    submission_id = %submission.id,
                    provider_id = receipt.id.as_deref().unwrap_or("none"),
                    transport = self.transport.name(),
                    "Contact message sent"
                );
                Ok(DispatchReceipt {
                    submission_id: submission.id,
                    provider_id: receipt.id,
                })
            }
            Err(TransportError::MissingCredential(var)) => {
                metrics().config_failures.inc();
                warn!(
                    submission_id = %submission.id,
                    missing = var,
                    "Mail transport is not configured"
                );
                Err(Error::configuration(format!("{} is not set", var)))
            }
            Err(e) => {
                metrics().dispatch_failures.inc();
                error!(
                    submission_id = %submission.id,
                    transport = self.transport.name(),
                    error = %e,
                    "Mail transport failed"
                );
                Err(Error::transport(e.to_string()))
            }
        }
    }
}
