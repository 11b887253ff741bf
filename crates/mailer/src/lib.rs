//! Outbound mail transport and message dispatch for the contact relay.

pub mod config;
pub mod dispatch;
pub mod resend;
pub mod transport;

pub use config::*;
pub use dispatch::*;
pub use resend::*;
pub use transport::*;

use std::sync::Arc;

/// Build the transport selected by `config`.
pub fn transport_from_config(config: &MailerConfig) -> Result<Arc<dyn MailTransport>, TransportError> {
    if config.dry_run {
        return Ok(Arc::new(LogTransport));
    }
    Ok(Arc::new(ResendTransport::new(config)?))
}
