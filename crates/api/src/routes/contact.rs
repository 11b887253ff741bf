//! Contact submission endpoint.
//!
//! Gate first, then parse and dispatch. Every failure maps to a distinct
//! error code; provider and configuration details are only logged.

use axum::{body::Bytes, extract::State, Json};
use contact_core::{
    limits::MAX_BODY_BYTES, ContactForm, Error, RateLimitErrorCode, ValidationErrorCode,
};
use telemetry::metrics;
use tracing::{debug, warn};

use crate::extractors::ClientIp;
use crate::middleware::GateDecision;
use crate::response::{ApiError, ContactResponse};
use crate::state::AppState;

/// POST /api/contact - Relay a contact form submission by email.
pub async fn contact_handler(
    State(state): State<AppState>,
    client_ip: ClientIp,
    body: Bytes,
) -> Result<Json<ContactResponse>, ApiError> {
    metrics().submissions_received.inc();

    let decision = state.gate.check(client_ip.as_str());
    metrics()
        .tracked_clients
        .set(state.gate.tracked_clients() as u64);

    if let GateDecision::Rejected { .. } = decision {
        metrics().submissions_rate_limited.inc();
        warn!(client_ip = %client_ip.as_str(), "Contact submission rate limited");
        return Err(Error::rate_limit(
            RateLimitErrorCode::Exceeded,
            "too many submissions",
            decision.retry_after_secs(),
        )
        .into());
    }

    if body.len() > MAX_BODY_BYTES {
        return Err(ApiError::validation(
            ValidationErrorCode::InvalidFormat.code(),
            vec![format!(
                "Payload size {}KB exceeds {}KB limit",
                body.len() / 1024,
                MAX_BODY_BYTES / 1024
            )],
        ));
    }

    debug!(
        client_ip = %client_ip.as_str(),
        payload_size = body.len(),
        "Received contact submission"
    );

    let form = ContactForm::from_json(&body).map_err(|e| {
        metrics().submissions_invalid.inc();
        e
    })?;

    let receipt = state.dispatcher.dispatch(form).await?;

    Ok(Json(ContactResponse::sent(receipt.submission_id)))
}
