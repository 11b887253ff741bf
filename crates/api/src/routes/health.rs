//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::{health, metrics, MetricsSnapshot};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - Full health check.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    state.refresh_health().await;
    let report = health().report();

    Json(HealthResponse {
        status: report.status.as_str().to_string(),
        transport: state.dispatcher.transport_name().to_string(),
        contact_variant: state.dispatcher.variant().as_str().to_string(),
        mailer_configured: health().mailer.is_healthy(),
        posts_available: health().content.is_healthy(),
        tracked_clients: state.gate.tracked_clients(),
        submissions_received: metrics().submissions_received.get(),
        messages_sent: metrics().messages_sent.get(),
    })
}

/// GET /health/ready - Readiness probe (contact form can deliver).
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    state.refresh_health().await;
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - Liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    if health().is_alive() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /metrics - In-process counters and dispatch latency.
pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    metrics()
        .tracked_clients
        .set(state.gate.tracked_clients() as u64);
    Json(metrics().snapshot())
}
