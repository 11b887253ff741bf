//! Application state shared across handlers.

use crate::middleware::rate_limit::{GateConfig, SharedGate, SubmissionGate};
use axum::extract::FromRef;
use content::PostStore;
use mailer::Dispatcher;
use std::sync::Arc;
use std::time::Instant;
use telemetry::{health, metrics};
use tracing::debug;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Message dispatcher (Resend in production, mock in tests)
    pub dispatcher: Dispatcher,
    /// Per-client submission gate
    pub gate: SharedGate,
    /// Blog posts
    pub posts: PostStore,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, gate_config: GateConfig, posts: PostStore) -> Self {
        Self {
            dispatcher,
            gate: Arc::new(SubmissionGate::new(gate_config)),
            posts,
        }
    }

    /// Push current component status into the health registry.
    pub async fn refresh_health(&self) {
        if self.dispatcher.is_configured() {
            health().mailer.set_healthy();
        } else {
            health().mailer.set_unhealthy("mail transport credential not configured");
        }

        if self.posts.is_available().await {
            health().content.set_healthy();
        } else {
            health()
                .content
                .set_unhealthy(format!("posts directory {} not found", self.posts.dir().display()));
        }
    }

    /// Start the gate sweeper background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_gate_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let gate = self.gate.clone();
        let period = gate.config().sweep_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = gate.sweep(Instant::now());
                let tracked = gate.tracked_clients();
                metrics().tracked_clients.set(tracked as u64);
                if removed > 0 {
                    debug!(removed, tracked, "Swept stale gate entries");
                }
            }
        })
    }
}

impl FromRef<AppState> for SharedGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}
