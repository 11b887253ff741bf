//! Submission gate: per-client sliding-window admission.
//!
//! Every attempt is recorded, including rejected ones, so a client that
//! keeps hammering the endpoint stays locked out until it backs off for a
//! full window.
//!
//! The table is guarded by a process-local mutex. Decisions are consistent
//! within one process; separate processes each keep their own table.

use contact_core::limits::{
    GATE_MAX_CLIENTS, GATE_MAX_REQUESTS, GATE_SWEEP_INTERVAL_SECS, GATE_WINDOW_SECS,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Attempts allowed per client within the window
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    /// Rolling window in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Interval between stale-entry sweeps in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Tracked client cap; the least recently seen client is evicted past it
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
    /// Key on proxy headers instead of the TCP peer. Only safe behind a
    /// proxy that sets them.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

fn default_max_requests() -> usize {
    GATE_MAX_REQUESTS
}

fn default_window_secs() -> u64 {
    GATE_WINDOW_SECS
}

fn default_sweep_interval_secs() -> u64 {
    GATE_SWEEP_INTERVAL_SECS
}

fn default_max_clients() -> usize {
    GATE_MAX_CLIENTS
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            max_clients: default_max_clients(),
            trust_proxy_headers: false,
        }
    }
}

impl GateConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Admitted {
        /// Attempts left before the window fills
        remaining: usize,
    },
    Rejected {
        /// Time until one more attempt would be admitted
        retry_after: Duration,
    },
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    /// `Retry-After` value in whole seconds, at least 1.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Admitted { .. } => None,
            Self::Rejected { retry_after } => {
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                Some(secs.max(1))
            }
        }
    }
}

/// Sliding-window limiter keyed by client address.
pub struct SubmissionGate {
    clients: Mutex<HashMap<String, VecDeque<Instant>>>,
    config: GateConfig,
}

impl SubmissionGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Check and record an attempt for `key` now.
    pub fn check(&self, key: &str) -> GateDecision {
        self.check_at(key, Instant::now())
    }

    /// Check and record an attempt for `key` at `now`.
    ///
    /// Prunes hits older than the window, records `now`, then rejects if
    /// the count exceeds `max_requests`. Only the newest `max_requests + 1`
    /// hits are kept; older ones cannot affect any decision.
    pub fn check_at(&self, key: &str, now: Instant) -> GateDecision {
        let window = self.config.window();
        let max = self.config.max_requests;
        let mut clients = self.clients.lock();

        if !clients.contains_key(key) && clients.len() >= self.config.max_clients {
            evict_least_recent(&mut clients);
        }

        let hits = clients.entry(key.to_string()).or_default();
        prune(hits, now, window);
        hits.push_back(now);
        while hits.len() > max + 1 {
            hits.pop_front();
        }

        if hits.len() > max {
            // The next attempt fits once all but max - 1 recorded hits expire.
            let blocking = hits.get(hits.len() - max).copied().unwrap_or(now);
            GateDecision::Rejected {
                retry_after: (blocking + window).saturating_duration_since(now),
            }
        } else {
            GateDecision::Admitted {
                remaining: max - hits.len(),
            }
        }
    }

    /// Remove clients with no hits inside the window. Returns how many were dropped.
    pub fn sweep(&self, now: Instant) -> usize {
        let window = self.config.window();
        let mut clients = self.clients.lock();
        let before = clients.len();

        clients.retain(|_, hits| {
            prune(hits, now, window);
            !hits.is_empty()
        });

        before - clients.len()
    }

    /// Number of client keys currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().len()
    }

    /// Recorded attempts for `key` still inside the window as of `now`.
    pub fn hits_at(&self, key: &str, now: Instant) -> usize {
        let window = self.config.window();
        self.clients
            .lock()
            .get(key)
            .map(|hits| {
                hits.iter()
                    .filter(|&&t| now.saturating_duration_since(t) < window)
                    .count()
            })
            .unwrap_or(0)
    }
}

fn prune(hits: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = hits.front() {
        if now.saturating_duration_since(oldest) >= window {
            hits.pop_front();
        } else {
            break;
        }
    }
}

fn evict_least_recent(clients: &mut HashMap<String, VecDeque<Instant>>) {
    let victim = clients
        .iter()
        .min_by_key(|(_, hits)| hits.back().copied())
        .map(|(key, _)| key.clone());

    if let Some(key) = victim {
        clients.remove(&key);
    }
}

/// Shared gate state.
pub type SharedGate = Arc<SubmissionGate>;
