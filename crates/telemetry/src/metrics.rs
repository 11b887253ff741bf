//! In-process metrics for the contact relay.
//!
//! Counters live in a process-wide registry and are exposed through the
//! health and metrics endpoints. Nothing is exported to an external system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A value that can be set freely.
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Latency histogram with fixed millisecond buckets.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 10ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, overflow
    buckets: [AtomicU64; 10],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 9] = [10, 50, 100, 250, 500, 1000, 2500, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        let idx = Self::BUCKET_BOUNDS
            .iter()
            .position(|&bound| ms <= bound)
            .unwrap_or(Self::BUCKET_BOUNDS.len());
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum.load(Ordering::Relaxed) as f64 / count as f64
        }
    }

    /// Bucket counts keyed by upper bound; `None` is the overflow bucket.
    pub fn buckets(&self) -> Vec<(Option<u64>, u64)> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, count)| {
                (
                    Self::BUCKET_BOUNDS.get(i).copied(),
                    count.load(Ordering::Relaxed),
                )
            })
            .collect()
    }
}

/// Collected metrics for the contact relay.
#[derive(Debug, Default)]
pub struct Metrics {
    // Submission gate
    pub submissions_received: Counter,
    pub submissions_rate_limited: Counter,
    pub tracked_clients: Gauge,

    // Dispatcher
    pub submissions_invalid: Counter,
    pub messages_sent: Counter,
    pub dispatch_failures: Counter,
    pub config_failures: Counter,
    pub dispatch_latency_ms: Histogram,

    // Content
    pub posts_served: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            submissions_received: self.submissions_received.get(),
            submissions_rate_limited: self.submissions_rate_limited.get(),
            submissions_invalid: self.submissions_invalid.get(),
            messages_sent: self.messages_sent.get(),
            dispatch_failures: self.dispatch_failures.get(),
            config_failures: self.config_failures.get(),
            dispatch_latency_mean_ms: self.dispatch_latency_ms.mean(),
            dispatch_latency_buckets: self
                .dispatch_latency_ms
                .buckets()
                .into_iter()
                .map(|(le_ms, count)| LatencyBucket { le_ms, count })
                .collect(),
            tracked_clients: self.tracked_clients.get(),
            posts_served: self.posts_served.get(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub submissions_received: u64,
    pub submissions_rate_limited: u64,
    pub submissions_invalid: u64,
    pub messages_sent: u64,
    pub dispatch_failures: u64,
    pub config_failures: u64,
    pub dispatch_latency_mean_ms: f64,
    pub dispatch_latency_buckets: Vec<LatencyBucket>,
    pub tracked_clients: u64,
    pub posts_served: u64,
}

/// One histogram bucket; `le_ms` is `None` for the overflow bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyBucket {
    pub le_ms: Option<u64>,
    pub count: u64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
