//! Size and admission limits for the contact relay.
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so field minimums are duplicated there. Keep both in sync when modifying.

// === Submission Gate ===

/// Maximum admitted submissions per client within the rolling window.
pub const GATE_MAX_REQUESTS: usize = 5;

/// Rolling window length in seconds (15 minutes).
pub const GATE_WINDOW_SECS: u64 = 15 * 60;

/// How often stale client entries are swept, in seconds.
pub const GATE_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

/// Upper bound on tracked client keys before the least recently seen is evicted.
pub const GATE_MAX_CLIENTS: usize = 10_000;

// === Body Limits ===

/// Maximum contact request body in bytes (64KB).
///
/// Rejected before JSON parsing.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// === Strict Variant Field Minimums (chars) ===

pub const MIN_NAME_LEN: u64 = 2;
pub const MIN_SUBJECT_LEN: u64 = 5;
pub const MIN_MESSAGE_LEN: u64 = 10;

// === Outbound Message ===

/// Outbound subject header cap (chars).
///
/// Applied after the prefix is added, so the whole header fits.
pub const MAX_SUBJECT_LEN: usize = 100;
