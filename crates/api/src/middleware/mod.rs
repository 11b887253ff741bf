//! Request admission.

pub mod rate_limit;

pub use rate_limit::{GateConfig, GateDecision, SharedGate, SubmissionGate};
