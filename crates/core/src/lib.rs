//! Core types, validation, and message rendering for the portfolio contact relay.

pub mod envelope;
pub mod error;
pub mod limits;
pub mod submission;

pub use envelope::*;
pub use error::{Error, ErrorKind, RateLimitErrorCode, Result, ValidationErrorCode};
pub use submission::*;
