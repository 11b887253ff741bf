//! Unified error types for the contact relay.
//!
//! Error codes:
//! - VALID_001-002: Caller supplied malformed or incomplete data
//! - RATE_001: Submission gate rejected the client
//! - CONFIG_001: Server is missing transport configuration
//! - MAIL_001: Mail provider rejected or failed the send

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: Body is not a JSON object
    InvalidFormat,
    /// VALID_002: One or more field rules violated
    RuleViolation,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "VALID_001",
            Self::RuleViolation => "VALID_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        400
    }
}

/// Rate limit error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitErrorCode {
    /// RATE_001: Too many submissions in the window
    Exceeded,
}

impl RateLimitErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Exceeded => "RATE_001",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        429
    }
}

/// Failure kind, independent of the message carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    RateLimited,
    Configuration,
    Transport,
}

/// Unified error type for the contact relay.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-side data problem. `errors` lists every violated rule.
    #[error("[{code}] {}", .errors.join("; "))]
    Validation {
        code: &'static str,
        errors: Vec<String>,
    },

    /// Submission gate rejected the client.
    #[error("[{code}] {message}")]
    RateLimit {
        code: &'static str,
        message: String,
        retry_after: Option<u64>,
    },

    /// Required server configuration (e.g. transport credential) is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Mail provider rejected or failed the send.
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Create a validation error carrying every violated rule.
    pub fn validation(code: ValidationErrorCode, errors: Vec<String>) -> Self {
        Self::Validation {
            code: code.code(),
            errors,
        }
    }

    /// Create a rate limit error.
    pub fn rate_limit(
        code: RateLimitErrorCode,
        msg: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self::RateLimit {
            code: code.code(),
            message: msg.into(),
            retry_after,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Get the failure kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::RateLimit { .. } => ErrorKind::RateLimited,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::RateLimit { .. } => 429,
            Self::Configuration(_) => 503,
            Self::Transport(_) => 500,
        }
    }

    /// Get the error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. } => *code,
            Self::RateLimit { code, .. } => *code,
            Self::Configuration(_) => "CONFIG_001",
            Self::Transport(_) => "MAIL_001",
        }
    }
}
