//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contact_core::{Error, RateLimitErrorCode};
use content::ContentError;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Caller-facing text for server-side failures. Details stay in the logs.
pub const MSG_UNAVAILABLE: &str = "Contact form is temporarily unavailable. Please try again later.";
pub const MSG_SEND_FAILED: &str = "Failed to send message. Please try again.";
pub const MSG_RATE_LIMITED: &str = "Too many messages. Please try again later.";
pub const MSG_INTERNAL: &str = "Internal server error";

/// Success response for a contact submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub id: Uuid,
    pub timestamp: i64,
}

impl ContactResponse {
    pub fn sent(id: Uuid) -> Self {
        Self {
            success: true,
            message: "Message sent successfully!".to_string(),
            id,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub transport: String,
    pub contact_variant: String,
    pub mailer_configured: bool,
    pub posts_available: bool,
    pub tracked_clients: usize,
    pub submissions_received: u64,
    pub messages_sent: u64,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

/// API error: status, JSON body and optional `Retry-After`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
    pub retry_after: Option<u64>,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
            retry_after: None,
        }
    }

    pub fn validation(code: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response: ErrorResponse::new("Validation failed", code).with_details(errors),
            retry_after: None,
        }
    }

    pub fn rate_limited(retry_after: Option<u64>) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            response: ErrorResponse::new(MSG_RATE_LIMITED, RateLimitErrorCode::Exceeded.code()),
            retry_after,
        }
    }

    pub fn not_found(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::NOT_FOUND, code, msg)
    }

    pub fn internal() -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_001", MSG_INTERNAL)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();

        // Add Retry-After header for rate limit responses
        if let Some(retry_after) = self.retry_after {
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = err.error_code();

        match err {
            Error::Validation { errors, .. } => ApiError::validation(code, errors),
            Error::RateLimit { retry_after, .. } => ApiError::rate_limited(retry_after),
            Error::Configuration(_) => ApiError::with_code(status, code, MSG_UNAVAILABLE),
            Error::Transport(_) => ApiError::with_code(status, code, MSG_SEND_FAILED),
        }
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::InvalidSlug(_) => ApiError::not_found("POST_404", "Post not found"),
            other => {
                warn!(error = %other, "Failed to load post");
                ApiError::internal()
            }
        }
    }
}
