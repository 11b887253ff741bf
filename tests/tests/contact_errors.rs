//! Tests for error handling in the contact relay.
//!
//! These tests verify that each failure maps to the right status and code,
//! and that no message is sent when a request is refused.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};
use std::time::{Duration, Instant};

/// Blank fields return VALID_002 listing every violated rule
#[tokio::test]
async fn test_blank_fields_return_400() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/contact")
        .json(&fixtures::blank_submission())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_002");

    let details: Vec<String> = serde_json::from_value(body["details"].clone()).unwrap();
    assert!(details.contains(&"Name is required".to_string()));
    assert!(details.contains(&"Email is required".to_string()));
    assert!(details.contains(&"Message is required".to_string()));

    assert_eq!(ctx.sent_count(), 0, "Invalid submissions must not be sent");
    assert_eq!(ctx.mock_transport.attempt_count(), 0);
}

/// Missing fields behave like blank ones
#[tokio::test]
async fn test_empty_object_returns_400() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/contact")
        .json(&serde_json::json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_002");
    assert_eq!(body["details"].as_array().map(Vec::len), Some(3));
}

/// Malformed email is reported with its own message
#[tokio::test]
async fn test_invalid_email_returns_400() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/contact")
        .json(&serde_json::json!({
            "name": "Jo",
            "email": "not-an-email",
            "message": "Hello"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["details"][0], "Please enter a valid email address");
    assert_eq!(ctx.sent_count(), 0);
}

/// Invalid JSON returns VALID_001
#[tokio::test]
async fn test_invalid_json_returns_400() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/contact")
        .content_type("application/json")
        .bytes("not valid json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001", "Expected VALID_001 for invalid JSON");
}

/// Oversized body returns VALID_001
#[tokio::test]
async fn test_oversized_payload_returns_400() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = fixtures::payload(&serde_json::json!({
        "name": "Jo",
        "email": "jo@example.com",
        "message": "x".repeat(70 * 1024)
    }));

    let response = server
        .post("/api/contact")
        .content_type("application/json")
        .bytes(payload.into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALID_001");
    assert_eq!(ctx.sent_count(), 0);
}

/// Sixth submission within the window returns 429 with Retry-After
#[tokio::test]
async fn test_sixth_submission_rate_limited() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for i in 0..5 {
        let response = server
            .post("/api/contact")
            .json(&fixtures::valid_submission())
            .await;
        assert_eq!(
            response.status_code(),
            StatusCode::OK,
            "Submission {} should be admitted",
            i + 1
        );
    }

    let response = server
        .post("/api/contact")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "RATE_001");

    let retry_after: u64 = response
        .header("Retry-After")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after > 0 && retry_after <= 900);

    assert_eq!(ctx.sent_count(), 5, "Rejected submission must not be sent");
}

/// Invalid submissions still consume the allowance
#[tokio::test]
async fn test_invalid_submissions_count_toward_limit() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..5 {
        server
            .post("/api/contact")
            .json(&fixtures::blank_submission())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    server
        .post("/api/contact")
        .json(&fixtures::valid_submission())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    assert_eq!(ctx.sent_count(), 0);
}

/// Rotating X-Forwarded-For from one peer does not reset the allowance
#[tokio::test]
async fn test_spoofed_forwarded_for_ignored_by_default() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut admitted = 0;
    for i in 0..20 {
        let response = server
            .post("/api/contact")
            .add_header("X-Forwarded-For", format!("203.0.113.{}", i))
            .json(&fixtures::valid_submission())
            .await;
        if response.status_code() == StatusCode::OK {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(ctx.sent_count(), 5);
}

/// Behind a trusted proxy only the proxy-appended hop is the key
#[tokio::test]
async fn test_trusted_proxy_keys_on_last_hop() {
    let ctx = TestContext::behind_proxy().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for i in 0..6 {
        let response = server
            .post("/api/contact")
            .add_header("X-Forwarded-For", format!("10.0.0.{}, 198.51.100.77", i))
            .json(&fixtures::valid_submission())
            .await;
        let expected = if i < 5 {
            StatusCode::OK
        } else {
            StatusCode::TOO_MANY_REQUESTS
        };
        assert_eq!(response.status_code(), expected, "Submission {}", i + 1);
    }

    assert_eq!(ctx.sent_count(), 5);
}

/// A client retrying after Retry-After seconds is admitted
#[tokio::test]
async fn test_retry_after_is_enough_to_be_admitted() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..5 {
        server
            .post("/api/contact")
            .json(&fixtures::valid_submission())
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/api/contact")
        .json(&fixtures::valid_submission())
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = response
        .header("Retry-After")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    let later = Instant::now() + Duration::from_secs(retry_after);
    assert!(ctx.state.gate.check_at("unknown", later).is_admitted());
}

/// Provider failure returns MAIL_001 without leaking provider text
#[tokio::test]
async fn test_transport_failure_returns_500() {
    let ctx = TestContext::new().await;
    ctx.set_transport_failure(true);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/contact")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "MAIL_001");
    assert_eq!(body["error"], "Failed to send message. Please try again.");
    assert!(!response.text().contains("not verified"));

    assert_eq!(ctx.mock_transport.attempt_count(), 1, "Sends are never retried");
}

/// Missing API key returns CONFIG_001 without naming the variable
#[tokio::test]
async fn test_missing_credential_returns_503() {
    let ctx = TestContext::new().await;
    ctx.set_missing_credential(true);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/contact")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "CONFIG_001");
    assert!(!response.text().contains("RESEND_API_KEY"));
}

/// Validation runs before the credential check
#[tokio::test]
async fn test_invalid_submission_without_credential_is_400() {
    let ctx = TestContext::new().await;
    ctx.set_missing_credential(true);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/api/contact")
        .json(&fixtures::blank_submission())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

/// Only POST is routed
#[tokio::test]
async fn test_get_contact_not_allowed() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/api/contact").await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}
