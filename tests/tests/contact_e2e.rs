//! End-to-end tests for the contact relay.
//!
//! Requests go through the real router and dispatcher; the mail provider is
//! replaced by `MockTransport` so the sent envelopes can be inspected.

use axum::http::StatusCode;
use axum_test::TestServer;
use contact_core::ContactVariant;
use integration_tests::{fixtures, setup::TestContext};

/// A valid submission is relayed exactly once
#[tokio::test]
async fn test_valid_submission_sends_one_message() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/contact")
        .json(&fixtures::valid_submission())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message sent successfully!");
    assert!(body["id"].as_str().is_some(), "Response should carry a submission id");

    assert_eq!(ctx.sent_count(), 1, "Expected exactly one send");
}

/// Envelope carries sender as reply-to, fixed From and converted line breaks
#[tokio::test]
async fn test_envelope_shape() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/api/contact")
        .json(&fixtures::short_submission())
        .await
        .assert_status_ok();

    let sent = ctx.captured();
    assert_eq!(sent.len(), 1);

    let envelope = &sent[0];
    assert_eq!(envelope.reply_to, "jo@example.com");
    assert_eq!(envelope.from, "Portfolio Contact <onboarding@resend.dev>");
    assert_eq!(envelope.to, vec!["owner@example.com".to_string()]);
    assert_eq!(envelope.subject, "Portfolio Contact: Jo");
    assert!(
        envelope.html.contains("Hi there<br>second line"),
        "Newlines should become line breaks, got: {}",
        envelope.html
    );
}

/// Subject line is derived from the subject field when present
#[tokio::test]
async fn test_subject_field_used_for_subject_line() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/api/contact")
        .json(&fixtures::valid_submission())
        .await
        .assert_status_ok();

    let sent = ctx.captured();
    assert_eq!(sent[0].subject, "Portfolio Contact: Collaboration on engines");
}

/// Subject line never exceeds 100 characters
#[tokio::test]
async fn test_long_name_subject_truncated() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/api/contact")
        .json(&fixtures::long_name_submission())
        .await
        .assert_status_ok();

    let sent = ctx.captured();
    assert_eq!(sent[0].subject.chars().count(), 100);
    assert!(sent[0].subject.starts_with("Portfolio Contact: NNN"));
}

/// User-supplied markup is escaped in the HTML body
#[tokio::test]
async fn test_markup_escaped_in_body() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/api/contact")
        .json(&fixtures::markup_submission())
        .await
        .assert_status_ok();

    let html = &ctx.captured()[0].html;
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("&lt;b&gt;Mallory&lt;/b&gt;"));
}

/// Strict rules accept a complete submission
#[tokio::test]
async fn test_strict_variant_accepts_complete_submission() {
    let ctx = TestContext::with_variant(ContactVariant::Strict).await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server
        .post("/api/contact")
        .json(&fixtures::valid_submission())
        .await
        .assert_status_ok();

    assert_eq!(ctx.sent_count(), 1);
}

/// Strict rules require a subject and minimum lengths
#[tokio::test]
async fn test_strict_variant_rejects_short_submission() {
    let ctx = TestContext::with_variant(ContactVariant::Strict).await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/api/contact")
        .json(&serde_json::json!({
            "name": "J",
            "email": "j@example.com",
            "message": "short"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    let details: Vec<String> = serde_json::from_value(body["details"].clone()).unwrap();
    assert_eq!(
        details,
        vec![
            "Name must be at least 2 characters".to_string(),
            "Subject is required".to_string(),
            "Message must be at least 10 characters".to_string(),
        ]
    );
    assert_eq!(ctx.sent_count(), 0);
}

/// Behind a trusted proxy, distinct clients have independent allowances
#[tokio::test]
async fn test_clients_do_not_share_allowance() {
    let ctx = TestContext::behind_proxy().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..5 {
        server
            .post("/api/contact")
            .add_header("X-Forwarded-For", "203.0.113.1")
            .json(&fixtures::valid_submission())
            .await
            .assert_status_ok();
    }

    server
        .post("/api/contact")
        .add_header("X-Forwarded-For", "203.0.113.2")
        .json(&fixtures::valid_submission())
        .await
        .assert_status_ok();

    assert_eq!(ctx.sent_count(), 6);
}
