//! Outbound message rendering.
//!
//! Turns a validated [`Submission`] into a transport-ready [`Envelope`].

use serde::{Deserialize, Serialize};

use crate::limits::MAX_SUBJECT_LEN;
use crate::submission::Submission;

/// Prefix for every outbound subject line.
pub const SUBJECT_PREFIX: &str = "Portfolio Contact: ";

/// Transport-ready email.
///
/// Serializes to the shape mail providers expect
/// (`{from, to, subject, html, text, reply_to}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Fixed, provider-verified sending identity.
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// The submitter, so replies route straight back to them.
    pub reply_to: String,
}

impl Envelope {
    /// Render a submission for delivery from `from` to `to`.
    pub fn render(submission: &Submission, from: &str, to: &[String]) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_vec(),
            subject: subject_line(submission),
            html: render_html(submission),
            text: Some(render_text(submission)),
            reply_to: submission.email.clone(),
        }
    }
}

/// Build the subject header, single-line and capped at [`MAX_SUBJECT_LEN`] chars.
pub fn subject_line(submission: &Submission) -> String {
    let topic = submission
        .subject
        .as_deref()
        .unwrap_or(submission.name.as_str());

    let raw = format!("{}{}", SUBJECT_PREFIX, topic);
    let single_line: String = raw
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    truncate_chars(&single_line, MAX_SUBJECT_LEN)
}

fn render_html(submission: &Submission) -> String {
    let mut html = String::with_capacity(256 + submission.message.len());
    html.push_str("<h2>New message from your portfolio</h2>\n");
    html.push_str(&format!(
        "<p><strong>Name:</strong> {}</p>\n",
        escape_html(&submission.name)
    ));
    html.push_str(&format!(
        "<p><strong>Email:</strong> {}</p>\n",
        escape_html(&submission.email)
    ));
    if let Some(subject) = &submission.subject {
        html.push_str(&format!(
            "<p><strong>Subject:</strong> {}</p>\n",
            escape_html(subject)
        ));
    }
    html.push_str("<p><strong>Message:</strong></p>\n");
    html.push_str(&format!("<p>{}</p>\n", line_breaks(&escape_html(&submission.message))));
    html
}

fn render_text(submission: &Submission) -> String {
    let mut text = String::new();
    text.push_str("New message from your portfolio\n\n");
    text.push_str(&format!("Name: {}\n", submission.name));
    text.push_str(&format!("Email: {}\n", submission.email));
    if let Some(subject) = &submission.subject {
        text.push_str(&format!("Subject: {}\n", subject));
    }
    text.push_str("\nMessage:\n");
    text.push_str(&submission.message);
    text.push('\n');
    text
}

/// Convert newlines to `<br>`, treating `\r\n` as one break.
fn line_breaks(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\n', "<br>")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
