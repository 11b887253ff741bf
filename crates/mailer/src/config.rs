//! Mailer configuration.

use serde::{Deserialize, Serialize};

/// Outbound mail configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    /// Provider API key. Sends fail with a configuration error while unset.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Provider base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Fixed, provider-verified sending identity
    #[serde(default = "default_from")]
    pub from: String,
    /// Destination address(es)
    #[serde(default = "default_to")]
    pub to: Vec<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log envelopes instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

fn default_api_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_from() -> String {
    "Portfolio Contact <onboarding@resend.dev>".to_string()
}

fn default_to() -> Vec<String> {
    vec!["owner@example.com".to_string()]
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            from: default_from(),
            to: default_to(),
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }
}

impl MailerConfig {
    /// Whether a non-empty credential is present.
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }

    /// Destination list from a comma-separated override.
    pub fn set_destination(&mut self, to: &str) {
        let parsed: Vec<String> = to
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !parsed.is_empty() {
            self.to = parsed;
        }
    }

    /// Endpoint for sending a single email.
    pub fn send_url(&self) -> Result<url::Url, url::ParseError> {
        // Without a trailing slash, join would replace the last path segment
        let mut base = self.api_url.trim_end().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        url::Url::parse(&base)?.join("emails")
    }
}
