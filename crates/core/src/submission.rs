//! Contact submissions and their validation rule sets.
//!
//! Two rule sets exist, selected by [`ContactVariant`]:
//! - `Basic`: name, email and message are required, email must be well formed.
//! - `Strict`: subject is required too, and every field has a minimum length.
//!
//! Both report every violated rule, not just the first.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{Error, Result, ValidationErrorCode};

/// Field order used when reporting violations.
const FIELD_ORDER: [&str; 4] = ["name", "email", "subject", "message"];

/// Which rule set applies to incoming submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactVariant {
    #[default]
    Basic,
    Strict,
}

impl ContactVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for ContactVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown contact variant: {}", other)),
        }
    }
}

/// Raw contact form body.
///
/// Every field is optional so that absent fields surface as rule
/// violations rather than parse failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactForm {
    /// Parse a JSON request body.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| {
            Error::validation(
                ValidationErrorCode::InvalidFormat,
                vec![format!("Invalid JSON body: {}", e)],
            )
        })
    }

    /// Validate against `variant` and produce a [`Submission`].
    pub fn into_submission(self, variant: ContactVariant) -> Result<Submission> {
        let name = trimmed(self.name);
        let email = trimmed(self.email);
        let subject = trimmed(self.subject);
        let message = trimmed(self.message);

        let outcome = match variant {
            ContactVariant::Basic => BasicRules {
                name: name.clone(),
                email: email.clone(),
                message: message.clone(),
            }
            .validate(),
            ContactVariant::Strict => StrictRules {
                name: name.clone(),
                email: email.clone(),
                subject: subject.clone(),
                message: message.clone(),
            }
            .validate(),
        };

        if let Err(errors) = outcome {
            return Err(Error::validation(
                ValidationErrorCode::RuleViolation,
                collect_messages(&errors),
            ));
        }

        Ok(Submission {
            id: Uuid::new_v4(),
            name,
            email,
            subject: Some(subject).filter(|s| !s.is_empty()),
            message,
        })
    }
}

/// A validated contact submission. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Validate)]
struct BasicRules {
    #[validate(custom(function = "required", message = "Name is required"))]
    name: String,
    #[validate(
        custom(function = "required", message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    email: String,
    #[validate(custom(function = "required", message = "Message is required"))]
    message: String,
}

#[derive(Debug, Validate)]
struct StrictRules {
    #[validate(
        custom(function = "required", message = "Name is required"),
        length(min = 2, message = "Name must be at least 2 characters")
    )]
    name: String,
    #[validate(
        custom(function = "required", message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    email: String,
    #[validate(
        custom(function = "required", message = "Subject is required"),
        length(min = 5, message = "Subject must be at least 5 characters")
    )]
    subject: String,
    #[validate(
        custom(function = "required", message = "Message is required"),
        length(min = 10, message = "Message must be at least 10 characters")
    )]
    message: String,
}

fn required(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Flatten validator output into messages, in form field order.
fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let fields = errors.field_errors();
    let mut messages = Vec::new();

    for field in FIELD_ORDER {
        let Some(field_errors) = fields.get(field) else {
            continue;
        };
        // A blank field only reports that it is required
        let blank = field_errors.iter().find(|e| e.code == "required");
        let reported = match blank {
            Some(err) => std::slice::from_ref(err),
            None => field_errors.as_slice(),
        };
        for err in reported {
            let msg = match &err.message {
                Some(m) => m.to_string(),
                None => format!("{}: {}", field, err.code),
            };
            messages.push(msg);
        }
    }

    messages
}
