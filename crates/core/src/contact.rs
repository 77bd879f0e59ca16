//! Contact form validation and the submission record kept in local storage.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Local storage key for the append-only submission log.
pub const SUBMISSIONS_KEY: &str = "contactSubmissions";

/// Minimum message length after trimming.
pub const MIN_MESSAGE_LEN: usize = 10;

/// Loose `local@domain.tld` shape check.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Raw form input as typed by the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub house: String,
    pub message: String,
}

/// A rejected field with its user-facing message.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A validated, timestamped submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub house: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ContactForm {
    /// Check every field and report all problems at once.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }

        if !EMAIL_RE.is_match(&self.email) {
            errors.push(FieldError::new("email", "Enter a valid email address"));
        }

        let message = self.message.trim();
        if message.is_empty() {
            errors.push(FieldError::new("message", "Message is required"));
        } else if message.chars().count() < MIN_MESSAGE_LEN {
            errors.push(FieldError::new(
                "message",
                format!("Message must be at least {MIN_MESSAGE_LEN} characters"),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and stamp the form with `now`.
    pub fn into_submission(self, now: DateTime<Utc>) -> Result<ContactSubmission, Vec<FieldError>> {
        self.validate()?;
        Ok(ContactSubmission {
            name: self.name,
            email: self.email,
            house: self.house,
            message: self.message,
            timestamp: now,
        })
    }
}
