//! Contact relay wire models

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

use crate::validation::rules::validate_not_blank;

/// Subject used when the sender leaves the subject field empty.
pub const DEFAULT_SUBJECT: &str = "New contact message";

/// Body of a `POST /api/contact` request.
///
/// Missing fields and explicit `null`s both deserialize to empty strings so
/// that the required-field check decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

impl ContactSubmission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// The subject to relay, falling back to [`DEFAULT_SUBJECT`] when blank.
    pub fn subject_or_default(&self) -> &str {
        if self.subject.trim().is_empty() {
            DEFAULT_SUBJECT
        } else {
            &self.subject
        }
    }
}

impl Validate for ContactSubmission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if let Err(err) = validate_not_blank(value) {
                errors.add(field, err);
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a relay response: `{ "message": .. }` on success, `{ "error": .. }`
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactReply {
    pub fn sent(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validatable;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let submission: ContactSubmission =
            serde_json::from_str(r#"{"name": "Jane", "email": "jane@x.com", "message": "Hello"}"#)
                .unwrap();

        assert_eq!(submission.subject, "");
        assert_eq!(submission.subject_or_default(), DEFAULT_SUBJECT);
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let submission: ContactSubmission =
            serde_json::from_str(r#"{"name": null, "email": "jane@x.com", "message": "Hi"}"#)
                .unwrap();

        assert_eq!(submission.name, "");
        assert!(!submission.validate_comprehensive().is_valid);
    }

    #[test]
    fn test_subject_kept_when_present() {
        let submission = ContactSubmission::new("Jane", "jane@x.com", "Project idea", "Hello");
        assert_eq!(submission.subject_or_default(), "Project idea");

        let blank = ContactSubmission::new("Jane", "jane@x.com", "   ", "Hello");
        assert_eq!(blank.subject_or_default(), DEFAULT_SUBJECT);
    }

    #[test]
    fn test_validation_reports_each_blank_field() {
        let submission = ContactSubmission::new(" ", "", "subject only", "\n\t");
        let result = submission.validate_comprehensive();

        assert!(!result.is_valid);
        assert!(result.errors.contains_key("name"));
        assert!(result.errors.contains_key("email"));
        assert!(result.errors.contains_key("message"));
        assert!(!result.errors.contains_key("subject"));
    }

    #[test]
    fn test_validation_accepts_complete_submission() {
        let submission = ContactSubmission::new("Jane", "jane@x.com", "", "Hello");
        assert!(submission.validate_comprehensive().is_valid);
    }

    #[test]
    fn test_reply_serialization_omits_absent_side() {
        let sent = serde_json::to_value(ContactReply::sent("Email sent successfully")).unwrap();
        assert_eq!(sent, serde_json::json!({ "message": "Email sent successfully" }));

        let failed = serde_json::to_value(ContactReply::failed("Failed to send email")).unwrap();
        assert_eq!(failed, serde_json::json!({ "error": "Failed to send email" }));
    }
}
