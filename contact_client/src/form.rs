use std::str::FromStr;

use contact_core::{escape_html, ContactSubmission, DEFAULT_SUBJECT};

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
    /// Hidden from people, filled in by bots. Rendered as the `website` input.
    Honeypot,
}

impl Field {
    pub fn input_name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
            Field::Honeypot => "website",
        }
    }
}

impl FromStr for Field {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "subject" => Ok(Field::Subject),
            "message" => Ok(Field::Message),
            "website" => Ok(Field::Honeypot),
            other => Err(ClientError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub honeypot: String,
}

impl SubmissionForm {
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
            Field::Honeypot => &mut self.honeypot,
        };
        *slot = value.into();
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
            Field::Honeypot => &self.honeypot,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The form as typed, for the shared required-field check.
    pub fn as_submission(&self) -> ContactSubmission {
        ContactSubmission::new(
            self.name.clone(),
            self.email.clone(),
            self.subject.clone(),
            self.message.clone(),
        )
    }

    /// The payload actually sent: trimmed, HTML-escaped, subject defaulted.
    pub fn to_payload(&self) -> ContactSubmission {
        let subject = if self.subject.trim().is_empty() {
            DEFAULT_SUBJECT
        } else {
            &self.subject
        };

        ContactSubmission::new(
            sanitize(&self.name),
            sanitize(&self.email),
            sanitize(subject),
            sanitize(&self.message),
        )
    }
}

fn sanitize(value: &str) -> String {
    escape_html(value.trim())
}
