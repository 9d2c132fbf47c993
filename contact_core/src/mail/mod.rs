//! Outbound mail for the contact relay.
//!
//! [`message`] turns a validated [`ContactSubmission`](crate::models::ContactSubmission)
//! into an [`OutgoingEmail`]; [`transport`] delivers it over SMTP through
//! [lettre](https://lettre.rs).
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `TO_EMAIL` | Yes | Mailbox that receives contact messages |
//! | `SMTP_HOST` | Yes | SMTP server hostname |
//! | `SMTP_PORT` | No | Port (default: 587, `465` selects implicit TLS) |
//! | `SMTP_USER` | Yes | Login, also used as the sender mailbox |
//! | `SMTP_PASS` | No | Password for `SMTP_USER` |
//! | `SMTP_TIMEOUT_SECONDS` | No | Per-send limit, default 20; must be below the request timeout |

pub mod message;
pub mod transport;

pub use message::{compose_contact_email, OutgoingEmail, SUBJECT_PREFIX};
pub use transport::{
    sender_mailbox, MailTransport, SmtpMailer, SmtpTransportBuilder, TransportBuilder,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required config: {0}")]
    MissingConfig(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}
