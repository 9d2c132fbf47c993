use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};

use super::{MailError, OutgoingEmail};
use crate::config::MailConfig;

/// Delivers one rendered email. Implementations never retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Builds a [`MailTransport`] from the current mail settings.
pub trait TransportBuilder: Send + Sync {
    fn build(&self, config: &MailConfig) -> Result<Arc<dyn MailTransport>, MailError>;
}

/// Resolves the mailbox messages are sent from. Relays usually only accept
/// the authenticated account as sender, so this is `SMTP_USER`.
pub fn sender_mailbox(config: &MailConfig) -> Result<String, MailError> {
    let user = config
        .user()
        .ok_or_else(|| MailError::MissingConfig("SMTP_USER".to_string()))?;

    user.parse::<Address>()
        .map_err(|e| MailError::InvalidAddress(format!("SMTP_USER {:?}: {}", user, e)))?;

    Ok(user.to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpTransportBuilder;

impl TransportBuilder for SmtpTransportBuilder {
    fn build(&self, config: &MailConfig) -> Result<Arc<dyn MailTransport>, MailError> {
        let host = config
            .host()
            .ok_or_else(|| MailError::MissingConfig("SMTP_HOST".to_string()))?;

        let builder = if config.uses_implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| MailError::Smtp(e.to_string()))?;

        let mut builder = builder
            .port(config.smtp_port)
            .timeout(Some(config.send_timeout()));

        if let Some(user) = config.user() {
            builder = builder.credentials(Credentials::new(
                user.to_string(),
                config.smtp_pass.clone().unwrap_or_default(),
            ));
        }

        debug!(
            host = host,
            port = config.smtp_port,
            implicit_tls = config.uses_implicit_tls(),
            "SMTP transport configured"
        );

        Ok(Arc::new(SmtpMailer {
            transport: builder.build(),
        }))
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(transport: AsyncSmtpTransport<Tokio1Executor>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(&email)?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Smtp(e.to_string()))
    }
}

/// Converts an [`OutgoingEmail`] into a lettre [`Message`] with plain-text and
/// HTML alternatives. An unparsable reply address is dropped rather than
/// failing the whole message.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    let from_address = email
        .from_address
        .parse::<Address>()
        .map_err(|e| MailError::InvalidAddress(format!("from {:?}: {}", email.from_address, e)))?;
    let display_name = Some(email.from_name.clone()).filter(|name| !name.is_empty());
    let from = Mailbox::new(display_name, from_address);

    let to = email
        .to
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress(format!("to {:?}: {}", email.to, e)))?;

    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone());

    match email.reply_to.parse::<Mailbox>() {
        Ok(reply_to) => builder = builder.reply_to(reply_to),
        Err(e) => warn!(
            reply_to = %email.reply_to,
            error = %e,
            "Submitter address is not a valid mailbox, sending without Reply-To"
        ),
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))
        .map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email() -> OutgoingEmail {
        OutgoingEmail {
            from_name: "Jane".to_string(),
            from_address: "relay@example.com".to_string(),
            to: "owner@example.com".to_string(),
            reply_to: "jane@x.com".to_string(),
            subject: "Contact form: Hello".to_string(),
            text: "Hello".to_string(),
            html: "<p>Hello</p>".to_string(),
        }
    }

    fn configured() -> MailConfig {
        MailConfig {
            to_email: Some("owner@example.com".to_string()),
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_user: Some("relay@example.com".to_string()),
            smtp_pass: Some("secret".to_string()),
            ..MailConfig::default()
        }
    }

    #[test]
    fn test_build_message_headers() {
        let message = build_message(&sample_email()).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Reply-To: jane@x.com"));
        assert!(formatted.contains("To: owner@example.com"));
        assert!(formatted.contains("Subject: Contact form: Hello"));
        assert!(formatted.contains("relay@example.com"));
        assert!(formatted.contains("multipart/alternative"));
    }

    #[test]
    fn test_apostrophe_reply_to_is_kept() {
        let mut email = sample_email();
        email.reply_to = "o'brien@x.com".to_string();

        let message = build_message(&email).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Reply-To: o'brien@x.com"));
    }

    #[test]
    fn test_invalid_reply_to_is_dropped() {
        let mut email = sample_email();
        email.reply_to = "not an address".to_string();

        let message = build_message(&email).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(!formatted.contains("Reply-To"));
    }

    #[test]
    fn test_invalid_destination_fails() {
        let mut email = sample_email();
        email.to = "nobody".to_string();

        assert!(matches!(build_message(&email), Err(MailError::InvalidAddress(_))));
    }

    #[test]
    fn test_sender_mailbox() {
        assert_eq!(sender_mailbox(&configured()).unwrap(), "relay@example.com");

        let mut config = configured();
        config.smtp_user = None;
        assert!(matches!(sender_mailbox(&config), Err(MailError::MissingConfig(_))));

        config.smtp_user = Some("relay-without-domain".to_string());
        assert!(matches!(sender_mailbox(&config), Err(MailError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_builder_requires_host() {
        let mut config = configured();
        config.smtp_host = None;

        assert!(matches!(
            SmtpTransportBuilder.build(&config),
            Err(MailError::MissingConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_builder_accepts_both_tls_modes() {
        let mut config = configured();
        assert!(SmtpTransportBuilder.build(&config).is_ok());

        config.smtp_port = 465;
        assert!(SmtpTransportBuilder.build(&config).is_ok());
    }
}
