use std::sync::Arc;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::{
    config::MailConfig,
    error::{AppError, Result},
    mail::{compose_contact_email, sender_mailbox, TransportBuilder},
    models::ContactSubmission,
    validation::Validatable,
};

/// Validates a contact submission and relays it as one email. A transport is
/// built per call.
#[derive(Clone)]
pub struct RelayService {
    mail_config: Arc<MailConfig>,
    transports: Arc<dyn TransportBuilder>,
}

impl RelayService {
    pub fn new(mail_config: MailConfig, transports: Arc<dyn TransportBuilder>) -> Self {
        Self {
            mail_config: Arc::new(mail_config),
            transports,
        }
    }

    pub fn mail_config(&self) -> &MailConfig {
        &self.mail_config
    }

    pub fn is_configured(&self) -> bool {
        self.mail_config.destination().is_some() && self.mail_config.host().is_some()
    }

    /// Sends exactly one email for a valid submission. Calling this twice with
    /// the same payload sends two emails.
    pub async fn relay(&self, submission: &ContactSubmission) -> Result<()> {
        let validation = submission.validate_comprehensive();
        if !validation.is_valid {
            warn!(
                fields = ?validation.invalid_fields(),
                "Rejected contact submission with missing fields"
            );
            return Err(AppError::MissingFields);
        }

        let destination = self
            .mail_config
            .destination()
            .ok_or(AppError::DestinationNotConfigured)?;

        let sender = sender_mailbox(&self.mail_config)
            .map_err(|e| AppError::TransportConfig(e.to_string()))?;
        let transport = self
            .transports
            .build(&self.mail_config)
            .map_err(|e| AppError::TransportConfig(e.to_string()))?;

        let email = compose_contact_email(submission, &sender, destination);

        let send_timeout = self.mail_config.send_timeout();
        match timeout(send_timeout, transport.send(email)).await {
            Ok(sent) => sent.map_err(|e| AppError::Dispatch(e.to_string()))?,
            Err(_) => {
                return Err(AppError::Dispatch(format!(
                    "no response from mail server within {}s",
                    send_timeout.as_secs()
                )))
            }
        }

        info!(
            subject = submission.subject_or_default(),
            "Contact message relayed"
        );

        Ok(())
    }
}
