//! The submission controller: mediates between form input and the relay.

use std::sync::Arc;
use std::time::Duration;

use contact_core::{is_honeypot_tripped, Validatable};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cooldown::Cooldown,
    error::ClientError,
    form::{Field, SubmissionForm},
    relay_client::{HttpRelayClient, RelayClient},
    status::SubmissionStatus,
};

pub const FIELDS_REQUIRED_MESSAGE: &str = "Please complete name, email and message.";
pub const UNABLE_TO_SEND_MESSAGE: &str = "Unable to send message.";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Message sent, thank you!";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Failed to send message. Try again later.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again later.";

pub const DEFAULT_COOLDOWN_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Full URL of the relay endpoint, e.g. `https://example.com/api/contact`.
    pub endpoint: String,
    pub cooldown_seconds: u64,
    pub request_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000/api/contact".to_string(),
            cooldown_seconds: DEFAULT_COOLDOWN_SECONDS,
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Why a call to [`SubmissionController::submit`] did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("cooling down, {remaining}s remaining")]
    CoolingDown { remaining: u64 },
}

struct FormState {
    form: SubmissionForm,
    status: SubmissionStatus,
}

/// Owns one contact form for the lifetime of a page visit.
///
/// All methods take `&self`; the form lock is never held across the network
/// call, so a second `submit` issued while one is in flight sees the pending
/// status and returns [`SubmitBlocked::InFlight`].
pub struct SubmissionController {
    relay: Arc<dyn RelayClient>,
    state: Mutex<FormState>,
    cooldown: Cooldown,
    cooldown_seconds: u64,
}

impl SubmissionController {
    pub fn new(relay: Arc<dyn RelayClient>, cooldown_seconds: u64) -> Self {
        Self {
            relay,
            state: Mutex::new(FormState {
                form: SubmissionForm::default(),
                status: SubmissionStatus::idle(),
            }),
            cooldown: Cooldown::new(),
            cooldown_seconds,
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Result<Self, ClientError> {
        let relay = HttpRelayClient::new(config.endpoint.clone(), config.request_timeout)?;
        Ok(Self::new(Arc::new(relay), config.cooldown_seconds))
    }

    pub fn update_field(&self, field: Field, value: impl Into<String>) {
        self.state.lock().form.set(field, value);
    }

    /// Same as [`update_field`](Self::update_field), addressed by the form
    /// input's `name` attribute.
    pub fn update_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ClientError> {
        let field: Field = name.parse()?;
        self.update_field(field, value);
        Ok(())
    }

    pub fn form(&self) -> SubmissionForm {
        self.state.lock().form.clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.state.lock().status.clone()
    }

    pub fn cooldown_remaining(&self) -> u64 {
        self.cooldown.remaining()
    }

    /// Whether the submit button should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.lock().status.is_pending() && !self.cooldown.is_active()
    }

    /// Runs the client-side checks and, if they pass, sends the form to the
    /// relay. Returns the resulting status, or why nothing happened.
    pub async fn submit(&self) -> Result<SubmissionStatus, SubmitBlocked> {
        let payload = {
            let mut state = self.state.lock();

            if state.status.is_pending() {
                return Err(SubmitBlocked::InFlight);
            }

            let remaining = self.cooldown.remaining();
            if remaining > 0 {
                return Err(SubmitBlocked::CoolingDown { remaining });
            }

            let validation = state.form.as_submission().validate_comprehensive();
            if !validation.is_valid {
                debug!(fields = ?validation.invalid_fields(), "Contact form incomplete");
                state.status = SubmissionStatus::failure(FIELDS_REQUIRED_MESSAGE);
                return Ok(state.status.clone());
            }

            if is_honeypot_tripped(&state.form.honeypot) {
                debug!("Honeypot field filled, dropping submission");
                state.status = SubmissionStatus::failure(UNABLE_TO_SEND_MESSAGE);
                return Ok(state.status.clone());
            }

            state.status = SubmissionStatus::pending();
            state.form.to_payload()
        };

        let pending = PendingGuard::new(&self.state);
        let result = self.relay.send(&payload).await;
        pending.disarm();

        let mut state = self.state.lock();
        state.status = match result {
            Ok(reply) if reply.is_success() => {
                info!("Contact message accepted by relay");
                state.form.clear();
                self.cooldown.start(self.cooldown_seconds);
                SubmissionStatus::success(
                    non_empty(reply.message).unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
                )
            }
            Ok(reply) => {
                warn!(status = reply.status, "Relay rejected contact message");
                SubmissionStatus::failure(
                    non_empty(reply.error).unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
                )
            }
            Err(err) => {
                warn!(error = %err, "Contact request failed");
                SubmissionStatus::failure(NETWORK_ERROR_MESSAGE)
            }
        };

        Ok(state.status.clone())
    }
}

/// Resets a pending status if the request future is dropped before the relay
/// answers, so an abandoned request does not lock the form.
struct PendingGuard<'a> {
    state: &'a Mutex<FormState>,
    armed: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(state: &'a Mutex<FormState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut state = self.state.lock();
        if state.status.is_pending() {
            warn!("Contact request abandoned before the relay answered");
            state.status = SubmissionStatus::failure(NETWORK_ERROR_MESSAGE);
        }
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
