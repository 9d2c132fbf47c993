//! Client-side half of the contact pipeline: form state, pre-flight checks,
//! cooldown throttling and the call to the relay endpoint.

pub mod controller;
pub mod cooldown;
pub mod error;
pub mod form;
pub mod relay_client;
pub mod status;

pub use controller::{ControllerConfig, SubmissionController, SubmitBlocked};
pub use cooldown::Cooldown;
pub use error::ClientError;
pub use form::{Field, SubmissionForm};
pub use relay_client::{HttpRelayClient, RelayClient, RelayReply};
pub use status::{Outcome, SubmissionStatus};
