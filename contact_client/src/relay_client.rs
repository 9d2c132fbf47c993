use std::time::Duration;

use async_trait::async_trait;
use contact_core::{ContactReply, ContactSubmission};
use reqwest::Client;
use tracing::debug;

use crate::error::ClientError;

/// Status and decoded body of a relay response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub status: u16,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl RelayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The single network call the controller makes.
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn send(&self, payload: &ContactSubmission) -> Result<RelayReply, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    http: Client,
    endpoint: String,
}

impl HttpRelayClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn send(&self, payload: &ContactSubmission) -> Result<RelayReply, ClientError> {
        let response = self.http.post(&self.endpoint).json(payload).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(status, body_bytes = body.len(), "relay responded");

        let reply: ContactReply = serde_json::from_slice(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        Ok(RelayReply {
            status,
            message: reply.message,
            error: reply.error,
        })
    }
}
