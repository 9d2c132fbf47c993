//! Application error types and handling

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Email destination not configured")]
    DestinationNotConfigured,

    #[error("Mail transporter configuration error: {0}")]
    TransportConfig(String),

    #[error("Mail dispatch failed: {0}")]
    Dispatch(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingFields | AppError::BadRequest(_) | AppError::JsonError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::DestinationNotConfigured
            | AppError::TransportConfig(_)
            | AppError::Dispatch(_)
            | AppError::IoError(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::MissingFields => "Missing required fields".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::DestinationNotConfigured => {
                tracing::error!("Contact destination address (TO_EMAIL) is not configured");
                "Email destination not configured".to_string()
            }
            AppError::TransportConfig(msg) => {
                tracing::error!("Mail transport setup failed: {}", msg);
                "Mail transporter configuration error".to_string()
            }
            AppError::Dispatch(msg) => {
                tracing::error!("Mail dispatch failed: {}", msg);
                "Failed to send email".to_string()
            }
            AppError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                "Internal server error".to_string()
            }
            AppError::JsonError(err) => {
                tracing::warn!("JSON error: {}", err);
                "Invalid JSON data".to_string()
            }
            AppError::Other(err) => {
                tracing::error!("Unexpected error: {:?}", err);
                "Internal server error".to_string()
            }
        };

        let mut response = (status, Json(json!({ "error": error_message }))).into_response();

        if matches!(self, AppError::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }

        response
    }
}
