use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid relay response: {0}")]
    InvalidResponse(String),

    #[error("unknown form field: {0}")]
    UnknownField(String),
}
