//! Error types for the sheets store

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Google API error ({operation}): status {status}: {message}")]
    Api { operation: &'static str, status: u16, message: String },

    #[error("Credential error: {message}")]
    Credentials { message: String },

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid range `{range}`: {message}")]
    InvalidRange { range: String, message: String },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials { message: message.into() }
    }
}
