//! Error types for the ESPN fetcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ESPN API returned status {status} for season {year}: {body}")]
    Status { year: i32, status: u16, body: String },

    #[error("Unexpected response shape for season {year}: {message}")]
    UnexpectedShape { year: i32, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
