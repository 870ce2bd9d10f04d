//! Error types for the league history pipeline

use crate::sync::SyncStage;
use sheets_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl HistoryError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }
}

/// Failure while reconciling one collection with the remote store
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{stage} failed for collection `{collection}`: {source}")]
    Store {
        collection: String,
        stage: SyncStage,
        #[source]
        source: StoreError,
    },

    #[error("Failed to serialize collection `{collection}`: {source}")]
    Serialize {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}
