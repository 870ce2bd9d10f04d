//! Sheets Store - remote tabular storage for synced league tables
//!
//! This crate provides the `TableStore` abstraction the sync engine writes
//! through, a Google Sheets + Drive implementation authenticated with a
//! service account, and an in-memory implementation for tests and dry runs.

pub mod auth;
pub mod config;
pub mod error;
pub mod google;
pub mod memory;
pub mod store;

pub use auth::ServiceAccountAuth;
pub use config::SheetsConfig;
pub use error::StoreError;
pub use google::GoogleSheetsStore;
pub use memory::MemoryTableStore;
pub use store::{A1Range, TableId, TableStore};

// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
