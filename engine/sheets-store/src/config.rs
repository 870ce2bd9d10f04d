//! Configuration for the Google Sheets store

use serde::{Deserialize, Serialize};

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// OAuth scopes needed to create, move and write spreadsheets
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/spreadsheets",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub sheets_api_base: String,
    pub drive_api_base: String,
    pub request_timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            sheets_api_base: SHEETS_API_BASE.to_string(),
            drive_api_base: DRIVE_API_BASE.to_string(),
            request_timeout_secs: 30,
        }
    }
}
