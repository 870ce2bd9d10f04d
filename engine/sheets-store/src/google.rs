//! Google Sheets + Drive backed table store

use crate::auth::ServiceAccountAuth;
use crate::config::SheetsConfig;
use crate::store::{A1Range, TableId, TableStore};
use crate::{Result, StoreError};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    parents: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSpreadsheet {
    spreadsheet_id: String,
}

pub struct GoogleSheetsStore {
    config: SheetsConfig,
    client: Client,
    auth: ServiceAccountAuth,
}

impl GoogleSheetsStore {
    pub fn new(config: SheetsConfig, client: Client, auth: ServiceAccountAuth) -> Self {
        Self { config, client, auth }
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Value> {
        let token = self.auth.access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { operation, status: status.as_u16(), message });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn drive_file_url(&self, id: &TableId) -> String {
        format!("{}/files/{}", self.config.drive_api_base, id)
    }

    fn values_url(&self, id: &TableId, range: &A1Range, suffix: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}{}",
            self.config.sheets_api_base,
            id,
            encode_range(&range.to_string()),
            suffix
        )
    }
}

/// Drive query for a live spreadsheet with this exact name under a folder
pub fn name_query(name: &str, container_id: &str) -> String {
    format!(
        "name = '{}' and '{}' in parents and mimeType = '{}' and trashed = false",
        escape_query(name),
        escape_query(container_id),
        SPREADSHEET_MIME_TYPE
    )
}

fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Percent-encode a range for use as a URL path segment
fn encode_range(range: &str) -> String {
    range
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'!' | b':' => {
                (b as char).to_string()
            }
            other => format!("%{:02X}", other),
        })
        .collect()
}

#[async_trait::async_trait]
impl TableStore for GoogleSheetsStore {
    async fn find_table_by_name_in_container(
        &self,
        name: &str,
        container_id: &str,
    ) -> Result<Option<TableId>> {
        let request = self
            .client
            .get(format!("{}/files", self.config.drive_api_base))
            .query(&[
                ("q", name_query(name, container_id)),
                ("fields", "files(id, name, parents)".to_string()),
                ("spaces", "drive".to_string()),
                ("supportsAllDrives", "true".to_string()),
                ("includeItemsFromAllDrives", "true".to_string()),
            ]);

        let value = self.send("files.list", request).await?;
        let list: FileList = serde_json::from_value(value)?;
        if list.files.len() > 1 {
            debug!(name, matches = list.files.len(), "Multiple tables share a name, using the first");
        }
        Ok(list.files.into_iter().next().map(|f| TableId(f.id)))
    }

    async fn create_table(&self, name: &str, subsheet: &str) -> Result<TableId> {
        let body = json!({
            "properties": { "title": name },
            "sheets": [{ "properties": { "title": subsheet } }]
        });
        let request = self
            .client
            .post(format!("{}/spreadsheets", self.config.sheets_api_base))
            .json(&body);

        let value = self.send("spreadsheets.create", request).await?;
        let created: CreatedSpreadsheet = serde_json::from_value(value)?;
        info!(name, id = %created.spreadsheet_id, "Created spreadsheet");
        Ok(TableId(created.spreadsheet_id))
    }

    async fn relocate(&self, id: &TableId, container_id: &str) -> Result<()> {
        let request = self
            .client
            .get(self.drive_file_url(id))
            .query(&[("fields", "id, parents"), ("supportsAllDrives", "true")]);
        let value = self.send("files.get", request).await?;
        let file: DriveFile = serde_json::from_value(value)?;
        let previous = file.parents.join(",");

        let request = self
            .client
            .patch(self.drive_file_url(id))
            .query(&[
                ("addParents", container_id),
                ("removeParents", previous.as_str()),
                ("fields", "id, parents"),
                ("supportsAllDrives", "true"),
            ])
            .json(&json!({}));
        self.send("files.update", request).await?;

        debug!(id = %file.id, container_id, "Moved spreadsheet into folder");
        Ok(())
    }

    async fn clear_range(&self, id: &TableId, range: &A1Range) -> Result<()> {
        let request = self.client.post(self.values_url(id, range, ":clear")).json(&json!({}));
        self.send("values.clear", request).await?;
        Ok(())
    }

    async fn write_range(&self, id: &TableId, range: &A1Range, rows: &[Vec<String>]) -> Result<()> {
        let body = json!({
            "range": range.to_string(),
            "majorDimension": "ROWS",
            "values": rows,
        });
        let request = self
            .client
            .put(self.values_url(id, range, ""))
            .query(&[("valueInputOption", "RAW")])
            .json(&body);
        self.send("values.update", request).await?;
        Ok(())
    }
}
