//! Idempotent sync of the history collections into the remote table store.
//!
//! Each collection goes through Locate → (Create → Relocate) → Clear → Write.
//! A table found by name in the target folder is reused, so repeated runs
//! with the same input leave exactly one table with the same contents.

use crate::error::SyncError;
use crate::records::LeagueHistory;
use serde::Serialize;
use serde_json::Value;
use sheets_store::{A1Range, StoreError, TableId, TableStore};
use std::fmt;
use tracing::{error, info, warn};

/// Subsheet every synced table writes to
pub const MASTER_SHEET: &str = "master_data";

pub const TEAMS_COLLECTION: &str = "teams";
pub const MATCHUPS_COLLECTION: &str = "matchups";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Locate,
    Create,
    Relocate,
    Clear,
    Write,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::Locate => "locate",
            SyncStage::Create => "create",
            SyncStage::Relocate => "relocate",
            SyncStage::Clear => "clear",
            SyncStage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Where and under which names collections are synced
#[derive(Debug, Clone)]
pub struct SyncTarget {
    pub prefix: String,
    pub container_id: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl SyncTarget {
    pub fn table_name(&self, collection: &str) -> String {
        format!("{}_{}_{}_{}", self.prefix, collection, self.start_year, self.end_year)
    }
}

/// Outcome of syncing one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub collection: String,
    pub table_name: String,
    pub table_id: TableId,
    pub created: bool,
    /// Data rows, header excluded
    pub rows_written: usize,
}

pub struct SyncEngine<S> {
    store: S,
    target: SyncTarget,
}

impl<S: TableStore> SyncEngine<S> {
    pub fn new(store: S, target: SyncTarget) -> Self {
        Self { store, target }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn target(&self) -> &SyncTarget {
        &self.target
    }

    /// Sync both collections; the first failure aborts the export
    pub async fn export(&self, history: &LeagueHistory) -> Result<Vec<SyncReport>, SyncError> {
        let teams = self.sync_collection(TEAMS_COLLECTION, &history.teams).await?;
        let matchups = self.sync_collection(MATCHUPS_COLLECTION, &history.matchups).await?;
        Ok(vec![teams, matchups])
    }

    pub async fn sync_collection<T: Serialize>(
        &self,
        collection: &str,
        records: &[T],
    ) -> Result<SyncReport, SyncError> {
        let rows = to_rows(collection, records)?;
        let table_name = self.target.table_name(collection);
        let container = self.target.container_id.as_str();
        let stage_err = move |stage: SyncStage| {
            move |source: StoreError| {
                error!(collection, %stage, error = %source, "Sync step failed");
                SyncError::Store { collection: collection.to_string(), stage, source }
            }
        };

        let existing = self
            .store
            .find_table_by_name_in_container(&table_name, container)
            .await
            .map_err(stage_err(SyncStage::Locate))?;

        let (table_id, created) = match existing {
            Some(id) => {
                info!(collection, table = %table_name, id = %id, "Found existing table");
                (id, false)
            }
            None => {
                let id = self
                    .store
                    .create_table(&table_name, MASTER_SHEET)
                    .await
                    .map_err(stage_err(SyncStage::Create))?;
                self.store
                    .relocate(&id, container)
                    .await
                    .map_err(stage_err(SyncStage::Relocate))?;
                info!(collection, table = %table_name, id = %id, "Created table in target folder");
                (id, true)
            }
        };

        self.store
            .clear_range(&table_id, &A1Range::sheet(MASTER_SHEET))
            .await
            .map_err(stage_err(SyncStage::Clear))?;

        if rows.is_empty() {
            warn!(collection, table = %table_name, "No records to write");
        } else {
            self.store
                .write_range(&table_id, &A1Range::origin(MASTER_SHEET), &rows)
                .await
                .map_err(stage_err(SyncStage::Write))?;
        }

        let rows_written = records.len();
        info!(collection, table = %table_name, records = rows_written, "Synced collection");

        Ok(SyncReport { collection: collection.to_string(), table_name, table_id, created, rows_written })
    }
}

/// Header from the first record's keys (in order), then one text row per record.
/// Empty input yields no rows at all.
pub fn to_rows<T: Serialize>(collection: &str, records: &[T]) -> Result<Vec<Vec<String>>, SyncError> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .map_err(|source| SyncError::Serialize { collection: collection.to_string(), source })?;

    let Some(first) = values.first() else {
        return Ok(Vec::new());
    };

    let header: Vec<String> = match first {
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    };

    let mut rows = Vec::with_capacity(values.len() + 1);
    rows.push(header.clone());
    for value in &values {
        rows.push(header.iter().map(|key| cell_text(value.get(key))).collect());
    }
    Ok(rows)
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_name_convention() {
        let target = SyncTarget {
            prefix: "Fantasy_Football_Data".to_string(),
            container_id: "folder".to_string(),
            start_year: 2012,
            end_year: 2024,
        };
        assert_eq!(target.table_name("teams"), "Fantasy_Football_Data_teams_2012_2024");
    }

    #[test]
    fn test_rows_keep_key_order_and_coerce_to_text() {
        let records = vec![
            json!({ "year": 2019, "home_team": "Sharks", "home_score": 101.5, "made_playoffs": true }),
            json!({ "year": 2019, "home_team": "Bears", "home_score": 99.0 }),
        ];
        let rows = to_rows("matchups", &records).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["year", "home_team", "home_score", "made_playoffs"]);
        assert_eq!(rows[1], vec!["2019", "Sharks", "101.5", "true"]);
        assert_eq!(rows[2], vec!["2019", "Bears", "99.0", ""]);
    }

    #[test]
    fn test_empty_collection_has_no_rows() {
        let records: Vec<Value> = Vec::new();
        assert!(to_rows("teams", &records).unwrap().is_empty());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(SyncStage::Relocate.to_string(), "relocate");
    }
}
