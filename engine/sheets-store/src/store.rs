//! Tabular store abstraction

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a table (spreadsheet) in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(pub String);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A subsheet reference in A1 notation: `sheet` or `sheet!B3`.
///
/// Only the top-left anchor is kept; the store decides how far a write or
/// clear extends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet: String,
    /// Zero-based `(row, column)` of the anchor cell, `None` for the whole sheet
    pub start: Option<(usize, usize)>,
}

impl A1Range {
    /// The whole subsheet
    pub fn sheet(name: impl Into<String>) -> Self {
        Self { sheet: name.into(), start: None }
    }

    /// Anchored at the subsheet's top-left cell
    pub fn origin(name: impl Into<String>) -> Self {
        Self { sheet: name.into(), start: Some((0, 0)) }
    }
}

fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    col += 1;
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sheet = if self.sheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.sheet.clone()
        } else {
            format!("'{}'", self.sheet)
        };
        match self.start {
            None => write!(f, "{}", sheet),
            Some((row, col)) => write!(f, "{}!{}{}", sheet, column_letters(col), row + 1),
        }
    }
}

/// Remote store of named tables grouped into containers.
///
/// Every call is a single round trip; implementations do not retry.
#[async_trait::async_trait]
pub trait TableStore: Send + Sync {
    /// Look up a table by exact name inside a container
    async fn find_table_by_name_in_container(
        &self,
        name: &str,
        container_id: &str,
    ) -> Result<Option<TableId>>;

    /// Create a table with one initial subsheet, in the store's default location
    async fn create_table(&self, name: &str, subsheet: &str) -> Result<TableId>;

    /// Move a table into a container, removing it from every previous parent
    async fn relocate(&self, id: &TableId, container_id: &str) -> Result<()>;

    /// Erase cell contents in a range
    async fn clear_range(&self, id: &TableId, range: &A1Range) -> Result<()>;

    /// Write rows starting at the range anchor
    async fn write_range(&self, id: &TableId, range: &A1Range, rows: &[Vec<String>]) -> Result<()>;
}
